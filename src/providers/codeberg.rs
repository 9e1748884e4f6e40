use super::Provider;
use crate::archive::ArchiveFormat;
use crate::config::ArchivePrefs;
use crate::reference::{RefKind, ResolvedRef};
use crate::repo::RepoRef;

const WEB_BASE: &str = "https://codeberg.org";
const API_BASE: &str = "https://codeberg.org/api/v1/repos";

/// codeberg.org. One archive URL shape for tags and branches; the format
/// is configurable because the forge serves both equally well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeberg;

impl Provider for Codeberg {
    fn name(&self) -> &'static str {
        "codeberg"
    }

    fn release_url(&self, repo: &RepoRef) -> Option<String> {
        Some(format!(
            "{}/{}/{}/releases/latest",
            API_BASE, repo.owner, repo.name
        ))
    }

    fn metadata_url(&self, repo: &RepoRef) -> Option<String> {
        Some(format!("{}/{}/{}", API_BASE, repo.owner, repo.name))
    }

    fn archive_format(&self, _kind: RefKind, prefs: &ArchivePrefs) -> ArchiveFormat {
        if prefs.codeberg_prefer_tar_gz {
            ArchiveFormat::TarGz
        } else {
            prefs.fallback_format
        }
    }

    fn archive_url(
        &self,
        repo: &RepoRef,
        reference: &ResolvedRef,
        format: ArchiveFormat,
    ) -> String {
        format!(
            "{}/{}/{}/archive/{}.{}",
            WEB_BASE,
            repo.owner,
            repo.name,
            reference.value,
            format.extension()
        )
    }
}
