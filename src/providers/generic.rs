use super::Provider;
use crate::archive::ArchiveFormat;
use crate::config::ArchivePrefs;
use crate::reference::{RefKind, ResolvedRef};
use crate::repo::RepoRef;

/// An unrecognised forge. There's no API to ask, so resolution always
/// degrades to a branch name and the archive URL is a best-effort guess at
/// the common `/archive/{ref}.tar.gz` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generic;

impl Provider for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn release_url(&self, _repo: &RepoRef) -> Option<String> {
        None
    }

    fn metadata_url(&self, _repo: &RepoRef) -> Option<String> {
        None
    }

    fn archive_format(&self, _kind: RefKind, _prefs: &ArchivePrefs) -> ArchiveFormat {
        ArchiveFormat::TarGz
    }

    fn archive_url(
        &self,
        repo: &RepoRef,
        reference: &ResolvedRef,
        _format: ArchiveFormat,
    ) -> String {
        format!(
            "https://{}/{}/{}/archive/{}.tar.gz",
            repo.host, repo.owner, repo.name, reference.value
        )
    }
}
