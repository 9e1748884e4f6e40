use super::Provider;
use crate::archive::ArchiveFormat;
use crate::config::ArchivePrefs;
use crate::reference::{RefKind, ResolvedRef};
use crate::repo::RepoRef;

const WEB_BASE: &str = "https://github.com";
const API_BASE: &str = "https://api.github.com/repos";

/// github.com. Releases are served as tarballs; branch snapshots use the
/// configured fallback format. Tags and heads live under different URL
/// prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitHub;

impl Provider for GitHub {
    fn name(&self) -> &'static str {
        "github"
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

    fn archive_format(&self, kind: RefKind, prefs: &ArchivePrefs) -> ArchiveFormat {
        match kind {
            RefKind::Release => ArchiveFormat::TarGz,
            RefKind::Branch => prefs.fallback_format,
        }
    }

    fn archive_url(
        &self,
        repo: &RepoRef,
        reference: &ResolvedRef,
        format: ArchiveFormat,
    ) -> String {
        let prefix = match reference.kind {
            RefKind::Release => "refs/tags",
            RefKind::Branch => "refs/heads",
        };

        format!(
            "{}/{}/{}/archive/{}/{}.{}",
            WEB_BASE,
            repo.owner,
            repo.name,
            prefix,
            reference.value,
            format.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> RepoRef {
        RepoRef::parse("https://github.com/acme/widget").unwrap()
    }

    #[test]
    fn api_endpoints() {
        assert_eq!(
            GitHub.release_url(&widget()).unwrap(),
            "https://api.github.com/repos/acme/widget/releases/latest"
        );
        assert_eq!(
            GitHub.metadata_url(&widget()).unwrap(),
            "https://api.github.com/repos/acme/widget"
        );
    }

    #[test]
    fn tags_and_heads_use_different_prefixes() {
        let release = GitHub.archive_url(
            &widget(),
            &ResolvedRef::release("v1.0"),
            ArchiveFormat::TarGz,
        );
        let branch =
            GitHub.archive_url(&widget(), &ResolvedRef::branch("main"), ArchiveFormat::Zip);

        assert_eq!(
            release,
            "https://github.com/acme/widget/archive/refs/tags/v1.0.tar.gz"
        );
        assert_eq!(
            branch,
            "https://github.com/acme/widget/archive/refs/heads/main.zip"
        );
    }
}
