use super::Provider;
use crate::archive::ArchiveFormat;
use crate::config::ArchivePrefs;
use crate::reference::{RefKind, ResolvedRef};
use crate::repo::RepoRef;

const WEB_BASE: &str = "https://gitlab.com";
const API_BASE: &str = "https://gitlab.com/api/v4/projects";

/// gitlab.com. Always serves tarballs, and its API addresses a project by
/// a single percent-encoded `owner%2Frepo` path segment rather than two
/// separate ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitLab;

impl Provider for GitLab {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    fn release_url(&self, repo: &RepoRef) -> Option<String> {
        Some(format!(
            "{}/{}/releases/permalink/latest",
            API_BASE,
            project_path(repo)
        ))
    }

    fn metadata_url(&self, repo: &RepoRef) -> Option<String> {
        Some(format!("{}/{}", API_BASE, project_path(repo)))
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
            "{}/{}/{}/-/archive/{}/{}-{}.tar.gz",
            WEB_BASE, repo.owner, repo.name, reference.value, repo.name, reference.value
        )
    }
}

/// The API path segment for a project: owner and name individually
/// percent-encoded, joined by an encoded slash.
fn project_path(repo: &RepoRef) -> String {
    format!(
        "{}%2F{}",
        encode_segment(&repo.owner),
        encode_segment(&repo.name)
    )
}

/// Percent-encode a string for use as a single URL path segment. Only the
/// RFC 3986 unreserved characters stay literal.
fn encode_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());

    for &byte in raw.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> RepoRef {
        RepoRef::parse("https://gitlab.com/acme/widget").unwrap()
    }

    #[test]
    fn the_project_path_is_percent_encoded() {
        assert_eq!(project_path(&widget()), "acme%2Fwidget");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode_segment("a+b c"), "a%2Bb%20c");
        assert_eq!(encode_segment("übung"), "%C3%BCbung");
        // Unreserved characters pass through untouched.
        assert_eq!(encode_segment("my-repo_v1.0~x"), "my-repo_v1.0~x");
    }

    #[test]
    fn api_endpoints() {
        assert_eq!(
            GitLab.release_url(&widget()).unwrap(),
            "https://gitlab.com/api/v4/projects/acme%2Fwidget/releases/permalink/latest"
        );
        assert_eq!(
            GitLab.metadata_url(&widget()).unwrap(),
            "https://gitlab.com/api/v4/projects/acme%2Fwidget"
        );
    }

    #[test]
    fn the_archive_url_repeats_the_repo_and_ref() {
        let url = GitLab.archive_url(
            &widget(),
            &ResolvedRef::branch("develop"),
            ArchiveFormat::TarGz,
        );

        assert_eq!(
            url,
            "https://gitlab.com/acme/widget/-/archive/develop/widget-develop.tar.gz"
        );
    }
}
