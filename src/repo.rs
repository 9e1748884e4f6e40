//! Parsing repository URLs into their provider, owner and name.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The hosting services we know how to build archive links for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GitHub,
    GitLab,
    Codeberg,
    /// An unrecognised forge we'll take a best-effort guess at. Only
    /// produced by [`RepoRef::parse_lenient`].
    ///
    /// [`RepoRef::parse_lenient`]: struct.RepoRef.html#method.parse_lenient
    Generic,
}

/// A repository on some hosting service.
///
/// Created once by parsing the user's URL and never mutated afterwards.
/// The `host` is kept around so the generic provider can rebuild the web
/// origin it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub provider: ProviderKind,
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a `scheme://host/owner/repo[.git]` URL, rejecting hosts we
    /// don't recognise.
    pub fn parse(url: &str) -> Result<RepoRef, ParseError> {
        RepoRef::parse_inner(url, false)
    }

    /// Like [`parse`], but an unknown host becomes a generic provider
    /// instead of an error.
    ///
    /// [`parse`]: #method.parse
    pub fn parse_lenient(url: &str) -> Result<RepoRef, ParseError> {
        RepoRef::parse_inner(url, true)
    }

    fn parse_inner(url: &str, allow_generic: bool) -> Result<RepoRef, ParseError> {
        let scheme_end = url
            .find("://")
            .ok_or_else(|| ParseError::MalformedUrl(url.to_string()))?;
        let rest = &url[scheme_end + 3..];

        let host_end = rest
            .find('/')
            .ok_or_else(|| ParseError::MalformedUrl(url.to_string()))?;
        let host = &rest[..host_end];
        let path = &rest[host_end + 1..];

        let provider = match host {
            "github.com" => ProviderKind::GitHub,
            "gitlab.com" => ProviderKind::GitLab,
            "codeberg.org" => ProviderKind::Codeberg,
            "" => return Err(ParseError::MalformedUrl(url.to_string())),
            other => {
                if allow_generic {
                    ProviderKind::Generic
                } else {
                    return Err(ParseError::UnsupportedProvider(other.to_string()));
                }
            }
        };

        // Anything after the repository name (e.g. "/tree/main") is
        // ignored.
        let mut segments = path.splitn(3, '/');
        let owner = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ParseError::MalformedUrl(url.to_string()))?;
        let name = segments
            .next()
            .map(|s| s.strip_suffix(".git").unwrap_or(s))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ParseError::MalformedUrl(url.to_string()))?;

        Ok(RepoRef {
            provider,
            host: host.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<RepoRef, ParseError> {
        RepoRef::parse(s)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.full_name())
    }
}

/// The ways a repository URL can be rejected.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum ParseError {
    #[fail(display = "malformed repository url: {}", _0)]
    MalformedUrl(String),
    #[fail(display = "unsupported provider: {}", _0)]
    UnsupportedProvider(String),
}
