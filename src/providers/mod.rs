//! Static knowledge about each hosting service.
//!
//! Every service has its own API origin, archive URL grammar and preferred
//! archive format, so each one is a [`Provider`] implementation rather than
//! a string-equality branch scattered across the pipeline. Adding a service
//! means adding one file here and one arm to [`profile`].
//!
//! [`Provider`]: trait.Provider.html
//! [`profile`]: fn.profile.html

use crate::archive::ArchiveFormat;
use crate::config::ArchivePrefs;
use crate::reference::{RefKind, ResolvedRef};
use crate::repo::{ProviderKind, RepoRef};

mod codeberg;
mod generic;
mod github;
mod gitlab;

pub use self::codeberg::Codeberg;
pub use self::generic::Generic;
pub use self::github::GitHub;
pub use self::gitlab::GitLab;

/// A hosting service's URL grammar and API surface.
pub trait Provider {
    fn name(&self) -> &'static str;

    /// The endpoint describing the latest release, if the service has a
    /// release API.
    fn release_url(&self, repo: &RepoRef) -> Option<String>;

    /// The endpoint describing the repository itself, used to discover the
    /// default branch.
    fn metadata_url(&self, repo: &RepoRef) -> Option<String>;

    /// Which archive format to ask for.
    fn archive_format(&self, kind: RefKind, prefs: &ArchivePrefs) -> ArchiveFormat;

    /// The direct download link for one snapshot.
    fn archive_url(&self, repo: &RepoRef, reference: &ResolvedRef, format: ArchiveFormat)
        -> String;
}

/// Look up the profile for a provider.
pub fn profile(kind: ProviderKind) -> &'static dyn Provider {
    match kind {
        ProviderKind::GitHub => &GitHub,
        ProviderKind::GitLab => &GitLab,
        ProviderKind::Codeberg => &Codeberg,
        ProviderKind::Generic => &Generic,
    }
}
