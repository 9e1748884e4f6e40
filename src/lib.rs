//! Download hosted repositories as source archives instead of talking the
//! git wire protocol.
//!
//! The pipeline parses a repository URL into a [`RepoRef`], asks the
//! provider's REST API for the most specific reference available (latest
//! release tag, then default branch, then a constant fallback), builds the
//! provider-specific archive URL, downloads it, and - for the clone
//! variant - unpacks it into a working tree with a cosmetic `.git`
//! scaffold.
//!
//! [`RepoRef`]: repo/struct.RepoRef.html

#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

// Declared first so its macros are in scope for the other test modules.
#[cfg(test)]
#[macro_use]
mod test_helpers;

pub mod archive;
pub mod config;
pub mod driver;
pub mod extract;
pub mod fetch;
mod json;
pub mod providers;
pub mod reference;
pub mod repo;
pub mod scaffold;

pub use crate::archive::{ArchiveFormat, ArchiveTarget};
pub use crate::config::Config;
pub use crate::driver::{Driver, FetchOptions, Mode};
pub use crate::fetch::{HttpClient, Transport};
pub use crate::reference::{RefKind, ResolvedRef};
pub use crate::repo::{ParseError, ProviderKind, RepoRef};
