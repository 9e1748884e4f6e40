//! Turning a resolved reference into a concrete download.

use crate::config::ArchivePrefs;
use crate::providers;
use crate::reference::ResolvedRef;
use crate::repo::RepoRef;
use std::fmt::{self, Display, Formatter};

/// The archive container formats the providers serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar.gz")]
    TarGz,
}

impl ArchiveFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

impl Display for ArchiveFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where an archive lives and what to call it locally. Derived
/// deterministically from the repository, the reference and the provider's
/// URL grammar; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    pub url: String,
    pub local_filename: String,
    pub format: ArchiveFormat,
}

/// Build the download URL and local filename for one snapshot.
///
/// Pure function - no network or filesystem access.
pub fn locate(repo: &RepoRef, reference: &ResolvedRef, prefs: &ArchivePrefs) -> ArchiveTarget {
    let provider = providers::profile(repo.provider);
    let format = provider.archive_format(reference.kind, prefs);
    let url = provider.archive_url(repo, reference, format);
    let local_filename = format!(
        "{}-{}-{}.{}",
        repo.owner,
        repo.name,
        reference.value,
        format.extension()
    );

    ArchiveTarget {
        url,
        local_filename,
        format,
    }
}
