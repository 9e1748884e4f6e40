//! Deciding which snapshot of a repository to download.

use crate::fetch::Transport;
use crate::json;
use crate::providers;
use crate::repo::RepoRef;

/// The branch we assume when the provider tells us nothing.
pub const DEFAULT_BRANCH: &str = "main";
/// Retried once when downloading the default branch fails.
pub const SECONDARY_BRANCH: &str = "master";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Release,
    Branch,
}

/// A release tag or branch name identifying the snapshot to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    pub kind: RefKind,
    pub value: String,
}

impl ResolvedRef {
    pub fn release<S: Into<String>>(value: S) -> ResolvedRef {
        ResolvedRef {
            kind: RefKind::Release,
            value: value.into(),
        }
    }

    pub fn branch<S: Into<String>>(value: S) -> ResolvedRef {
        ResolvedRef {
            kind: RefKind::Branch,
            value: value.into(),
        }
    }
}

/// Determine the most specific reference available for `repo`: the latest
/// release tag if there is one, else the repository's reported default
/// branch, else `default_branch`.
///
/// Resolution always succeeds. Missing information degrades to a fallback
/// value rather than aborting the pipeline, so an unreachable API or a
/// repository without releases still produces a usable reference.
pub fn resolve(
    transport: &dyn Transport,
    repo: &RepoRef,
    branch_override: Option<&str>,
    default_branch: &str,
) -> ResolvedRef {
    if let Some(branch) = branch_override {
        debug!("using the branch given on the command line: {}", branch);
        return ResolvedRef::branch(branch);
    }

    let provider = providers::profile(repo.provider);

    if let Some(url) = provider.release_url(repo) {
        info!("checking releases at: {}", url);

        if let Some(body) = transport.fetch_text(&url) {
            if let Some(tag) = json::extract_string_field(&body, "tag_name") {
                info!("found release: {}", tag);
                return ResolvedRef::release(tag);
            }
        }
    }

    info!("no releases found, falling back to branch download");

    if let Some(url) = provider.metadata_url(repo) {
        if let Some(body) = transport.fetch_text(&url) {
            if let Some(branch) = json::extract_string_field(&body, "default_branch") {
                debug!("provider reports default branch {}", branch);
                return ResolvedRef::branch(branch);
            }
        }
    }

    debug!("no default branch reported, assuming {}", default_branch);
    ResolvedRef::branch(default_branch)
}
