//! Cosmetic repository metadata scaffolding.
//!
//! The clone variant drops a `.git` directory next to the extracted tree so
//! the result *looks* like a checkout. There is no object database behind
//! it - don't mistake the output for a repository git can work with.

use failure::{Error, ResultExt};
use std::fs;
use std::path::Path;

const METADATA_DIRS: &[&str] = &["objects", "refs/heads", "refs/tags", "info", "hooks"];
const HEAD: &str = "ref: refs/heads/main\n";
const CONFIG: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n";

/// Create the fixed `.git` subtree inside `dest`.
pub fn init_scaffold(dest: &Path) -> Result<(), Error> {
    let git_dir = dest.join(".git");
    debug!("scaffolding {}", git_dir.display());

    for dir in METADATA_DIRS {
        fs::create_dir_all(git_dir.join(dir))
            .context("Unable to create the metadata directories")?;
    }

    fs::write(git_dir.join("HEAD"), HEAD).context("Unable to write the head reference")?;
    fs::write(git_dir.join("config"), CONFIG).context("Unable to write the config file")?;

    Ok(())
}
