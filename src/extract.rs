//! Unpacking downloaded archives with the host's `tar` and `unzip`.

use crate::archive::ArchiveFormat;
use failure::{Error, ResultExt};
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

/// Unpack `archive` into `dest`, creating it if necessary.
///
/// With `strip_top_level` the archive's single top-level directory is
/// flattened into `dest`, the way a checkout would look. The external tool
/// runs without a timeout, so a hung child hangs the extraction with it.
pub fn extract(
    archive: &Path,
    dest: &Path,
    format: ArchiveFormat,
    strip_top_level: bool,
) -> Result<(), Error> {
    fs::create_dir_all(dest).context("Unable to create the extraction directory")?;

    match format {
        ArchiveFormat::TarGz => extract_tar(archive, dest, strip_top_level),
        ArchiveFormat::Zip => extract_zip(archive, dest, strip_top_level),
    }
}

fn extract_tar(archive: &Path, dest: &Path, strip_top_level: bool) -> Result<(), Error> {
    let mut cmd = Command::new("tar");
    cmd.arg("-xzf").arg(archive).arg("-C").arg(dest);
    if strip_top_level {
        cmd.arg("--strip-components=1");
    }

    run_tool(cmd, "tar")
}

fn extract_zip(archive: &Path, dest: &Path, strip_top_level: bool) -> Result<(), Error> {
    let mut cmd = Command::new("unzip");
    cmd.arg("-q").arg("-o").arg(archive).arg("-d").arg(dest);

    run_tool(cmd, "unzip")?;

    // unzip has no --strip-components equivalent, so flatten by hand.
    if strip_top_level {
        flatten_single_dir(dest)?;
    }

    Ok(())
}

fn run_tool(mut cmd: Command, tool: &'static str) -> Result<(), Error> {
    debug!("running {:?}", cmd);

    let output = match cmd.output() {
        Ok(output) => output,
        // A missing tool is still an extraction failure to the caller.
        Err(e) => {
            return Err(ExtractionFailed {
                tool,
                code: None,
                stderr: e.to_string(),
            }
            .into());
        }
    };

    if output.status.success() {
        Ok(())
    } else {
        Err(ExtractionFailed {
            tool,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}

/// If `dest` contains exactly one directory and nothing else, move its
/// contents up into `dest` and remove it.
fn flatten_single_dir(dest: &Path) -> Result<(), Error> {
    let entries = fs::read_dir(dest)
        .and_then(|iter| iter.collect::<io::Result<Vec<_>>>())
        .context("Unable to list the extraction directory")?;

    if entries.len() != 1 || !entries[0].path().is_dir() {
        return Ok(());
    }

    let top_level = entries[0].path();

    let children = fs::read_dir(&top_level)
        .and_then(|iter| iter.collect::<io::Result<Vec<_>>>())
        .context("Unable to list the archive's top-level directory")?;

    for child in children {
        fs::rename(child.path(), dest.join(child.file_name()))
            .context("Unable to move an extracted entry")?;
    }

    fs::remove_dir(&top_level).context("Unable to remove the emptied top-level directory")?;

    Ok(())
}

/// The external decompression tool failed or couldn't be started.
#[derive(Debug, Clone, PartialEq, Fail)]
pub struct ExtractionFailed {
    pub tool: &'static str,
    pub code: Option<i32>,
    pub stderr: String,
}

impl Display for ExtractionFailed {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} exited with code {}", self.tool, code)?,
            None => write!(f, "unable to run {}", self.tool)?,
        }

        if !self.stderr.is_empty() {
            write!(f, ": {}", self.stderr)?;
        }

        Ok(())
    }
}
