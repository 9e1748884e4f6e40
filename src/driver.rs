//! Sequencing one fetch from URL to artifact.

use crate::archive::{self, ArchiveTarget};
use crate::config::Config;
use crate::extract;
use crate::fetch::{HttpClient, Transport};
use crate::providers;
use crate::reference::{self, RefKind, ResolvedRef};
use crate::repo::RepoRef;
use crate::scaffold;
use failure::{Error, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with the archive once it's on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Leave the archive file in the destination directory.
    Download,
    /// Extract it into a working tree and scaffold `.git` metadata.
    Clone,
}

/// Everything one invocation needs, constructed once from the command
/// line and owned by the [`Driver`] for the duration of the run.
///
/// [`Driver`]: struct.Driver.html
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub url: String,
    /// Download mode: the directory to save the archive into (default
    /// `.`). Clone mode: the checkout directory (default: the repository
    /// name).
    pub dest: Option<PathBuf>,
    /// Skip reference resolution and fetch this branch.
    pub branch: Option<String>,
    /// Treat unrecognised hosts as a generic forge instead of failing.
    pub allow_generic: bool,
    pub mode: Mode,
}

/// Runs the whole pipeline: parse, resolve, locate, download (with one
/// branch-name fallback retry), then extract and scaffold for clones.
pub struct Driver {
    options: FetchOptions,
    config: Config,
    transport: Box<dyn Transport>,
}

impl Driver {
    pub fn new(options: FetchOptions, config: Config) -> Result<Driver, Error> {
        let transport = HttpClient::from_config(&config.network)?;

        Ok(Driver::with_transport(options, config, Box::new(transport)))
    }

    /// Use a caller-supplied transport instead of the real HTTP client.
    pub fn with_transport(
        options: FetchOptions,
        config: Config,
        transport: Box<dyn Transport>,
    ) -> Driver {
        Driver {
            options,
            config,
            transport,
        }
    }

    pub fn run(&self) -> Result<(), Error> {
        let repo = self.parse_repo()?;
        info!(
            "service: {}, owner: {}, repo: {}",
            providers::profile(repo.provider).name(),
            repo.owner,
            repo.name
        );

        let reference = reference::resolve(
            &*self.transport,
            &repo,
            self.options.branch.as_deref(),
            &self.config.archive.default_branch,
        );

        match self.options.mode {
            Mode::Download => self.download_archive(&repo, &reference),
            Mode::Clone => self.clone_tree(&repo, &reference),
        }
    }

    fn parse_repo(&self) -> Result<RepoRef, Error> {
        let repo = if self.options.allow_generic {
            RepoRef::parse_lenient(&self.options.url)?
        } else {
            RepoRef::parse(&self.options.url)?
        };

        Ok(repo)
    }

    fn download_archive(&self, repo: &RepoRef, reference: &ResolvedRef) -> Result<(), Error> {
        let dest_dir = self
            .options
            .dest
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dest_dir).context("Unable to create the destination directory")?;

        let (_, path) = self.fetch_with_fallback(repo, reference, &dest_dir)?;
        info!("download successful: {}", path.display());

        Ok(())
    }

    fn clone_tree(&self, repo: &RepoRef, reference: &ResolvedRef) -> Result<(), Error> {
        let dest = self
            .options
            .dest
            .clone()
            .unwrap_or_else(|| PathBuf::from(&repo.name));

        // Stage the archive in a temp directory so a failed run never
        // leaves one lying around.
        let staging = tempfile::tempdir().context("Unable to create a staging directory")?;
        let (target, archive_path) = self.fetch_with_fallback(repo, reference, staging.path())?;

        info!("extracting: {}", target.local_filename);
        if let Err(e) = extract::extract(&archive_path, &dest, target.format, true) {
            let _ = fs::remove_file(&archive_path);
            return Err(e);
        }

        fs::remove_file(&archive_path).context("Unable to remove the downloaded archive")?;

        scaffold::init_scaffold(&dest)?;
        info!("clone successful: {}", dest.display());

        Ok(())
    }

    /// Download the located archive into `dir`. When the resolved
    /// reference is the assumed default branch, a failure earns one retry
    /// against the secondary branch name before giving up.
    fn fetch_with_fallback(
        &self,
        repo: &RepoRef,
        reference: &ResolvedRef,
        dir: &Path,
    ) -> Result<(ArchiveTarget, PathBuf), Error> {
        match self.fetch_one(repo, reference, dir) {
            Ok(found) => Ok(found),
            Err(e) => {
                let assumed_default = reference.kind == RefKind::Branch
                    && reference.value == reference::DEFAULT_BRANCH;
                if !assumed_default {
                    return Err(e);
                }

                warn!(
                    "downloading branch {} failed ({}), retrying with {}",
                    reference::DEFAULT_BRANCH,
                    e,
                    reference::SECONDARY_BRANCH
                );
                let fallback = ResolvedRef::branch(reference::SECONDARY_BRANCH);
                self.fetch_one(repo, &fallback, dir)
            }
        }
    }

    fn fetch_one(
        &self,
        repo: &RepoRef,
        reference: &ResolvedRef,
        dir: &Path,
    ) -> Result<(ArchiveTarget, PathBuf), Error> {
        let target = archive::locate(repo, reference, &self.config.archive);
        let path = dir.join(&target.local_filename);

        info!("downloading: {}", target.url);
        info!("saving as: {}", target.local_filename);

        match self.transport.download(&target.url, &path) {
            Ok(()) => Ok((target, path)),
            Err(e) => {
                remove_partial(&path);
                Err(e)
            }
        }
    }
}

fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("unable to remove partial download {}, {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::ParseError;
    use failure::err_msg;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::fs::File;
    use std::io::Write;
    use std::process::Command;
    use std::rc::Rc;

    #[derive(Default)]
    struct StubTransport {
        bodies: HashMap<String, String>,
        /// Downloads of these URLs write a partial file, then fail.
        failing_downloads: HashSet<String>,
        /// Bytes served for every successful download.
        payload: Vec<u8>,
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl Transport for StubTransport {
        fn fetch_text(&self, url: &str) -> Option<String> {
            self.requests.borrow_mut().push(format!("GET {}", url));
            self.bodies.get(url).cloned()
        }

        fn download(&self, url: &str, dest: &Path) -> Result<(), Error> {
            self.requests.borrow_mut().push(format!("DOWNLOAD {}", url));

            if self.failing_downloads.contains(url) {
                File::create(dest).unwrap().write_all(b"partial").unwrap();
                return Err(err_msg("simulated transport failure"));
            }

            File::create(dest).unwrap().write_all(&self.payload).unwrap();
            Ok(())
        }
    }

    fn options(url: &str, dest: &Path, mode: Mode) -> FetchOptions {
        FetchOptions {
            url: url.to_string(),
            dest: Some(dest.to_path_buf()),
            branch: None,
            allow_generic: false,
            mode,
        }
    }

    #[test]
    fn an_unknown_host_fails_before_any_network_access() {
        let temp = tempfile::tempdir().unwrap();
        let stub = StubTransport::default();
        let requests = Rc::clone(&stub.requests);
        let driver = Driver::with_transport(
            options("https://example.com/acme/widget", temp.path(), Mode::Download),
            Config::default(),
            Box::new(stub),
        );

        let err = driver.run().unwrap_err();

        let parse_err = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(
            *parse_err,
            ParseError::UnsupportedProvider("example.com".to_string())
        );
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn a_release_is_downloaded_under_its_tag_name() {
        let temp = tempfile::tempdir().unwrap();
        let mut stub = StubTransport {
            payload: b"archive bytes".to_vec(),
            ..StubTransport::default()
        };
        stub.bodies.insert(
            "https://api.github.com/repos/acme/widget/releases/latest".to_string(),
            r#"{"tag_name":"v1.0"}"#.to_string(),
        );
        let requests = Rc::clone(&stub.requests);
        let driver = Driver::with_transport(
            options("https://github.com/acme/widget", temp.path(), Mode::Download),
            Config::default(),
            Box::new(stub),
        );

        driver.run().unwrap();

        let saved = temp.path().join("acme-widget-v1.0.tar.gz");
        assert_eq!(fs::read(&saved).unwrap(), b"archive bytes");
        assert!(requests.borrow().contains(
            &"DOWNLOAD https://github.com/acme/widget/archive/refs/tags/v1.0.tar.gz".to_string()
        ));
    }

    #[test]
    fn a_failed_main_download_is_retried_as_master() {
        let temp = tempfile::tempdir().unwrap();
        let mut stub = StubTransport {
            payload: b"master branch".to_vec(),
            ..StubTransport::default()
        };
        // No API responses at all, so resolution degrades to "main".
        stub.failing_downloads
            .insert("https://github.com/acme/widget/archive/refs/heads/main.zip".to_string());
        let driver = Driver::with_transport(
            options("https://github.com/acme/widget", temp.path(), Mode::Download),
            Config::default(),
            Box::new(stub),
        );

        driver.run().unwrap();

        assert!(
            !temp.path().join("acme-widget-main.zip").exists(),
            "the partial download should have been cleaned up"
        );
        assert_eq!(
            fs::read(temp.path().join("acme-widget-master.zip")).unwrap(),
            b"master branch"
        );
    }

    #[test]
    fn a_failed_retry_leaves_nothing_behind() {
        let temp = tempfile::tempdir().unwrap();
        let mut stub = StubTransport::default();
        stub.failing_downloads
            .insert("https://github.com/acme/widget/archive/refs/heads/main.zip".to_string());
        stub.failing_downloads
            .insert("https://github.com/acme/widget/archive/refs/heads/master.zip".to_string());
        let requests = Rc::clone(&stub.requests);
        let driver = Driver::with_transport(
            options("https://github.com/acme/widget", temp.path(), Mode::Download),
            Config::default(),
            Box::new(stub),
        );

        assert!(driver.run().is_err());

        let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert!(leftovers.is_empty());
        // One download each for main and master, no further retries.
        let downloads = requests
            .borrow()
            .iter()
            .filter(|r| r.starts_with("DOWNLOAD"))
            .count();
        assert_eq!(downloads, 2);
    }

    #[test]
    fn an_explicit_branch_is_not_retried() {
        let temp = tempfile::tempdir().unwrap();
        let mut stub = StubTransport::default();
        stub.failing_downloads.insert(
            "https://github.com/acme/widget/archive/refs/heads/release-1.x.zip".to_string(),
        );
        let requests = Rc::clone(&stub.requests);
        let mut opts = options("https://github.com/acme/widget", temp.path(), Mode::Download);
        opts.branch = Some("release-1.x".to_string());
        let driver = Driver::with_transport(opts, Config::default(), Box::new(stub));

        assert!(driver.run().is_err());

        let downloads = requests
            .borrow()
            .iter()
            .filter(|r| r.starts_with("DOWNLOAD"))
            .count();
        assert_eq!(downloads, 1);
    }

    #[test]
    fn cloning_extracts_the_tree_and_scaffolds_metadata() {
        require_program!("tar");

        let temp = tempfile::tempdir().unwrap();

        // A tarball shaped like a forge archive: one top-level directory.
        let tree = temp.path().join("widget-v1.0");
        fs::create_dir_all(tree.join("src")).unwrap();
        fs::write(tree.join("README.md"), "# widget\n").unwrap();
        fs::write(tree.join("src/lib.rs"), "// nothing\n").unwrap();
        let tarball = temp.path().join("fixture.tar.gz");
        let status = Command::new("tar")
            .arg("-czf")
            .arg(&tarball)
            .arg("-C")
            .arg(temp.path())
            .arg("widget-v1.0")
            .status()
            .unwrap();
        assert!(status.success());

        let mut stub = StubTransport {
            payload: fs::read(&tarball).unwrap(),
            ..StubTransport::default()
        };
        stub.bodies.insert(
            "https://api.github.com/repos/acme/widget/releases/latest".to_string(),
            r#"{"tag_name":"v1.0"}"#.to_string(),
        );

        let dest = temp.path().join("checkout");
        let driver = Driver::with_transport(
            options("https://github.com/acme/widget", &dest, Mode::Clone),
            Config::default(),
            Box::new(stub),
        );

        driver.run().unwrap();

        assert!(dest.join("README.md").exists(), "tree should be flattened");
        assert!(dest.join("src/lib.rs").exists());
        assert!(dest.join(".git/HEAD").exists());
        assert!(
            !dest.join("acme-widget-v1.0.tar.gz").exists(),
            "the archive shouldn't end up in the checkout"
        );
    }

    /// Exercises the real provider APIs. Run with
    /// `cargo test -- --ignored` when network access is available.
    #[test]
    #[ignore]
    fn fetch_a_real_release_twice_and_compare() {
        let temp = tempfile::tempdir().unwrap();
        let first_dir = temp.path().join("first");
        let second_dir = temp.path().join("second");

        for dir in &[&first_dir, &second_dir] {
            let driver = Driver::new(
                options("https://github.com/sharkdp/fd", dir, Mode::Download),
                Config::default(),
            )
            .unwrap();
            driver.run().unwrap();
        }

        let archive_of = |dir: &Path| {
            let entry = fs::read_dir(dir).unwrap().next().unwrap().unwrap();
            fs::read(entry.path()).unwrap()
        };

        assert_eq!(archive_of(&first_dir), archive_of(&second_dir));
    }
}
