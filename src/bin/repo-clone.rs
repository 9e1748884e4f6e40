//! Materialize a hosted repository as a working tree, archive-style.
//!
//! Near-identical to `repo-fetch`, except the archive is extracted into a
//! checkout-shaped directory with cosmetic `.git` metadata instead of
//! being left on disk.

#[macro_use]
extern crate log;

use chrono::Local;
use env_logger::Builder;
use failure::{Error, ResultExt};
use log::LevelFilter;
use repo_fetch::{Config, Driver, FetchOptions, Mode};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;

fn main() {
    let args = Args::from_args();

    if args.example_config {
        generate_example();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);

        for cause in e.iter_causes() {
            eprintln!("\tCaused By: {}", cause);
        }

        process::exit(1);
    }
}

fn generate_example() {
    match Config::example().as_toml() {
        Ok(example) => println!("{}", example),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn run(args: &Args) -> Result<(), Error> {
    initialize_logging(args)?;
    let cfg = args.config()?;

    if log_enabled!(log::Level::Debug) {
        for line in format!("{:#?}", cfg).lines() {
            debug!("{}", line);
        }
    }

    let options = FetchOptions {
        url: args.url.clone(),
        dest: args.path.clone(),
        branch: args.branch.clone(),
        allow_generic: args.generic,
        mode: Mode::Clone,
    };

    Driver::new(options, cfg)?.run()
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(
    name = "repo-clone",
    about = "Materialize a repository as a working tree without using git."
)]
struct Args {
    /// The repository url, e.g. https://github.com/owner/repo
    url: String,
    /// The directory to check out into (defaults to the repository name).
    #[structopt(parse(from_os_str))]
    path: Option<PathBuf>,
    /// Check out this branch instead of resolving a release.
    #[structopt(short = "b", long = "branch")]
    branch: Option<String>,
    /// Take a best-effort guess at archive urls for unrecognised hosts.
    #[structopt(long = "generic")]
    generic: bool,
    /// The configuration file to use.
    #[structopt(short = "c", long = "config", default_value = "~/.repo-fetch.toml")]
    config_file: String,
    /// Verbose output (repeat for more verbosity)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbosity: u64,
    /// Generate an example config and immediately exit.
    #[structopt(long = "example-config")]
    example_config: bool,
}

impl Args {
    fn config(&self) -> Result<Config, Error> {
        let config_file =
            shellexpand::full(&self.config_file).context("Unable to expand wildcards")?;

        Config::from_file_or_default(Path::new(&*config_file))
            .context("Couldn't load the config")
            .map_err(Into::into)
    }
}

fn initialize_logging(args: &Args) -> Result<(), Error> {
    let mut builder = Builder::new();

    let level = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    builder.filter(Some("repo_fetch"), level);

    if let Ok(filter) = env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }

    builder.format(|out, record| {
        writeln!(
            out,
            "{} [{:5}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        )
    });

    builder.try_init()?;

    Ok(())
}
