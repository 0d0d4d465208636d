//! shrinkfs CLI
//!
//! Mounts a read-only mirror of SOURCE at MOUNTPOINT in which JPEGs are
//! downsized. Blocks until the mount is released.

mod error;
mod runner;

use clap::{Parser, ValueEnum};
use error::CliError;
use runner::CliRunner;
use shrinkfs::dispatch::FailurePolicy;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnFailure {
    /// Leave images that fail to transcode out of the mount
    Omit,
    /// Serve images that fail to transcode unchanged
    Passthrough,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Omit => FailurePolicy::Omit,
            OnFailure::Passthrough => FailurePolicy::Passthrough,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shrinkfs", version = shrinkfs::VERSION)]
#[command(
    about = "Mount a read-only mirror of a directory with downsized JPEGs",
    long_about = None
)]
struct Args {
    /// Directory to mirror
    source: PathBuf,

    /// Existing directory to mount the mirror on
    mountpoint: PathBuf,

    /// Where downsized images are cached (default: from config, then the user cache dir)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Number of worker threads (default: available parallelism)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Config file to read instead of ~/.shrinkfs/config.ini
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to do with JPEGs that can't be transcoded
    #[arg(long, value_enum)]
    on_failure: Option<OnFailure>,

    /// Don't follow symbolic links in SOURCE
    #[arg(long)]
    no_follow_links: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    shrinkfs::panic::init();

    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup(&args.source, &args.mountpoint);

    let mut builder = runner.service_config_builder().source(&args.source);
    if let Some(dir) = args.cache_dir {
        builder = builder.cache_directory(dir);
    }
    if let Some(workers) = args.workers {
        builder = builder.workers(workers);
    }
    if let Some(policy) = args.on_failure {
        builder = builder.on_failure(policy.into());
    }
    if args.no_follow_links {
        builder = builder.follow_links(false);
    }

    let service = runner.create_service(builder)?;
    println!(
        "Building mirror of {} (this may take a while for large photo libraries)...",
        args.source.display()
    );
    service
        .serve(&args.mountpoint)
        .map_err(CliError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["shrinkfs", "/src", "/mnt"]).unwrap();
        assert_eq!(args.source, PathBuf::from("/src"));
        assert_eq!(args.mountpoint, PathBuf::from("/mnt"));
        assert!(args.cache_dir.is_none());
        assert!(!args.no_follow_links);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "shrinkfs",
            "/src",
            "/mnt",
            "--cache-dir",
            "/cache",
            "--workers",
            "3",
            "--config",
            "/etc/shrinkfs.ini",
            "--on-failure",
            "passthrough",
            "--no-follow-links",
        ])
        .unwrap();

        assert_eq!(args.cache_dir, Some(PathBuf::from("/cache")));
        assert_eq!(args.workers, Some(3));
        assert_eq!(args.config, Some(PathBuf::from("/etc/shrinkfs.ini")));
        assert!(matches!(args.on_failure, Some(OnFailure::Passthrough)));
        assert!(args.no_follow_links);
    }

    #[test]
    fn test_wrong_arity_is_usage_error() {
        let err = Args::try_parse_from(["shrinkfs", "/src"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = Args::try_parse_from(["shrinkfs", "/a", "/b", "/c"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_on_failure_maps_to_policy() {
        assert_eq!(FailurePolicy::from(OnFailure::Omit), FailurePolicy::Omit);
        assert_eq!(
            FailurePolicy::from(OnFailure::Passthrough),
            FailurePolicy::Passthrough
        );
    }
}
