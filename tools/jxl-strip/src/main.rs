//! jxl-strip - remove the container from JPEG XL files
//!
//! Stripping shrinks the file and drops container-level metadata (Exif, XMP,
//! JUMBF). Files are rewritten in place.

use anyhow::Context;
use clap::Parser;
use jxl::fs::{strip_file, StripOptions, StripOutcome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Strips the container from JPEG XL images
#[derive(Parser)]
#[command(name = "jxl-strip")]
#[command(version)]
#[command(about = "Strips the container from JPEG XL images", long_about = None)]
#[command(after_help = "jxl-strip removes the container from jxl images, reducing their size
and removing any privacy compromising metadata. Files are overwritten.")]
struct Cli {
    /// Explain what is happening; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also strip level 10 images, which may depend on their container
    #[arg(long)]
    force: bool,

    /// Check and report without modifying any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// JXL files to strip, will be overwritten
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = StripOptions {
        force: cli.force,
        dry_run: cli.dry_run,
    };

    let mut failed = false;
    for path in &cli.files {
        if let Err(e) = strip_one(path, &options) {
            eprintln!("jxl-strip: {e:#}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn strip_one(path: &Path, options: &StripOptions) -> anyhow::Result<()> {
    let outcome = strip_file(path, options)
        .with_context(|| format!("failed to strip {}", path.display()))?;

    match outcome {
        StripOutcome::AlreadyStripped => {
            tracing::info!("Skipping {} as it is already stripped", path.display());
        }
        StripOutcome::Stripped {
            original_len,
            stripped_len,
        } => {
            tracing::info!(
                "Stripped {}: {} -> {} bytes",
                path.display(),
                original_len,
                stripped_len
            );
        }
        StripOutcome::DryRun {
            original_len,
            stripped_len,
        } => {
            println!(
                "{}: would strip {} -> {} bytes",
                path.display(),
                original_len,
                stripped_len
            );
        }
        StripOutcome::SkippedLevel10 => {
            tracing::warn!(
                "Skipping {}: level 10 image, use --force to strip anyway",
                path.display()
            );
        }
    }
    Ok(())
}
