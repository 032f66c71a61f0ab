//! jxl-info - print what a JPEG XL file contains

use anyhow::Context;
use clap::Parser;
use jxl::fs::read_probe_then_rest;
use jxl::{inspect, JxlInfo};
use std::fs::File;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Prints the packaging, container boxes and dimensions of a JPEG XL image
#[derive(Parser)]
#[command(name = "jxl-info")]
#[command(version)]
#[command(about = "Describes a JPEG XL image", long_about = None)]
struct Cli {
    /// Explain what is happening; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// File to describe
    input_file: PathBuf,
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

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("Decoding {}", cli.input_file.display());
    let file = File::open(&cli.input_file)
        .with_context(|| format!("failed to open {}", cli.input_file.display()))?;
    let (_, data) = read_probe_then_rest(file)
        .with_context(|| format!("{} is not a JPEG XL file", cli.input_file.display()))?;
    let info = inspect(&data)
        .with_context(|| format!("{} is not a valid JXL file", cli.input_file.display()))?;

    print!("{}", render(&info));
    Ok(())
}

fn render(info: &JxlInfo) -> String {
    let mut out = format!("Kind: {}\n", info.kind);
    if let Some(container) = &info.container {
        match container.level {
            Some(level) => out.push_str(&format!("Level: {level}\n")),
            None => out.push_str("Level: 5 (implied)\n"),
        }
        out.push_str("Boxes:\n");
        for b in &container.boxes {
            out.push_str(&format!("  {:>10}  {}  {} bytes\n", b.offset, b.box_type, b.length));
        }
        for warning in &container.warnings {
            out.push_str(&format!("Warning: {warning:?}\n"));
        }
    }
    out.push_str(&format!(
        "Codestream: {} of {} bytes\n",
        info.codestream_len, info.file_len
    ));
    out.push_str(&format!("Dimensions: {}\n", info.size));
    out
}
