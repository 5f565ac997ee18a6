//! Main entry point for the gzpack CLI application.
//!
//! This binary provides a command-line interface for packing files and
//! folders into gzip archives and unpacking them again.

use anyhow::Result;
use clap::Parser;
use flate2::Compression;
use std::path::Path;

use gzpack::cli::Command;
use gzpack::{
    Cli, CompressOptions, DecoderLimits, ExtractOptions, SourceKind, StdoutSink, compress,
    extract, extract_to_sink, list,
};

/// Application entry point.
///
/// Installs the log subscriber (on stderr, so `-p` output stays clean) and
/// dispatches to the subcommand handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Compress {
            path,
            output_name,
            output_dir,
            level,
        } => {
            let options = CompressOptions {
                output_name: output_name.clone(),
                output_dir: output_dir.clone(),
                level: Compression::new(*level),
            };
            run_compress(path, &options, &cli).await
        }
        Command::Extract {
            archive,
            dest_dir,
            list: list_only,
            pipe,
        } => {
            let options = ExtractOptions {
                dest_parent: dest_dir.clone(),
                limits: DecoderLimits::default(),
            };
            if *list_only {
                list_entries(archive, &options)
            } else if *pipe {
                let mut sink = StdoutSink::new();
                extract_to_sink(archive, &mut sink, options.limits).await?;
                Ok(())
            } else {
                run_extract(archive, &options, &cli).await
            }
        }
    }
}

/// Pack `path`, detecting whether it is a file or a folder.
async fn run_compress(path: &Path, options: &CompressOptions, cli: &Cli) -> Result<()> {
    let kind = SourceKind::detect(path).await?;
    let summary = compress(path, kind, options).await?;

    if !cli.is_quiet() {
        let ratio = if summary.input_bytes > 0 {
            format!(
                "{}%",
                100i64 - (summary.archive_bytes as i64 * 100 / summary.input_bytes as i64)
            )
        } else {
            "0%".to_string()
        };
        println!(
            "{}: {} files, {} -> {} ({} saved)",
            summary.archive_path.display(),
            summary.entries,
            format_size(summary.input_bytes),
            format_size(summary.archive_bytes),
            ratio
        );
    }

    Ok(())
}

async fn run_extract(archive: &Path, options: &ExtractOptions, cli: &Cli) -> Result<()> {
    let summary = extract(archive, options).await?;

    if !cli.is_quiet() {
        println!(
            "{}: {} files, {}",
            summary.dest_dir.display(),
            summary.entries,
            format_size(summary.bytes)
        );
    }

    Ok(())
}

/// Print the archive's entries as a table, with a totals line.
fn list_entries(archive: &Path, options: &ExtractOptions) -> Result<()> {
    let entries = list(archive, options)?;

    println!("{:>10}  Name", "Length");
    println!("{}", "-".repeat(40));

    let mut total = 0u64;
    for entry in &entries {
        println!("{:>10}  {}", entry.size, entry.name);
        total += entry.size;
    }

    println!("{}", "-".repeat(40));
    println!("{:>10}  {} files", total, entries.len());

    Ok(())
}

/// Byte count for the summary lines: exact below 1 KiB, otherwise two
/// decimals in the largest binary unit that fits.
fn format_size(size: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];

    UNITS
        .iter()
        .find(|(_, scale)| size >= *scale)
        .map(|(unit, scale)| format!("{:.2} {unit}", size as f64 / *scale as f64))
        .unwrap_or_else(|| format!("{size} bytes"))
}
