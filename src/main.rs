use anyhow::{Context, Result};
use clap::Parser;
use copyrightrs::{AnalyzerOptions, CopyrightAnalyzer};
use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Infer the author and copyright holder of a saved HTML page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTML file to analyse, or `-` to read standard input
    input: PathBuf,

    /// URL the page was fetched from (reported, not used for scoring)
    #[arg(short, long)]
    url: Option<String>,

    /// Minimum score a candidate needs to be reported
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Print the attribution only, without page info and candidates
    #[arg(long)]
    result_only: bool,

    /// Single-line JSON instead of pretty-printed output
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let bytes = read_input(&cli.input)?;
    debug!("read {} bytes from {}", bytes.len(), cli.input.display());

    let mut builder = AnalyzerOptions::builder();
    if let Some(threshold) = cli.threshold {
        builder = builder.acceptance_threshold(threshold);
    }
    let options = builder.extract_page_info(!cli.result_only).build();

    let analyzer = CopyrightAnalyzer::from_bytes(&bytes, cli.url.as_deref(), Some(options))
        .with_context(|| format!("cannot analyse {}", cli.input.display()))?;

    let json = if cli.result_only {
        to_json(&analyzer.attribution(), cli.compact)?
    } else {
        to_json(&analyzer.analyze(), cli.compact)?
    };
    println!("{}", json);
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read standard input")?;
        return Ok(buffer);
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}
