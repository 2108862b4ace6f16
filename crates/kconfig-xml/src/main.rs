//! kconfig-xml-fixup
//!
//! Usage: kconfig-xml-fixup [--repo-root DIR] [--output-dir DIR]
//!        [--output-matrix FILE] [--output-version FILE] <INPUT>...
//!
//! Rewrites each conditional config XML input into a `-parsed.xml` file
//! the compatibility matrix can consume.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use kconfig_xml::{fixup_file, FixupRequest};
use tracing_subscriber::EnvFilter;

/// Exit status for every failure (reported as 255).
const EXIT_FAILURE: i32 = -1;

#[derive(Parser)]
#[command(name = "kconfig-xml-fixup")]
#[command(about = "Convert kernel conditional config XML for the compatibility matrix", version)]
struct Cli {
    /// Root of the kernel configs repository; inputs are relative to it
    #[arg(long)]
    repo_root: Option<PathBuf>,

    /// Directory receiving the -parsed.xml outputs
    #[arg(long, conflicts_with = "output_matrix")]
    output_dir: Option<PathBuf>,

    /// Explicit output file (single input only)
    #[arg(long)]
    output_matrix: Option<PathBuf>,

    /// Write the minimum LTS version to this file (single input only)
    #[arg(long)]
    output_version: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Conditional config XML files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let request = FixupRequest {
        repo_root: cli.repo_root,
        output_dir: cli.output_dir,
        output_matrix: cli.output_matrix,
        output_version: cli.output_version,
        inputs: cli.inputs,
    };

    let jobs = match request.jobs() {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    for job in &jobs {
        if let Err(e) = fixup_file(job) {
            eprintln!("{}: {}", job.source.display(), e);
            process::exit(EXIT_FAILURE);
        }
    }
}
