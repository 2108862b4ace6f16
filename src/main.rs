//! combine-configs CLI
//!
//! Generates the conditional kernel config for a platform defconfig and
//! optionally prints the merge command for the final kernel config.

use clap::Parser;
use kconfig_fragment::ConditionalOutput;
use kconfig_tools::{
    run, AndroidVersion, CombineError, CombineRequest, Destination, MergeCommand,
    SettingsOverrides, ToolSettings,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "combine-configs")]
#[command(about = "Generate the conditional kernel config for a platform defconfig", version)]
struct Cli {
    /// The path to the platform defconfig
    #[arg(long)]
    defconfig: PathBuf,

    /// The target android version to be used (., o, o-mr1, p)
    #[arg(long, default_value = ".")]
    aversion: String,

    /// Root of the kernel configs repository (default: current directory)
    #[arg(long)]
    configs_root: Option<PathBuf>,

    /// Path to a TOML settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the conditional config here instead of the configs repository
    #[arg(long, short = 'o', conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the conditional config instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Print as JSON (with --stdout)
    #[arg(long, requires = "stdout")]
    json: bool,

    /// Specify if example commands should be printed
    #[arg(long = "print-commands")]
    print_helper: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
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

    let android_version: AndroidVersion = match cli.aversion.parse() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let settings = match ToolSettings::resolve(
        cli.settings.as_deref(),
        SettingsOverrides {
            configs_root: cli.configs_root,
        },
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    let destination = match (cli.output, cli.stdout) {
        (Some(path), _) => Destination::File(path),
        (None, true) => Destination::Stdout,
        (None, false) => Destination::Derived,
    };

    let request = CombineRequest {
        defconfig: cli.defconfig,
        android_version,
        configs_root: settings.configs_root.clone(),
        destination,
    };

    let report = match run(&request) {
        Ok(report) => report,
        Err(e @ CombineError::KernelVersion { .. }) => {
            eprintln!("{}", e);
            eprintln!("Please check and try again");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match &report.output {
        ConditionalOutput::NoGroups => {}
        ConditionalOutput::Written { path, .. } => {
            eprintln!("Wrote: {}", path.display());
        }
        ConditionalOutput::Rendered(resolved) => {
            if cli.json {
                match resolved.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print!("{}", resolved.render());
            }
        }
    }

    if cli.print_helper {
        let command = MergeCommand::new(
            &report.plan.location,
            &report.plan.layout,
            &settings.merge_script,
        );
        print!("{}", command.render());
    }
}
