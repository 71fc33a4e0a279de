#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rebind_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rebind")]
#[command(author, version, about = "Hygienic renaming for JavaScript syntax trees", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Config file to use instead of ./rebind.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Rename every declaration in ESTree JSON programs to a unique name
    Rename {
        /// ESTree JSON files, or directories to search for *.json
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Write <stem>.js files to this directory instead of stdout
        #[arg(long, short = 'o', value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Text between an original name and its counter (default "$")
        #[arg(long, env = "REBIND_SEPARATOR")]
        separator: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config: defaults, then rebind.json, then flags
    let config = Config::load(cwd.clone(), cli.config.as_deref())
        .into_diagnostic()?
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Rename {
            paths,
            out_dir,
            separator,
        }) => {
            let config = match separator {
                Some(separator) => config.with_separator(separator).into_diagnostic()?,
                None => config,
            };
            let span = tracing::info_span!("rename", cmd = "rename", cwd = %cwd.display());
            let _guard = span.enter();
            commands::rename::run(
                &config,
                commands::rename::RenameAction { paths, out_dir },
                cli.json,
            )
        }
    }
}
