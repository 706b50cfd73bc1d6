#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

mod aliases;
mod commands;
mod logging;

use aliases::AliasArgs;
use clap::Parser;
use miette::Result;
use modalias_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modalias")]
#[command(author, version, about = "Inspect and test module alias resolution", long_about = None)]
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

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve requests through the alias table and a lexical loader
    Resolve {
        /// Requests to resolve (e.g. `@app/core/util`)
        #[arg(required = true)]
        requests: Vec<String>,

        /// Directory of the importing module, for relative requests
        #[arg(long, value_name = "DIR")]
        from: Option<PathBuf>,

        #[command(flatten)]
        aliases: AliasArgs,
    },

    /// List registered aliases in match-priority order
    List {
        #[command(flatten)]
        aliases: AliasArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);

    let alias_args = match &cli.command {
        Some(Commands::Resolve { aliases, .. } | Commands::List { aliases }) => Some(aliases),
        Some(Commands::Version) | None => None,
    };

    // Build config
    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_alias_file(alias_args.and_then(|a| a.config.clone()))
        .with_discovery(!alias_args.is_some_and(|a| a.no_config));

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Resolve {
            requests,
            from,
            aliases,
        }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            commands::resolve::run(&config, &aliases, &requests, from.as_deref(), cli.json)
        }
        Some(Commands::List { aliases }) => {
            let span = tracing::info_span!("list", cmd = "list", cwd = %cwd.display());
            let _guard = span.enter();
            commands::list::run(&config, &aliases, cli.json)
        }
    }
}
