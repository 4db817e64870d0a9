//! Confline CLI - check, complete and write line-oriented config files
//!
//! Usage: confline <COMMAND> <SCHEMA> [ARGS]
//!
//! Commands:
//!   check     Load a config file and report every error
//!   show      Print the values after loading a config file
//!   complete  Print the completions of a line
//!   save      Write the current values to the config file
//!   help      Print the help for the config file
//!   paths     List the paths where the config file is looked for

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { schema, file, env } => commands::cmd_check(&schema, file.as_deref(), env),
        Commands::Show { schema, file, env } => commands::cmd_show(&schema, file.as_deref(), env),
        Commands::Complete {
            schema,
            line,
            cursor,
        } => commands::cmd_complete(&schema, &line, cursor),
        Commands::Save {
            schema,
            output,
            no_comments,
            no_multi,
        } => commands::cmd_save(&schema, output.as_deref(), !no_comments, no_multi),
        Commands::Help { schema } => commands::cmd_help(&schema),
        Commands::Paths { schema } => commands::cmd_paths(&schema),
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
