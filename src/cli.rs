use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Confline - check, complete and write line-oriented config files
#[derive(Parser, Debug)]
#[command(name = "confline")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(after_help = "The settings of the application are declared in a TOML schema file.")]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a config file and report every error (exits non-zero on errors)
    Check {
        /// Schema declaring the settings
        schema: PathBuf,

        /// Config file to check instead of the first existing default file
        file: Option<PathBuf>,

        /// Load the environment variables of the application as well
        #[arg(long)]
        env: bool,
    },

    /// Print the values after loading a config file
    Show {
        /// Schema declaring the settings
        schema: PathBuf,

        /// Config file to load instead of the first existing default file
        file: Option<PathBuf>,

        /// Load the environment variables of the application as well
        #[arg(long)]
        env: bool,
    },

    /// Print the completions of a line, one completed line per candidate
    Complete {
        /// Schema declaring the settings
        schema: PathBuf,

        /// The line typed so far
        line: String,

        /// Byte offset of the cursor, defaults to the end of the line
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Write the current values to the config file
    Save {
        /// Schema declaring the settings
        schema: PathBuf,

        /// Write to this file instead of the default config file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not explain the settings in comments
        #[arg(long)]
        no_comments: bool,

        /// Do not write the values of specific groups
        #[arg(long)]
        no_multi: bool,
    },

    /// Print the help for the config file
    Help {
        /// Schema declaring the settings
        schema: PathBuf,
    },

    /// List the paths where the config file is looked for, most important first
    Paths {
        /// Schema declaring the settings
        schema: PathBuf,
    },
}
