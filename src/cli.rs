// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use yardcheck::record::ActivityKind;

#[derive(Parser)]
#[command(name = "yardcheck")]
#[command(about = "Container number validation and depot activity tracking")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new yardcheck.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate one or more container numbers
    Validate {
        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Compute the check digit for an owner code and serial (10 characters)
    CheckDigit { prefix: String },

    /// Show the activity statuses of a container
    Status { number: String },

    /// Submit an activity for a container from a YAML session script
    Submit {
        number: String,

        /// cleaning, repair, periodic or survey
        activity: ActivityKind,

        /// Session script with photos, dates, and decisions
        #[arg(short, long)]
        input: PathBuf,

        /// Continue past confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },
}
