//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{CountdownConfig, OutputFormat};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown - a terminal countdown timer
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "Terminal countdown timer with pause, resume and reset",
    long_about = "Counts down a duration of up to 99:99 once per second.\n\
                  Type commands on stdin (minutes, seconds, start, pause, stop, status, quit);\n\
                  every state change is printed to stdout.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Session options
    #[command(flatten)]
    pub run: RunArgs,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Session Arguments
// ============================================================================

/// Arguments for an interactive countdown session
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Initial minutes (0-99)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(0..=99)
    )]
    pub minutes: Option<u32>,

    /// Initial seconds (0-99)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(0..=99)
    )]
    pub seconds: Option<u32>,

    /// Start counting immediately
    #[arg(long)]
    pub start: bool,

    /// Print each state change as a JSON line
    #[arg(long)]
    pub json: bool,
}

impl From<&RunArgs> for CountdownConfig {
    fn from(args: &RunArgs) -> Self {
        Self {
            minutes: args.minutes,
            seconds: args.seconds,
            auto_start: args.start,
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
