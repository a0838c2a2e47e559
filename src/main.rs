//! Countdown CLI - a terminal countdown timer
//!
//! Reads commands from stdin and prints every state change:
//! - `minutes` / `seconds` edit the duration (0-99 each)
//! - `start`, `pause`, `stop` drive the countdown
//! - `status`, `help`, `quit`

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use countdown::cli::{Cli, Commands, Display, InputCommand};
use countdown::{CountdownConfig, OutputFormat, TimerEngine};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only the display.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => {
            let config = CountdownConfig::from(&cli.run);
            config.validate().map_err(anyhow::Error::msg)?;
            run_session(config).await
        }
    }
}

/// What the session loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs one interactive countdown session until `quit`, Ctrl-C or end of
/// input. At end of input a running countdown is allowed to finish.
async fn run_session(config: CountdownConfig) -> Result<()> {
    let engine = TimerEngine::new();
    let format = config.format;

    engine.subscribe(move |snapshot| Display::show_snapshot(snapshot, format));

    let (phase_tx, mut phase_rx) = watch::channel(engine.phase());
    engine.subscribe(move |snapshot| {
        phase_tx.send_replace(snapshot.phase);
    });

    if let Some(minutes) = config.minutes {
        engine.set_minutes(&minutes.to_string());
    }
    if let Some(seconds) = config.seconds {
        engine.set_seconds(&seconds.to_string());
    }
    if config.auto_start {
        engine.start();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match InputCommand::parse(&line) {
                    Ok(Some(command)) => {
                        tracing::debug!(%command, "input");
                        if dispatch(&engine, command, format) == Flow::Quit {
                            return Ok(());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => Display::show_input_error(&e),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                interrupt(&engine);
                return Ok(());
            }
        }
    }

    // End of input: let a running countdown reach zero.
    if engine.phase().is_running() {
        tokio::select! {
            result = phase_rx.wait_for(|phase| !phase.is_running()) => {
                result.context("Engine notifications closed")?;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                interrupt(&engine);
            }
        }
    }
    Ok(())
}

/// Stops the engine on Ctrl-C so no tick outlives the session.
fn interrupt(engine: &TimerEngine) {
    tracing::info!("Interrupted");
    engine.stop();
}

/// Forwards one input command to the engine.
fn dispatch(engine: &TimerEngine, command: InputCommand, format: OutputFormat) -> Flow {
    match command {
        InputCommand::SetMinutes(text) => engine.set_minutes(&text),
        InputCommand::SetSeconds(text) => engine.set_seconds(&text),
        InputCommand::Start => engine.start(),
        InputCommand::Pause => engine.pause(),
        InputCommand::Stop => engine.stop(),
        InputCommand::Status => Display::show_snapshot(&engine.snapshot(), format),
        InputCommand::Help => Display::show_help(),
        InputCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
