//! Display utilities for the countdown CLI.
//!
//! This module provides formatted output for:
//! - Snapshot lines (text or JSON)
//! - Help and error messages

use std::io::{self, Write};

use tracing::warn;

use crate::cli::input::{InputCommand, InputError};
use crate::types::{Action, OutputFormat, Phase, TimerSnapshot};

/// Width of the text progress bar, in cells.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Writes one snapshot to stdout in the given format.
    ///
    /// A failed write (stdout closed) is logged and skipped.
    pub fn show_snapshot(snapshot: &TimerSnapshot, format: OutputFormat) {
        if let Err(e) = Self::write_snapshot(&mut io::stdout().lock(), snapshot, format) {
            warn!("Failed to write snapshot: {}", e);
        }
    }

    /// Writes one snapshot line to `out`. JSON encode failures are logged and
    /// skipped; only write failures are returned.
    pub fn write_snapshot<W: Write>(
        out: &mut W,
        snapshot: &TimerSnapshot,
        format: OutputFormat,
    ) -> io::Result<()> {
        match format {
            OutputFormat::Text => writeln!(out, "{}", Self::render(snapshot)),
            OutputFormat::Json => match serde_json::to_string(snapshot) {
                Ok(line) => writeln!(out, "{}", line),
                Err(e) => {
                    warn!("Failed to encode snapshot: {}", e);
                    Ok(())
                }
            },
        }
    }

    /// Renders a snapshot as a single status line.
    ///
    /// While running the remaining time and progress are shown; otherwise the
    /// setting fields are, with cleared fields as `--`.
    pub fn render(snapshot: &TimerSnapshot) -> String {
        let controls = Self::format_actions(&snapshot.available_actions());
        match snapshot.phase {
            Phase::Running => format!(
                "> {}:{} {} {:>3}%  [{}]",
                snapshot.remaining_minutes_text,
                snapshot.remaining_seconds_text,
                Self::progress_bar(snapshot.progress, BAR_WIDTH),
                Self::percent(snapshot.progress),
                controls
            ),
            Phase::Paused => format!(
                "|| {}:{} {} {:>3}%  paused  [{}]",
                snapshot.remaining_minutes_text,
                snapshot.remaining_seconds_text,
                Self::progress_bar(snapshot.progress, BAR_WIDTH),
                Self::percent(snapshot.progress),
                controls
            ),
            Phase::Idle => format!(
                "[] set {}:{}  [{}]",
                Self::field_or_blank(&snapshot.setting_minutes_text),
                Self::field_or_blank(&snapshot.setting_seconds_text),
                controls
            ),
        }
    }

    /// Shows the list of input commands.
    pub fn show_help() {
        if let Err(e) = Self::write_help(&mut io::stdout().lock()) {
            warn!("Failed to write help: {}", e);
        }
    }

    fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
        writeln!(out, "Commands:")?;
        for (command, description) in InputCommand::usage() {
            writeln!(out, "  {:<16} {}", command, description)?;
        }
        Ok(())
    }

    /// Shows an input error with its suggestion.
    pub fn show_input_error(error: &InputError) {
        eprintln!("error: {} ({})", error, error.suggestion());
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Builds a bar of `width` cells, filled in proportion to `progress`.
    fn progress_bar(progress: f32, width: usize) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    fn percent(progress: f32) -> u32 {
        (progress.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    fn field_or_blank(text: &str) -> &str {
        if text.is_empty() {
            "--"
        } else {
            text
        }
    }

    fn format_actions(actions: &[Action]) -> String {
        actions
            .iter()
            .map(Action::as_command)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

// ============================================================================
// Tests
// ============================================================================
