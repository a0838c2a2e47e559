//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Timer phase and the controls available in each phase
//! - The user-edited setting duration with its parse/clamp rules
//! - Snapshots handed to output sinks
//! - Front-end configuration with validation

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Largest value a minute or second setting field accepts.
pub const FIELD_MAX: u32 = 99;

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No countdown in progress
    #[default]
    Idle,
    /// Counting down once per second
    Running,
    /// Countdown frozen, remaining time kept
    Paused,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
        }
    }

    /// Returns true if the countdown is ticking.
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Action
// ============================================================================

/// User intents that change the timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start a new countdown or resume a paused one
    Start,
    /// Freeze the running countdown
    Pause,
    /// Cancel and reset the countdown
    Stop,
}

impl Action {
    /// Returns the input command name for this action.
    pub fn as_command(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

// ============================================================================
// Setting fields
// ============================================================================

/// Parses text typed into a minute or second field.
///
/// Returns `None` when the field was cleared (empty or whitespace only).
/// Any other text yields a value in `0..=FIELD_MAX`: integers are clamped,
/// however many digits they have, and anything non-numeric becomes 0.
pub fn parse_field(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(0);
    }
    if negative {
        return Some(0);
    }

    // Leading zeros carry no magnitude; anything with 3+ significant digits
    // is above the cap regardless of machine integer width.
    let significant = digits.trim_start_matches('0');
    if significant.len() > 2 {
        return Some(FIELD_MAX);
    }
    Some(significant.parse::<u32>().unwrap_or(0).min(FIELD_MAX))
}

/// Canonical text for a field value: cleared fields are empty, everything
/// else is zero-padded to two digits.
pub fn field_text(value: Option<u32>) -> String {
    match value {
        Some(v) => format!("{:02}", v),
        None => String::new(),
    }
}

/// The user-edited duration, before a countdown starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingDuration {
    /// Minutes field, `None` when cleared
    pub minutes: Option<u32>,
    /// Seconds field, `None` when cleared
    pub seconds: Option<u32>,
}

impl SettingDuration {
    /// Creates a setting from already-validated field values.
    pub fn new(minutes: Option<u32>, seconds: Option<u32>) -> Self {
        Self {
            minutes: minutes.map(|m| m.min(FIELD_MAX)),
            seconds: seconds.map(|s| s.min(FIELD_MAX)),
        }
    }

    /// Splits a number of seconds back into setting fields.
    ///
    /// Minutes are capped at `FIELD_MAX` and the rest is carried in the
    /// seconds field, so any duration a setting can produce
    /// (up to 99:99) maps back without loss.
    pub fn from_seconds(total: u32) -> Self {
        let minutes = (total / 60).min(FIELD_MAX);
        let seconds = (total - minutes * 60).min(FIELD_MAX);
        Self {
            minutes: Some(minutes),
            seconds: Some(seconds),
        }
    }

    /// Updates the minutes field from user text.
    pub fn set_minutes_text(&mut self, text: &str) {
        self.minutes = parse_field(text);
    }

    /// Updates the seconds field from user text.
    pub fn set_seconds_text(&mut self, text: &str) {
        self.seconds = parse_field(text);
    }

    /// Canonical minutes text.
    pub fn minutes_text(&self) -> String {
        field_text(self.minutes)
    }

    /// Canonical seconds text.
    pub fn seconds_text(&self) -> String {
        field_text(self.seconds)
    }

    /// Returns true if both fields are cleared.
    pub fn is_cleared(&self) -> bool {
        self.minutes.is_none() && self.seconds.is_none()
    }

    /// Total duration in seconds, reading cleared fields as 0.
    pub fn total_seconds(&self) -> u32 {
        self.minutes.unwrap_or(0) * 60 + self.seconds.unwrap_or(0)
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Fraction of the captured duration still remaining.
///
/// Returns 0 when no duration has been captured yet.
pub fn progress_fraction(remaining_seconds: u32, total_seconds: u32) -> f32 {
    if total_seconds == 0 {
        0.0
    } else {
        remaining_seconds as f32 / total_seconds as f32
    }
}

/// Everything an output sink may read about the timer at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Seconds left in the countdown
    pub remaining_seconds: u32,
    /// Duration captured when the countdown started
    pub total_seconds: u32,
    /// Remaining fraction in `0.0..=1.0`
    pub progress: f32,
    /// Remaining whole minutes, zero-padded
    pub remaining_minutes_text: String,
    /// Remaining seconds within the minute, zero-padded
    pub remaining_seconds_text: String,
    /// Setting minutes field as displayed
    pub setting_minutes_text: String,
    /// Setting seconds field as displayed
    pub setting_seconds_text: String,
}

impl TimerSnapshot {
    /// Builds a snapshot, deriving the display texts.
    pub fn new(
        phase: Phase,
        remaining_seconds: u32,
        total_seconds: u32,
        progress: f32,
        setting: &SettingDuration,
    ) -> Self {
        Self {
            phase,
            remaining_seconds,
            total_seconds,
            progress,
            remaining_minutes_text: format!("{:02}", remaining_seconds / 60),
            remaining_seconds_text: format!("{:02}", remaining_seconds % 60),
            setting_minutes_text: setting.minutes_text(),
            setting_seconds_text: setting.seconds_text(),
        }
    }

    /// Returns the actions that would change state right now.
    pub fn available_actions(&self) -> Vec<Action> {
        match self.phase {
            Phase::Running => vec![Action::Pause, Action::Stop],
            Phase::Paused => vec![Action::Start, Action::Stop],
            Phase::Idle if self.total_seconds > 0 => vec![Action::Start, Action::Stop],
            Phase::Idle => vec![Action::Start],
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new(Phase::Idle, 0, 0, 0.0, &SettingDuration::default())
    }
}

// ============================================================================
// Output format & configuration
// ============================================================================

/// How snapshots are written to the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable status line per change
    #[default]
    Text,
    /// One JSON object per change
    Json,
}

/// Configuration for a terminal countdown session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Initial minutes field (0-99)
    pub minutes: Option<u32>,
    /// Initial seconds field (0-99)
    pub seconds: Option<u32>,
    /// Whether to start counting as soon as the session opens
    pub auto_start: bool,
    /// Output format for snapshots
    pub format: OutputFormat,
}

impl CountdownConfig {
    /// Sets the initial minutes field.
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = Some(minutes);
        self
    }

    /// Sets the initial seconds field.
    pub fn with_seconds(mut self, seconds: u32) -> Self {
        self.seconds = Some(seconds);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.minutes.is_some_and(|m| m > FIELD_MAX) {
            return Err(format!("minutes must be between 0 and {}", FIELD_MAX));
        }
        if self.seconds.is_some_and(|s| s > FIELD_MAX) {
            return Err(format!("seconds must be between 0 and {}", FIELD_MAX));
        }
        Ok(())
    }

    /// The initial setting this configuration describes.
    pub fn setting(&self) -> SettingDuration {
        SettingDuration::new(self.minutes, self.seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
