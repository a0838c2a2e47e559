//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown CLI.
//! It includes:
//! - Timer engine with Idle/Running/Paused phases and a one-second tick task
//! - Observer registry delivering snapshots after every state change
//! - CLI command parsing, session input and display utilities
//! - Type definitions for settings, snapshots and configuration

pub mod cli;
pub mod engine;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{SubscriptionId, TickHandle, TimerEngine};
pub use types::{
    Action, CountdownConfig, OutputFormat, Phase, SettingDuration, TimerSnapshot, FIELD_MAX,
};
