//! Line-oriented input for an interactive session.
//!
//! Each stdin line is one command. Setting arguments are passed through
//! untouched so the engine applies its own parse and clamp rules.

use std::fmt;

use thiserror::Error;

// ============================================================================
// InputError
// ============================================================================

/// Errors for lines that do not form a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// First word is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command that takes no argument was given one.
    #[error("`{command}` takes no argument (got `{argument}`)")]
    UnexpectedArgument {
        /// Command name as typed
        command: String,
        /// Trailing text
        argument: String,
    },
}

impl InputError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "type `help` to list commands",
            Self::UnexpectedArgument { .. } => "only `minutes` and `seconds` take a value",
        }
    }
}

// ============================================================================
// InputCommand
// ============================================================================

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Edit the minutes field (empty text clears it)
    SetMinutes(String),
    /// Edit the seconds field (empty text clears it)
    SetSeconds(String),
    /// Start or resume
    Start,
    /// Pause
    Pause,
    /// Stop and reset
    Stop,
    /// Print the current snapshot
    Status,
    /// Print the command list
    Help,
    /// End the session
    Quit,
}

impl InputCommand {
    /// Parses one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "minutes" | "m" => return Ok(Some(Self::SetMinutes(rest.to_string()))),
            "seconds" | "s" => return Ok(Some(Self::SetSeconds(rest.to_string()))),
            "start" | "go" => Self::Start,
            "pause" | "p" => Self::Pause,
            "stop" | "x" => Self::Stop,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(InputError::UnknownCommand(word.to_string())),
        };

        if !rest.is_empty() {
            return Err(InputError::UnexpectedArgument {
                command: word.to_string(),
                argument: rest.to_string(),
            });
        }
        Ok(Some(command))
    }

    /// Usage lines for the `help` command.
    pub fn usage() -> &'static [(&'static str, &'static str)] {
        &[
            ("minutes <0-99>", "set minutes (alias: m; no value clears)"),
            ("seconds <0-99>", "set seconds (alias: s; no value clears)"),
            ("start", "start or resume (alias: go)"),
            ("pause", "pause the countdown (alias: p)"),
            ("stop", "stop and reset (alias: x)"),
            ("status", "print the current state"),
            ("help", "show this list (alias: ?)"),
            ("quit", "end the session (aliases: q, exit)"),
        ]
    }
}

impl fmt::Display for InputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetMinutes(text) => write!(f, "minutes {}", text),
            Self::SetSeconds(text) => write!(f, "seconds {}", text),
            Self::Start => write!(f, "start"),
            Self::Pause => write!(f, "pause"),
            Self::Stop => write!(f, "stop"),
            Self::Status => write!(f, "status"),
            Self::Help => write!(f, "help"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
