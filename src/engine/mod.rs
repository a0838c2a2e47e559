//! Countdown engine module.
//!
//! This module contains the core countdown functionality:
//! - `timer`: Timer engine with state transitions and countdown logic
//! - `ticker`: Cancellable one-second repeating task
//! - `observer`: Listener registry for snapshot notifications

pub mod observer;
pub mod ticker;
pub mod timer;

pub use observer::{Listener, Observers, SubscriptionId};
pub use ticker::{TickHandle, TICK_PERIOD};
pub use timer::TimerEngine;
