//! Focus Timer - a terminal Pomodoro countdown timer
//!
//! This library provides the countdown controller, its tick scheduling and
//! the terminal surface it renders to, plus the completion chime and confetti.

pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{Capabilities, TimerController};
pub use tasks::run_event_loop;
pub use utils::signals::shutdown_signal;
