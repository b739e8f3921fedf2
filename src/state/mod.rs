//! State management module
//!
//! This module contains the countdown state and the controller that owns it.

pub mod controller;
pub mod timer_state;

// Re-export main types
pub use controller::{Capabilities, TimerController};
pub use timer_state::{
    format_clock, parse_field, window_title, StatusLabel, TimerPhase, TimerState,
    DEFAULT_TOTAL_SECONDS, RING_CIRCUMFERENCE, TITLE_SUFFIX,
};
