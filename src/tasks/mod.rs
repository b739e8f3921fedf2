//! Background tasks module
//!
//! This module contains the tick scheduler and the event loop that drives
//! the controller.

pub mod event_loop;
pub mod ticker;

// Re-export main functions
pub use event_loop::{dispatch, run_event_loop};
pub use ticker::{IntervalScheduler, TickHandle, TickId, TickScheduler, TICK_PERIOD};
