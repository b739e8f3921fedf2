//! View model derived from the timer state on every render

use chrono::{DateTime, Local};

use crate::state::{window_title, StatusLabel, TimerPhase, TimerState};

/// What the start/pause control currently offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAffordance {
    Start,
    Pause,
}

impl ControlAffordance {
    pub fn icon(&self) -> &'static str {
        match self {
            ControlAffordance::Start => "▶",
            ControlAffordance::Pause => "||",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlAffordance::Start => "Start",
            ControlAffordance::Pause => "Pause",
        }
    }
}

/// Most recent user action, shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAction {
    pub action: &'static str,
    pub at: DateTime<Local>,
}

impl LastAction {
    pub fn now(action: &'static str) -> Self {
        Self {
            action,
            at: Local::now(),
        }
    }

    pub fn describe(&self) -> String {
        format!("{} at {}", self.action, self.at.format("%H:%M:%S"))
    }
}

/// Everything a surface needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub clock: String,
    pub title: String,
    /// Remaining share of the session, `0.0..=1.0`
    pub fraction: f64,
    /// Empty arc length of the progress ring
    pub ring_offset: f64,
    pub status: StatusLabel,
    pub control: ControlAffordance,
    /// Page-level "active" styling flag
    pub active: bool,
    pub phase: TimerPhase,
    pub last_action: Option<String>,
}

impl TimerView {
    pub fn new(state: &TimerState, status: StatusLabel, last_action: Option<&LastAction>) -> Self {
        let clock = state.clock();
        let running = state.is_running();

        Self {
            title: window_title(&clock),
            clock,
            fraction: state.fraction(),
            ring_offset: state.ring_offset(),
            status,
            control: if running {
                ControlAffordance::Pause
            } else {
                ControlAffordance::Start
            },
            active: running,
            phase: state.phase,
            last_action: last_action.map(LastAction::describe),
        }
    }
}
