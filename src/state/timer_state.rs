//! Countdown state and the pure parts of rendering it

use std::f64::consts::PI;

/// Default session length: 25 minutes
pub const DEFAULT_TOTAL_SECONDS: u64 = 25 * 60;

/// Circumference of the progress ring (radius 140)
pub const RING_CIRCUMFERENCE: f64 = 2.0 * PI * 140.0;

/// Suffix appended to the clock in the window title
pub const TITLE_SUFFIX: &str = " - Focus Timer";

/// Where the timer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

/// Text shown in the status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLabel {
    #[default]
    Ready,
    Focusing,
    Paused,
    Finished,
}

impl StatusLabel {
    pub fn text(&self) -> &'static str {
        match self {
            StatusLabel::Ready => "Ready to Focus",
            StatusLabel::Focusing => "Focusing...",
            StatusLabel::Paused => "Paused",
            StatusLabel::Finished => "Time's Up!",
        }
    }
}

/// Timer state for tracking the countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub phase: TimerPhase,
}

impl TimerState {
    /// Create an idle timer with the full duration remaining
    pub fn new(total_seconds: u64) -> Self {
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
            phase: TimerPhase::Idle,
        }
    }

    /// Check if the countdown is running
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Remaining share of the session, in `0.0..=1.0`
    ///
    /// A zero total yields 0 rather than dividing by zero.
    pub fn fraction(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.remaining_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    /// Length of the empty arc of the progress ring
    pub fn ring_offset(&self) -> f64 {
        RING_CIRCUMFERENCE * (1.0 - self.fraction())
    }

    /// Zero-padded `MM:SS` of the remaining time
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_SECONDS)
    }
}

/// Format seconds as `MM:SS`; minutes are not wrapped at 60
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Window title for a given clock string
pub fn window_title(clock: &str) -> String {
    format!("{}{}", clock, TITLE_SUFFIX)
}

/// Parse a duration input field the lenient way a form field is read:
/// leading whitespace, an optional sign, then leading digits. Anything
/// unparseable or negative counts as 0.
pub fn parse_field(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u64::from(d));
    }

    if negative || !seen_digit {
        0
    } else {
        value
    }
}
