//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::ui::DurationInputs;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "focus-timer")]
#[command(about = "A terminal Pomodoro timer with a progress ring, chime and confetti")]
#[command(version)]
pub struct Config {
    /// Initial value of the minutes field
    #[arg(short, long, default_value = "25")]
    pub minutes: String,

    /// Initial value of the seconds field
    #[arg(short, long, default_value = "0")]
    pub seconds: String,

    /// Never play the completion chime
    #[arg(long)]
    pub mute: bool,

    /// Skip the confetti when a session completes
    #[arg(long)]
    pub no_confetti: bool,

    /// Write logs to this file (the terminal is taken by the timer)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Tracing filter directive for this crate
    pub fn log_filter(&self) -> String {
        format!("focus_timer={}", self.log_level())
    }

    /// Duration fields as typed on the command line
    pub fn initial_inputs(&self) -> DurationInputs {
        DurationInputs::new(self.minutes.clone(), self.seconds.clone())
    }
}
