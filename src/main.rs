//! Focus Timer - a terminal Pomodoro countdown timer
//!
//! This is the main entry point for the focus-timer application.

use std::{cell::RefCell, fs::File, rc::Rc, sync::Mutex};
use tokio::sync::mpsc;
use tracing::info;

use focus_timer::{
    config::Config,
    services::{system_audio, CelebrationRenderer, ConfettiField, ConfettiLauncher},
    state::{Capabilities, TimerController},
    tasks::{run_event_loop, IntervalScheduler},
    ui::{TerminalGuard, TerminalSurface},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The timer owns stdout, so logs only go to a file when one is given
    match &config.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(config.log_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(config.log_filter())
                .with_writer(std::io::sink)
                .init();
        }
    }

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: minutes={}, seconds={}, mute={}, confetti={}",
        config.minutes, config.seconds, config.mute, !config.no_confetti
    );

    let confetti = Rc::new(RefCell::new(ConfettiField::new()));
    let celebration: Option<Box<dyn CelebrationRenderer>> = if config.no_confetti {
        None
    } else {
        Some(Box::new(ConfettiLauncher::new(Rc::clone(&confetti))))
    };
    let capabilities = Capabilities {
        audio: system_audio(config.mute),
        celebration,
    };

    let (tick_tx, tick_rx) = mpsc::unbounded_channel();

    // Restores the terminal when dropped, including on error
    let guard = TerminalGuard::enter()?;

    let surface = TerminalSurface::stdout(config.initial_inputs(), confetti);
    let controller = TimerController::new(surface, IntervalScheduler::new(tick_tx), capabilities);

    let result = run_event_loop(controller, tick_rx).await;
    drop(guard);

    info!("Focus timer shutdown complete");
    result
}
