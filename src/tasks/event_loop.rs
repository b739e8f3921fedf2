//! Event loop that owns the controller and feeds it input, ticks and frames

use std::{io::Write, ops::ControlFlow, time::Duration};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::stream::StreamExt;
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::ticker::{TickId, TickScheduler};
use crate::{
    state::TimerController,
    ui::{map_key, Command, Surface, TerminalSurface},
    utils::shutdown_signal,
};

/// Confetti animation frame interval
const FRAME_PERIOD: Duration = Duration::from_millis(33);

/// Apply one user command to the controller
pub fn dispatch<S: Surface, T: TickScheduler>(
    controller: &mut TimerController<S, T>,
    command: Command,
) -> ControlFlow<()> {
    match command {
        Command::Quit => return ControlFlow::Break(()),
        Command::Toggle => controller.toggle(),
        Command::Reset => controller.reset(),
        Command::NextField => {
            controller.surface_mut().inputs_mut().switch_focus();
            controller.render();
        }
        Command::Digit(digit) => {
            if controller.surface_mut().inputs_mut().push_digit(digit) {
                controller.apply_duration_inputs();
            }
            controller.render();
        }
        Command::Backspace => {
            controller.surface_mut().inputs_mut().backspace();
            controller.apply_duration_inputs();
            controller.render();
        }
    }
    ControlFlow::Continue(())
}

/// Run until the user quits, input ends or a shutdown signal arrives
pub async fn run_event_loop<W: Write, T: TickScheduler>(
    mut controller: TimerController<TerminalSurface<W>, T>,
    mut ticks: mpsc::UnboundedReceiver<TickId>,
) -> anyhow::Result<()> {
    info!("Starting event loop");

    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_PERIOD);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(id) = ticks.recv() => {
                controller.on_tick(id);
            }

            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let Some(command) = map_key(key) else { continue };
                    debug!("Command: {:?}", command);
                    if dispatch(&mut controller, command).is_break() {
                        info!("Quit requested");
                        break;
                    }
                }
                Some(Ok(Event::Resize(cols, rows))) => {
                    if let Err(e) = controller.surface_mut().resize(cols, rows) {
                        warn!("Failed to redraw after resize: {}", e);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("Terminal input error: {}", e);
                    return Err(e.into());
                }
                None => {
                    info!("Terminal input closed");
                    break;
                }
            },

            _ = frames.tick() => {
                if let Err(e) = controller.surface_mut().animate() {
                    warn!("Failed to draw confetti frame: {}", e);
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(
        "Event loop finished with {}s of {}s remaining",
        controller.state().remaining_seconds,
        controller.state().total_seconds
    );
    Ok(())
}
