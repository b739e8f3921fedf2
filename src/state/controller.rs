//! The timer controller: owns the countdown and drives every side effect

use tracing::{debug, info, warn};

use super::{parse_field, StatusLabel, TimerPhase, TimerState, DEFAULT_TOTAL_SECONDS};
use crate::{
    services::{celebration_bursts, AudioSlot, CelebrationRenderer, Chime},
    tasks::ticker::{TickHandle, TickId, TickScheduler, TICK_PERIOD},
    ui::{LastAction, Surface, TimerView},
};

/// Optional collaborators used when a session completes
pub struct Capabilities {
    pub audio: AudioSlot,
    pub celebration: Option<Box<dyn CelebrationRenderer>>,
}

impl Capabilities {
    /// No sound and no confetti
    pub fn none() -> Self {
        Self {
            audio: AudioSlot::unavailable(),
            celebration: None,
        }
    }
}

/// Countdown controller with a start/pause/reset/complete state machine
pub struct TimerController<S: Surface, T: TickScheduler> {
    state: TimerState,
    status: StatusLabel,
    surface: S,
    scheduler: T,
    /// The only live tick, if any
    tick: Option<TickHandle>,
    next_tick_id: u64,
    audio: AudioSlot,
    celebration: Option<Box<dyn CelebrationRenderer>>,
    last_action: Option<LastAction>,
}

impl<S: Surface, T: TickScheduler> TimerController<S, T> {
    /// Build the controller, draw the initial frame and apply the
    /// surface's current duration inputs
    pub fn new(surface: S, scheduler: T, capabilities: Capabilities) -> Self {
        let mut controller = Self {
            state: TimerState::new(DEFAULT_TOTAL_SECONDS),
            status: StatusLabel::Ready,
            surface,
            scheduler,
            tick: None,
            next_tick_id: 0,
            audio: capabilities.audio,
            celebration: capabilities.celebration,
            last_action: None,
        };
        controller.render();

        // Initial field values are not a user action
        let inputs = controller.surface.inputs();
        let (minutes, seconds) = (parse_field(&inputs.minutes), parse_field(&inputs.seconds));
        controller.update_duration(minutes, seconds);
        controller
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    pub fn status(&self) -> StatusLabel {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Id of the live tick, if the countdown is running
    pub fn active_tick(&self) -> Option<TickId> {
        self.tick.as_ref().map(TickHandle::id)
    }

    pub fn last_action(&self) -> Option<&LastAction> {
        self.last_action.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Set a new session length. A zero total is ignored so the last valid
    /// duration stays in effect.
    pub fn set_custom_duration(&mut self, minutes: u64, seconds: u64) {
        if self.update_duration(minutes, seconds) {
            self.record("duration");
        }
    }

    /// Apply a duration; returns false when it was ignored
    ///
    /// A completed timer that gets a fresh duration goes back to idle, so it
    /// can only run again through the normal Idle -> Running start.
    fn update_duration(&mut self, minutes: u64, seconds: u64) -> bool {
        let total = minutes.saturating_mul(60).saturating_add(seconds);
        if total == 0 {
            debug!("Ignoring zero custom duration");
            return false;
        }

        self.state.total_seconds = total;

        if self.is_running() {
            // Keep remaining <= total; the next tick redraws
            self.state.remaining_seconds = self.state.remaining_seconds.min(total);
            debug!("Custom duration set to {}s while running", total);
        } else {
            self.state.remaining_seconds = total;
            if self.state.phase == TimerPhase::Completed {
                self.state.phase = TimerPhase::Idle;
                self.status = StatusLabel::Ready;
            }
            info!("Custom duration set to {}s", total);
            self.render();
        }
        true
    }

    /// Set the duration from raw field text
    pub fn set_custom_duration_from_input(&mut self, minutes: &str, seconds: &str) {
        self.set_custom_duration(parse_field(minutes), parse_field(seconds));
    }

    /// Re-read the surface's duration fields
    pub fn apply_duration_inputs(&mut self) {
        let inputs = self.surface.inputs();
        let (minutes, seconds) = (parse_field(&inputs.minutes), parse_field(&inputs.seconds));
        self.set_custom_duration(minutes, seconds);
    }

    /// Start when stopped, pause when running
    pub fn toggle(&mut self) {
        if let Some(output) = self.audio.acquire() {
            if let Err(e) = output.resume() {
                warn!("Failed to resume audio output: {}", e);
            }
        }

        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    fn start(&mut self) {
        if self.state.phase == TimerPhase::Completed || self.state.remaining_seconds == 0 {
            debug!("Nothing left to count down, start ignored");
            return;
        }

        // Release any previous tick before scheduling a new one
        self.tick = None;
        let id = TickId(self.next_tick_id);
        self.next_tick_id += 1;
        self.tick = Some(self.scheduler.schedule(id, TICK_PERIOD));

        self.state.phase = TimerPhase::Running;
        self.status = StatusLabel::Focusing;
        self.record("start");
        info!("Timer started with {}s remaining", self.state.remaining_seconds);
        self.render();
    }

    fn pause(&mut self) {
        self.tick = None;
        self.state.phase = TimerPhase::Paused;
        self.status = StatusLabel::Paused;
        self.record("pause");
        info!("Timer paused at {}s", self.state.remaining_seconds);
        self.render();
    }

    /// Stop and rewind to the full duration
    pub fn reset(&mut self) {
        self.tick = None;
        self.state.remaining_seconds = self.state.total_seconds;
        self.state.phase = TimerPhase::Idle;
        self.status = StatusLabel::Ready;
        self.record("reset");
        info!("Timer reset to {}s", self.state.total_seconds);
        self.render();
    }

    /// Handle a tick delivered by the scheduler
    ///
    /// Ticks from a cancelled handle may still be queued; they are dropped.
    pub fn on_tick(&mut self, id: TickId) {
        if self.active_tick() != Some(id) {
            debug!("Ignoring stale tick {:?}", id);
            return;
        }
        self.tick();
    }

    fn tick(&mut self) {
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        debug!("Tick: {}s remaining", self.state.remaining_seconds);
        self.render();

        if self.state.remaining_seconds == 0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.tick = None;
        self.state.remaining_seconds = 0;
        self.state.phase = TimerPhase::Completed;
        self.status = StatusLabel::Finished;
        info!("Timer complete");
        self.render();

        self.play_chime();
        self.celebrate();
    }

    fn play_chime(&mut self) {
        match self.audio.get() {
            Some(output) => {
                if let Err(e) = output.play(&Chime::completion()) {
                    warn!("Failed to play completion chime: {}", e);
                }
            }
            None => debug!("No audio output, skipping chime"),
        }
    }

    fn celebrate(&mut self) {
        match self.celebration.as_mut() {
            Some(renderer) => {
                for burst in celebration_bursts() {
                    renderer.burst(&burst);
                }
            }
            None => debug!("No celebration renderer, skipping confetti"),
        }
    }

    fn record(&mut self, action: &'static str) {
        self.last_action = Some(LastAction::now(action));
    }

    /// Derive the view from the current state and push it to the surface
    pub fn render(&mut self) {
        let view = TimerView::new(&self.state, self.status, self.last_action.as_ref());
        if let Err(e) = self.surface.present(&view) {
            warn!("Failed to render timer: {}", e);
        }
    }
}
