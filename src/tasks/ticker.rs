//! Recurring one-second tick scheduling

use std::{fmt, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Interval between countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies the scheduled task a tick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Owned handle to a recurring tick. Dropping it cancels the tick.
pub struct TickHandle {
    id: TickId,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TickHandle {
    pub fn new(id: TickId, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TickId {
        self.id
    }

    /// Stop the tick now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}

/// Something that can deliver `TickId`s periodically until the handle is dropped
pub trait TickScheduler {
    fn schedule(&mut self, id: TickId, period: Duration) -> TickHandle;
}

/// Tokio-backed scheduler: each schedule spawns an interval task that
/// forwards its id into the event loop's tick channel
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    tick_tx: mpsc::UnboundedSender<TickId>,
}

impl IntervalScheduler {
    pub fn new(tick_tx: mpsc::UnboundedSender<TickId>) -> Self {
        Self { tick_tx }
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&mut self, id: TickId, period: Duration) -> TickHandle {
        let tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            // First tick fires one period after start, not immediately
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    debug!("Tick receiver closed, stopping tick {:?}", id);
                    break;
                }
            }
        });

        debug!("Scheduled tick {:?} every {:?}", id, period);
        TickHandle::new(id, move || {
            debug!("Cancelling tick {:?}", id);
            task.abort();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};
    use tokio::time::timeout;

    #[test]
    fn dropping_handle_runs_cancel_once() {
        let cancelled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&cancelled);
        let handle = TickHandle::new(TickId(7), move || counter.set(counter.get() + 1));

        assert_eq!(handle.id(), TickId(7));
        handle.cancel();
        assert_eq!(cancelled.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_scheduler_delivers_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = IntervalScheduler::new(tx);

        let handle = scheduler.schedule(TickId(1), TICK_PERIOD);
        let start = Instant::now();

        assert_eq!(rx.recv().await, Some(TickId(1)));
        assert_eq!(rx.recv().await, Some(TickId(1)));
        assert!(start.elapsed() >= Duration::from_secs(2));

        handle.cancel();

        let after_cancel = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(after_cancel.is_err(), "no tick may arrive after cancellation");
    }
}
