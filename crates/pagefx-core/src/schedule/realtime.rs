use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{trace, warn};

use super::{Scheduler, TimerHandle};

/// Scheduler backed by tokio timers.
///
/// Each recurring task runs on its own spawned tokio task and sends its
/// handle through the channel returned by [`new`](Self::new) on every tick.
/// The owner drains that channel on its event loop. Must be used from within
/// a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tick_tx: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its ticks arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tick_tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, tick_rx)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn start_recurring(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        let tx = self.tick_tx.clone();
        // First tick one full period from now, not from when the task is polled
        let first = tokio::time::Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                trace!(%handle, "timer tick");
                if tx.send(handle).is_err() {
                    warn!(%handle, "Tick receiver dropped, stopping timer");
                    break;
                }
            }
        });

        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_tick_after_one_period() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        let start = Instant::now();
        let handle = scheduler.start_recurring(Duration::from_millis(3000));

        let tick = ticks.recv().await.unwrap();
        assert_eq!(tick, handle);
        assert_eq!(start.elapsed(), Duration::from_millis(3000));

        let tick = ticks.recv().await.unwrap();
        assert_eq!(tick, handle);
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        let handle = scheduler.start_recurring(Duration::from_millis(100));
        scheduler.cancel(handle);
        assert_eq!(scheduler.active_count(), 0);

        let result = timeout(Duration::from_secs(5), ticks.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_issues_new_handle() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        let first = scheduler.start_recurring(Duration::from_millis(100));
        scheduler.cancel(first);
        let second = scheduler.start_recurring(Duration::from_millis(100));

        assert_ne!(first, second);
        assert_eq!(ticks.recv().await.unwrap(), second);
    }
}
