use std::collections::BTreeMap;
use std::time::Duration;

use super::{Scheduler, TimerHandle};

/// Shortest period accepted; zero would tick forever within one advance
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Task {
    period: Duration,
    next_due: Duration,
}

/// Scheduler running on a virtual clock.
///
/// Time only moves when [`advance`](Self::advance) is called, which returns
/// the ticks that became due in chronological order. Ticks due at the same
/// instant come out in start order.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TimerHandle, Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Virtual time until the next tick of any task
    pub fn time_to_next_tick(&self) -> Option<Duration> {
        self.tasks
            .values()
            .map(|task| task.next_due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and collect every tick that fell due
    pub fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        let target = self.now + by;
        let mut fired = Vec::new();

        loop {
            let due = self
                .tasks
                .iter()
                .filter(|(_, task)| task.next_due <= target)
                .min_by_key(|(handle, task)| (task.next_due, **handle))
                .map(|(handle, _)| *handle);

            let Some(handle) = due else {
                break;
            };

            if let Some(task) = self.tasks.get_mut(&handle) {
                self.now = task.next_due;
                task.next_due += task.period;
                fired.push(handle);
            }
        }

        self.now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn start_recurring(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        let period = period.max(MIN_PERIOD);
        self.tasks.insert(
            handle,
            Task {
                period,
                next_due: self.now + period,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.tasks.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_first_tick_after_one_period() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.start_recurring(3 * SECOND);

        assert!(scheduler.advance(Duration::from_millis(2999)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![handle]);
        assert_eq!(scheduler.now(), 3 * SECOND);
    }

    #[test]
    fn test_recurring_ticks() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.start_recurring(3 * SECOND);

        assert_eq!(scheduler.advance(10 * SECOND), vec![handle, handle, handle]);
        assert_eq!(scheduler.time_to_next_tick(), Some(2 * SECOND));
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.start_recurring(SECOND);
        scheduler.cancel(handle);

        assert!(!scheduler.is_active(handle));
        assert!(scheduler.advance(10 * SECOND).is_empty());
        assert_eq!(scheduler.time_to_next_tick(), None);
    }

    #[test]
    fn test_ticks_interleave_chronologically() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.start_recurring(2 * SECOND);
        let fast = scheduler.start_recurring(SECOND);

        // t=1 fast, t=2 slow then fast (start order), t=3 fast, t=4 slow then fast
        assert_eq!(
            scheduler.advance(4 * SECOND),
            vec![fast, slow, fast, fast, slow, fast]
        );
    }

    #[test]
    fn test_handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.start_recurring(SECOND);
        scheduler.cancel(first);
        let second = scheduler.start_recurring(SECOND);

        assert_ne!(first, second);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_zero_period_is_bounded() {
        let mut scheduler = ManualScheduler::new();
        scheduler.start_recurring(Duration::ZERO);
        assert_eq!(scheduler.advance(Duration::from_millis(5)).len(), 5);
    }
}
