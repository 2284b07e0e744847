//! Cancellable recurring tasks
//!
//! A [`Scheduler`] hands out a [`TimerHandle`] for every recurring task it
//! starts. Ticks are delivered back to the owner tagged with that handle, so a
//! tick belonging to a task that has since been cancelled can be recognized
//! and dropped.
//!
//! - `manual` - Virtual clock driven explicitly by the caller
//! - `realtime` - Tokio timers delivering ticks over a channel

pub mod manual;
pub mod realtime;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use manual::ManualScheduler;
pub use realtime::TokioScheduler;

/// Identity of one started recurring task. Never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Source of recurring ticks
pub trait Scheduler {
    /// Start a task that ticks every `period`, first one full period from now
    fn start_recurring(&mut self, period: Duration) -> TimerHandle;

    /// Stop a task. No tick for `handle` is produced after this returns.
    fn cancel(&mut self, handle: TimerHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn start_recurring(&mut self, period: Duration) -> TimerHandle {
        (**self).start_recurring(period)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle)
    }
}
