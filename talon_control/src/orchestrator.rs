//! Task orchestrator: scheduling, resource exclusivity and default tasks.

pub mod resource_lock;
pub mod scheduler;

use std::fmt;

pub use resource_lock::{LockResult, ResourceLocks};
pub use scheduler::{ScheduleOutcome, Scheduler, SchedulerStats};

/// Identifier of a scheduled task, unique for the scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
