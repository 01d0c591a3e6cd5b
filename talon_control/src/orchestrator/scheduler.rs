//! Task scheduler.
//!
//! Runs every scheduled task once per cycle in scheduling order. Resource
//! exclusivity is enforced at schedule time: an incoming task whose
//! requirements overlap running tasks either cancels them (their policy is
//! `CancelSelf`) or is rejected (any of them is `CancelIncoming`).
//! Conflicts are normal control flow and never errors.

use talon_common::resource::Resources;
use tracing::{debug, info, trace, warn};

use crate::orchestrator::TaskId;
use crate::orchestrator::resource_lock::{LockResult, ResourceLocks};
use crate::robot::Robot;
use crate::task::{BoxedTask, EndReason, InterruptPolicy, TaskStatus};

/// Result of a schedule request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Started(TaskId),
    /// A running task holding a required resource refuses interruption.
    Rejected { held_by: TaskId, holder: String },
    /// The robot is disabled and the task does not run while disabled.
    Disabled,
}

impl ScheduleOutcome {
    #[inline]
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Started(id) => Some(*id),
            _ => None,
        }
    }
}

/// Counters for telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub started: u64,
    pub finished: u64,
    pub cancelled: u64,
    pub rejected: u64,
}

struct Scheduled {
    id: TaskId,
    task: BoxedTask,
}

type DefaultFactory = Box<dyn Fn() -> BoxedTask>;

struct DefaultTask {
    resource: Resources,
    factory: DefaultFactory,
}

pub struct Scheduler {
    running: Vec<Scheduled>,
    locks: ResourceLocks,
    defaults: Vec<DefaultTask>,
    next_id: u64,
    stats: SchedulerStats,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            running: Vec::new(),
            locks: ResourceLocks::new(),
            defaults: Vec::new(),
            next_id: 1,
            stats: SchedulerStats::default(),
        }
    }

    // ─── Scheduling ─────────────────────────────────────────────────

    /// Start `task` now, resolving resource conflicts.
    ///
    /// On success the task is started immediately and first ticked by the
    /// next [`Scheduler::run`], which in the cycle runner happens later in
    /// the same cycle.
    pub fn schedule(&mut self, mut task: BoxedTask, robot: &mut Robot) -> ScheduleOutcome {
        if !robot.is_enabled() && !task.runs_when_disabled() {
            debug!(task = task.name(), "not scheduled while disabled");
            self.stats.rejected += 1;
            return ScheduleOutcome::Disabled;
        }

        let requirements = task.requirements();
        let policy = task.interrupt_policy();
        let id = TaskId(self.next_id);

        if let LockResult::Rejected { held_by } = self.locks.try_acquire(requirements, id, policy) {
            trace!(task = task.name(), %held_by, "requirements contended");
            let conflicts = self.locks.conflicts(requirements);

            if let Some((blocker, _)) = conflicts
                .iter()
                .find(|(_, policy)| *policy == InterruptPolicy::CancelIncoming)
            {
                let holder = self.name_of(*blocker).unwrap_or("?").to_string();
                debug!(
                    task = task.name(),
                    held_by = %blocker,
                    holder = holder.as_str(),
                    "schedule rejected by non-interruptible holder"
                );
                self.stats.rejected += 1;
                return ScheduleOutcome::Rejected {
                    held_by: *blocker,
                    holder,
                };
            }

            for (holder, _) in conflicts {
                debug!(incoming = task.name(), held_by = %holder, "interrupting holder");
                self.cancel(holder, robot);
            }
            self.locks.assign(requirements, id, policy);
        }
        self.next_id += 1;

        info!(task = task.name(), %id, ?requirements, "task started");
        task.start(robot);
        self.running.push(Scheduled { id, task });
        self.stats.started += 1;
        ScheduleOutcome::Started(id)
    }

    /// Orchestrator step: tick every running task once, retire the ones
    /// that finished, then fill idle resources with their default tasks.
    pub fn run(&mut self, robot: &mut Robot) {
        let mut i = 0;
        while i < self.running.len() {
            let status = self.running[i].task.tick(robot);
            let Some(reason) = status.end_reason() else {
                i += 1;
                continue;
            };
            let mut done = self.running.remove(i);
            done.task.end(robot, reason);
            let released = self.locks.release_all(done.id);
            debug!(id = %done.id, ?released, "resources released");
            match status {
                TaskStatus::Cancelled => {
                    self.stats.cancelled += 1;
                    warn!(task = done.task.name(), id = %done.id, "task aborted");
                }
                _ => {
                    self.stats.finished += 1;
                    info!(task = done.task.name(), id = %done.id, "task finished");
                }
            }
        }

        if robot.is_enabled() {
            self.schedule_defaults(robot);
        }
    }

    /// Cancel a running task. Returns false if it was not running.
    pub fn cancel(&mut self, id: TaskId, robot: &mut Robot) -> bool {
        let Some(pos) = self.running.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut cancelled = self.running.remove(pos);
        cancelled.task.end(robot, EndReason::Cancelled);
        let released = self.locks.release_all(id);
        debug!(%id, ?released, "resources released");
        self.stats.cancelled += 1;
        info!(task = cancelled.task.name(), %id, "task cancelled");
        true
    }

    /// Cancel every running task.
    pub fn cancel_all(&mut self, robot: &mut Robot) {
        while let Some(last) = self.running.last() {
            let id = last.id;
            self.cancel(id, robot);
        }
    }

    /// Cancel every task that does not run while disabled.
    pub fn cancel_for_disable(&mut self, robot: &mut Robot) {
        let doomed: Vec<TaskId> = self
            .running
            .iter()
            .filter(|s| !s.task.runs_when_disabled())
            .map(|s| s.id)
            .collect();
        for id in doomed {
            self.cancel(id, robot);
        }
    }

    // ─── Default Tasks ──────────────────────────────────────────────

    /// Register the task that runs on `resource` whenever nothing else
    /// holds it. The factory's task must require `resource`.
    pub fn set_default_task(
        &mut self,
        resource: Resources,
        factory: impl Fn() -> BoxedTask + 'static,
    ) {
        self.defaults.retain(|d| d.resource != resource);
        self.defaults.push(DefaultTask {
            resource,
            factory: Box::new(factory),
        });
    }

    fn schedule_defaults(&mut self, robot: &mut Robot) {
        let idle: Vec<usize> = self
            .defaults
            .iter()
            .enumerate()
            .filter(|(_, d)| self.locks.conflicts(d.resource).is_empty())
            .map(|(i, _)| i)
            .collect();
        for i in idle {
            let task = (self.defaults[i].factory)();
            if !task.requirements().contains(self.defaults[i].resource) {
                warn!(
                    task = task.name(),
                    "default task does not require its resource, skipped"
                );
                continue;
            }
            // An earlier default may have claimed a shared flag this pass.
            if !self.locks.conflicts(task.requirements()).is_empty() {
                continue;
            }
            self.schedule(task, robot);
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    pub fn is_running(&self, id: TaskId) -> bool {
        self.running.iter().any(|s| s.id == id)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Holder of a single resource flag.
    pub fn holder(&self, resource: Resources) -> Option<TaskId> {
        self.locks.holder(resource)
    }

    pub fn held_resources(&self) -> Resources {
        self.locks.held()
    }

    pub fn name_of(&self, id: TaskId) -> Option<&str> {
        self.running
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.task.name())
    }

    /// Names of running tasks in scheduling order.
    pub fn running_names(&self) -> Vec<String> {
        self.running.iter().map(|s| s.task.name().to_string()).collect()
    }

    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
