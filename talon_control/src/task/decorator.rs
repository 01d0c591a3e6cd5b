//! Single-child wrappers that change when or how a task runs.

use std::time::Duration;

use talon_common::resource::Resources;
use tracing::debug;

use crate::robot::Robot;
use crate::task::base::{Child, Condition, EndReason, InterruptPolicy, Task, TaskStatus};

// ─── Repeatedly ─────────────────────────────────────────────────────

/// Restarts its child each time the child completes. Never completes on
/// its own; a child that cancels itself ends the loop.
pub struct Repeatedly<T> {
    child: Child<T>,
    iterations: u64,
}

impl<T: Task> Repeatedly<T> {
    pub fn new(task: T) -> Self {
        Self {
            child: Child::new(task),
            iterations: 0,
        }
    }

    /// Completed child runs so far.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl<T: Task> Task for Repeatedly<T> {
    fn name(&self) -> &str {
        self.child.task.name()
    }

    fn requirements(&self) -> Resources {
        self.child.task.requirements()
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.child.task.interrupt_policy()
    }

    fn runs_when_disabled(&self) -> bool {
        self.child.task.runs_when_disabled()
    }

    fn start(&mut self, robot: &mut Robot) {
        self.iterations = 0;
        self.child.start(robot);
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        match self.child.tick(robot) {
            TaskStatus::Running => TaskStatus::Running,
            TaskStatus::Done => {
                self.iterations += 1;
                self.child.start(robot);
                TaskStatus::Running
            }
            TaskStatus::Cancelled => TaskStatus::Cancelled,
        }
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        self.child.stop(robot, reason);
    }
}

// ─── Unless ─────────────────────────────────────────────────────────

/// Skips its child when the condition holds at start. The condition is not
/// re-evaluated afterwards.
pub struct Unless<T> {
    child: Child<T>,
    condition: Condition,
    skipped: bool,
}

impl<T: Task> Unless<T> {
    pub fn new(task: T, condition: impl Fn(&Robot) -> bool + 'static) -> Self {
        Self {
            child: Child::new(task),
            condition: Box::new(condition),
            skipped: false,
        }
    }
}

impl<T: Task> Task for Unless<T> {
    fn name(&self) -> &str {
        self.child.task.name()
    }

    fn requirements(&self) -> Resources {
        self.child.task.requirements()
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.child.task.interrupt_policy()
    }

    fn runs_when_disabled(&self) -> bool {
        self.child.task.runs_when_disabled()
    }

    fn start(&mut self, robot: &mut Robot) {
        self.skipped = (self.condition)(robot);
        if self.skipped {
            debug!(task = self.child.task.name(), "skipped");
        } else {
            self.child.start(robot);
        }
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if self.skipped {
            return TaskStatus::Done;
        }
        self.child.tick(robot)
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        self.child.stop(robot, reason);
    }
}

// ─── With Timeout ───────────────────────────────────────────────────

/// Bounds its child's run time.
///
/// On the first tick where `now - start >= timeout` the child is cancelled
/// and the wrapper reports `Done`, so enclosing flows continue. The clock is
/// attached at start and is independent of how often the child re-polls.
pub struct WithTimeout<T> {
    child: Child<T>,
    timeout: Duration,
    started_at: Duration,
    timed_out: bool,
}

impl<T: Task> WithTimeout<T> {
    pub fn new(task: T, timeout: Duration) -> Self {
        Self {
            child: Child::new(task),
            timeout,
            started_at: Duration::ZERO,
            timed_out: false,
        }
    }

    /// The last run ended because the timeout expired.
    #[inline]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl<T: Task> Task for WithTimeout<T> {
    fn name(&self) -> &str {
        self.child.task.name()
    }

    fn requirements(&self) -> Resources {
        self.child.task.requirements()
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.child.task.interrupt_policy()
    }

    fn runs_when_disabled(&self) -> bool {
        self.child.task.runs_when_disabled()
    }

    fn start(&mut self, robot: &mut Robot) {
        self.started_at = robot.now();
        self.timed_out = false;
        self.child.start(robot);
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if robot.now().saturating_sub(self.started_at) >= self.timeout {
            self.timed_out = true;
            debug!(
                task = self.child.task.name(),
                timeout_ms = self.timeout.as_millis() as u64,
                "task timed out"
            );
            self.child.cancel(robot);
            return TaskStatus::Done;
        }
        self.child.tick(robot)
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        self.child.stop(robot, reason);
    }
}

// ─── Cancel When ────────────────────────────────────────────────────

/// Cancels its child and reports `Cancelled` once the condition holds.
/// Checked before the child is ticked.
pub struct CancelWhen<T> {
    child: Child<T>,
    condition: Condition,
}

impl<T: Task> CancelWhen<T> {
    pub fn new(task: T, condition: impl Fn(&Robot) -> bool + 'static) -> Self {
        Self {
            child: Child::new(task),
            condition: Box::new(condition),
        }
    }
}

impl<T: Task> Task for CancelWhen<T> {
    fn name(&self) -> &str {
        self.child.task.name()
    }

    fn requirements(&self) -> Resources {
        self.child.task.requirements()
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.child.task.interrupt_policy()
    }

    fn runs_when_disabled(&self) -> bool {
        self.child.task.runs_when_disabled()
    }

    fn start(&mut self, robot: &mut Robot) {
        self.child.start(robot);
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if (self.condition)(robot) {
            self.child.cancel(robot);
            return TaskStatus::Cancelled;
        }
        self.child.tick(robot)
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        self.child.stop(robot, reason);
    }
}

// ─── Configured ─────────────────────────────────────────────────────

/// Overrides the scheduling traits of a task.
pub struct Configured<T> {
    task: T,
    name: Option<String>,
    extra_requirements: Resources,
    policy: Option<InterruptPolicy>,
    runs_when_disabled: Option<bool>,
}

impl<T: Task> Configured<T> {
    pub fn new(task: T) -> Self {
        Self {
            task,
            name: None,
            extra_requirements: Resources::empty(),
            policy: None,
            runs_when_disabled: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requires(mut self, resources: Resources) -> Self {
        self.extra_requirements |= resources;
        self
    }

    pub fn policy(mut self, policy: InterruptPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn runs_when_disabled(mut self, runs: bool) -> Self {
        self.runs_when_disabled = Some(runs);
        self
    }
}

impl<T: Task> Task for Configured<T> {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.task.name())
    }

    fn requirements(&self) -> Resources {
        self.task.requirements() | self.extra_requirements
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.policy.unwrap_or_else(|| self.task.interrupt_policy())
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
            .unwrap_or_else(|| self.task.runs_when_disabled())
    }

    fn start(&mut self, robot: &mut Robot) {
        self.task.start(robot);
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        self.task.tick(robot)
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        self.task.end(robot, reason);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
