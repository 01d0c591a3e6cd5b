//! Task trait, lifecycle types and the combinator extension trait.

use std::time::Duration;

use talon_common::resource::Resources;

use crate::robot::Robot;
use crate::task::composite::{Parallel, Sequence};
use crate::task::decorator::{CancelWhen, Configured, Repeatedly, Unless, WithTimeout};

/// Per-tick report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    /// Completed normally.
    Done,
    /// Aborted itself; enclosing flows treat this as a cancellation.
    Cancelled,
}

impl TaskStatus {
    /// End reason for a finished status, `None` while running.
    #[inline]
    pub const fn end_reason(self) -> Option<EndReason> {
        match self {
            Self::Running => None,
            Self::Done => Some(EndReason::Finished),
            Self::Cancelled => Some(EndReason::Cancelled),
        }
    }
}

/// Why `end` is being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Finished,
    Cancelled,
}

/// What happens when another task wants a resource this one holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// The holder is cancelled and the newcomer starts.
    #[default]
    CancelSelf,
    /// The newcomer is rejected.
    CancelIncoming,
}

pub type BoxedTask = Box<dyn Task>;

/// Pure predicate over the robot context.
pub type Condition = Box<dyn Fn(&Robot) -> bool>;

/// Cooperative unit of work driven once per cycle.
pub trait Task {
    fn name(&self) -> &str;

    /// Subsystem proxies held exclusively while running.
    fn requirements(&self) -> Resources {
        Resources::empty()
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        InterruptPolicy::CancelSelf
    }

    /// Survives the robot being disabled.
    fn runs_when_disabled(&self) -> bool {
        false
    }

    fn start(&mut self, _robot: &mut Robot) {}

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus;

    /// Release anything held. Called once, after the final tick or on
    /// cancellation.
    fn end(&mut self, _robot: &mut Robot, _reason: EndReason) {}
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn requirements(&self) -> Resources {
        (**self).requirements()
    }
    fn interrupt_policy(&self) -> InterruptPolicy {
        (**self).interrupt_policy()
    }
    fn runs_when_disabled(&self) -> bool {
        (**self).runs_when_disabled()
    }
    fn start(&mut self, robot: &mut Robot) {
        (**self).start(robot)
    }
    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        (**self).tick(robot)
    }
    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        (**self).end(robot, reason)
    }
}

// ─── Child Lifecycle ────────────────────────────────────────────────

/// A task owned by a composite, tracking whether it still needs `end`.
pub(crate) struct Child<T> {
    pub(crate) task: T,
    active: bool,
}

impl<T: Task> Child<T> {
    pub(crate) fn new(task: T) -> Self {
        Self {
            task,
            active: false,
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn start(&mut self, robot: &mut Robot) {
        self.task.start(robot);
        self.active = true;
    }

    /// Tick and, if the child finished, end it.
    pub(crate) fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        let status = self.task.tick(robot);
        if let Some(reason) = status.end_reason() {
            self.task.end(robot, reason);
            self.active = false;
        }
        status
    }

    /// End the child with `reason` if it is still running.
    pub(crate) fn stop(&mut self, robot: &mut Robot, reason: EndReason) {
        if self.active {
            self.task.end(robot, reason);
            self.active = false;
        }
    }

    #[inline]
    pub(crate) fn cancel(&mut self, robot: &mut Robot) {
        self.stop(robot, EndReason::Cancelled);
    }
}

// ─── Combinators ────────────────────────────────────────────────────

/// Fluent composition on any task.
pub trait TaskExt: Task + Sized + 'static {
    fn boxed(self) -> BoxedTask {
        Box::new(self)
    }

    /// Run `next` after this task completes.
    fn and_then(self, next: impl Task + 'static) -> Sequence {
        Sequence::new(vec![Box::new(self), Box::new(next)])
    }

    /// Run alongside `other`; done when both are.
    fn along_with(self, other: impl Task + 'static) -> Parallel {
        Parallel::all(vec![Box::new(self), Box::new(other)])
    }

    /// Finish (cancelling this task) as soon as `condition` holds.
    fn until(self, condition: impl Fn(&Robot) -> bool + 'static) -> Parallel {
        Parallel::until(vec![Box::new(self)], condition)
    }

    /// Abort with `Cancelled` as soon as `condition` holds.
    fn cancel_when(self, condition: impl Fn(&Robot) -> bool + 'static) -> CancelWhen<Self> {
        CancelWhen::new(self, condition)
    }

    /// Skip entirely if `condition` holds when started.
    fn unless(self, condition: impl Fn(&Robot) -> bool + 'static) -> Unless<Self> {
        Unless::new(self, condition)
    }

    fn repeatedly(self) -> Repeatedly<Self> {
        Repeatedly::new(self)
    }

    fn with_timeout(self, timeout: Duration) -> WithTimeout<Self> {
        WithTimeout::new(self, timeout)
    }

    fn with_interrupt_policy(self, policy: InterruptPolicy) -> Configured<Self> {
        Configured::new(self).policy(policy)
    }

    /// Add to the declared requirements.
    fn requiring(self, resources: Resources) -> Configured<Self> {
        Configured::new(self).requires(resources)
    }

    fn ignoring_disable(self) -> Configured<Self> {
        Configured::new(self).runs_when_disabled(true)
    }

    fn named(self, name: impl Into<String>) -> Configured<Self> {
        Configured::new(self).name(name)
    }
}

impl<T: Task + 'static> TaskExt for T {}

// ─── Tests ──────────────────────────────────────────────────────────
