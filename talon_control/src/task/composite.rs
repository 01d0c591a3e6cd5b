//! Sequential and parallel composition.
//!
//! A composite's requirements are the union of its children's. It runs when
//! disabled only if every child does, and it rejects incoming tasks if any
//! child does.

use talon_common::resource::Resources;
use tracing::trace;

use crate::robot::Robot;
use crate::task::base::{
    BoxedTask, Child, Condition, EndReason, InterruptPolicy, Task, TaskStatus,
};

/// Requirement/policy summary shared by both composites.
struct Traits {
    requirements: Resources,
    policy: InterruptPolicy,
    runs_when_disabled: bool,
}

fn traits_of(children: &[BoxedTask]) -> Traits {
    Traits {
        requirements: children
            .iter()
            .fold(Resources::empty(), |acc, c| acc | c.requirements()),
        policy: if children
            .iter()
            .any(|c| c.interrupt_policy() == InterruptPolicy::CancelIncoming)
        {
            InterruptPolicy::CancelIncoming
        } else {
            InterruptPolicy::CancelSelf
        },
        runs_when_disabled: children.iter().all(|c| c.runs_when_disabled()),
    }
}

// ─── Sequence ───────────────────────────────────────────────────────

/// Runs children one after another.
///
/// When a child completes, the next is started and ticked in the same cycle,
/// so a chain of instantaneous steps settles within one cycle. A child that
/// cancels itself cancels the sequence.
pub struct Sequence {
    children: Vec<Child<BoxedTask>>,
    index: usize,
    traits: Traits,
}

impl Sequence {
    pub fn new(children: Vec<BoxedTask>) -> Self {
        let traits = traits_of(&children);
        Self {
            children: children.into_iter().map(Child::new).collect(),
            index: 0,
            traits,
        }
    }

    /// Index of the running child.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }
}

impl Task for Sequence {
    fn name(&self) -> &str {
        "Sequence"
    }

    fn requirements(&self) -> Resources {
        self.traits.requirements
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.traits.policy
    }

    fn runs_when_disabled(&self) -> bool {
        self.traits.runs_when_disabled
    }

    fn start(&mut self, robot: &mut Robot) {
        self.index = 0;
        if let Some(first) = self.children.first_mut() {
            first.start(robot);
        }
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        loop {
            let Some(child) = self.children.get_mut(self.index) else {
                return TaskStatus::Done;
            };
            match child.tick(robot) {
                TaskStatus::Running => return TaskStatus::Running,
                TaskStatus::Cancelled => return TaskStatus::Cancelled,
                TaskStatus::Done => {
                    trace!(step = self.index, child = child.task.name(), "sequence step done");
                    self.index += 1;
                    if let Some(next) = self.children.get_mut(self.index) {
                        next.start(robot);
                    }
                }
            }
        }
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        if let Some(child) = self.children.get_mut(self.index) {
            child.stop(robot, reason);
        }
    }
}

// ─── Parallel ───────────────────────────────────────────────────────

/// Completion rule of a [`Parallel`].
pub enum Join {
    /// Done when every child is done.
    All,
    /// Done as soon as the predicate holds; remaining children are cancelled.
    /// Also done if every child finishes first.
    Until(Condition),
}

/// Runs children together.
pub struct Parallel {
    children: Vec<Child<BoxedTask>>,
    join: Join,
    traits: Traits,
}

impl Parallel {
    pub fn all(children: Vec<BoxedTask>) -> Self {
        Self::with_join(children, Join::All)
    }

    pub fn until(children: Vec<BoxedTask>, condition: impl Fn(&Robot) -> bool + 'static) -> Self {
        Self::with_join(children, Join::Until(Box::new(condition)))
    }

    pub fn with_join(children: Vec<BoxedTask>, join: Join) -> Self {
        let traits = traits_of(&children);
        Self {
            children: children.into_iter().map(Child::new).collect(),
            join,
            traits,
        }
    }

    fn cancel_running(&mut self, robot: &mut Robot) {
        for child in &mut self.children {
            child.cancel(robot);
        }
    }
}

impl Task for Parallel {
    fn name(&self) -> &str {
        "Parallel"
    }

    fn requirements(&self) -> Resources {
        self.traits.requirements
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        self.traits.policy
    }

    fn runs_when_disabled(&self) -> bool {
        self.traits.runs_when_disabled
    }

    fn start(&mut self, robot: &mut Robot) {
        for child in &mut self.children {
            child.start(robot);
        }
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        let reached = matches!(&self.join, Join::Until(condition) if condition(robot));
        if reached {
            self.cancel_running(robot);
            return TaskStatus::Done;
        }

        for child in &mut self.children {
            if child.is_active() {
                child.tick(robot);
            }
        }

        if self.children.iter().any(Child::is_active) {
            TaskStatus::Running
        } else {
            TaskStatus::Done
        }
    }

    fn end(&mut self, robot: &mut Robot, _reason: EndReason) {
        self.cancel_running(robot);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
