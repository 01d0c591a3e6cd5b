//! Reactive triggers: edge-detected condition→action bindings.
//!
//! Every trigger's condition is evaluated once per cycle. A false→true edge
//! fires the `on_true` actions, true→false fires `on_false`, in registration
//! order. Conditions start out considered false, so a condition that is
//! already true on the first poll fires its rising edge then.

use tracing::trace;

use crate::orchestrator::{ScheduleOutcome, Scheduler};
use crate::robot::Robot;
use crate::task::{BoxedTask, Condition};

/// Fire-and-forget edge action.
pub type Action = Box<dyn FnMut(&mut Robot, &mut Scheduler)>;

pub struct Trigger {
    name: String,
    condition: Condition,
    on_true: Vec<Action>,
    on_false: Vec<Action>,
    last: bool,
}

impl Trigger {
    pub fn new(name: impl Into<String>, condition: impl Fn(&Robot) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            condition: Box::new(condition),
            on_true: Vec::new(),
            on_false: Vec::new(),
            last: false,
        }
    }

    /// Trigger whose condition is permanently false. Its actions never fire.
    pub fn never(name: impl Into<String>) -> Self {
        Self::new(name, |_| false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_true(&mut self, action: impl FnMut(&mut Robot, &mut Scheduler) + 'static) -> &mut Self {
        self.on_true.push(Box::new(action));
        self
    }

    pub fn on_false(&mut self, action: impl FnMut(&mut Robot, &mut Scheduler) + 'static) -> &mut Self {
        self.on_false.push(Box::new(action));
        self
    }

    /// Evaluate the condition and fire the matching edge.
    pub fn poll(&mut self, robot: &mut Robot, scheduler: &mut Scheduler) {
        let now = (self.condition)(robot);
        let actions = match (self.last, now) {
            (false, true) => &mut self.on_true,
            (true, false) => &mut self.on_false,
            _ => {
                return;
            }
        };
        self.last = now;
        trace!(trigger = self.name.as_str(), rising = now, "trigger edge");
        for action in actions.iter_mut() {
            action(robot, scheduler);
        }
    }
}

/// Ordered collection of triggers polled together.
#[derive(Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger and return it for binding.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        condition: impl Fn(&Robot) -> bool + 'static,
    ) -> &mut Trigger {
        self.push(Trigger::new(name, condition))
    }

    pub fn push(&mut self, trigger: Trigger) -> &mut Trigger {
        self.triggers.push(trigger);
        let last = self.triggers.len() - 1;
        &mut self.triggers[last]
    }

    /// Trigger-evaluation phase of the cycle.
    pub fn poll_all(&mut self, robot: &mut Robot, scheduler: &mut Scheduler) {
        for trigger in &mut self.triggers {
            trigger.poll(robot, scheduler);
        }
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.triggers.iter().map(Trigger::name)
    }
}

// ─── Action Helpers ─────────────────────────────────────────────────

/// Action that builds and schedules a task. A rejection is left to the
/// scheduler's log; the trigger does not retry.
pub fn schedule(
    factory: impl Fn(&Robot) -> BoxedTask + 'static,
) -> impl FnMut(&mut Robot, &mut Scheduler) + 'static {
    move |robot, scheduler| {
        let task = factory(robot);
        if let ScheduleOutcome::Started(id) = scheduler.schedule(task, robot) {
            trace!(%id, "trigger scheduled task");
        }
    }
}

/// Action that only touches the robot context.
pub fn act(
    mut action: impl FnMut(&mut Robot) + 'static,
) -> impl FnMut(&mut Robot, &mut Scheduler) + 'static {
    move |robot, _| action(robot)
}

// ─── Tests ──────────────────────────────────────────────────────────
