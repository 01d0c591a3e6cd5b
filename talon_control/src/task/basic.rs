//! Leaf tasks built from closures and clocks.

use std::time::Duration;

use crate::config::secs;
use crate::robot::Robot;
use crate::task::base::{Condition, EndReason, Task, TaskStatus};

type Action = Box<dyn FnMut(&mut Robot)>;

// ─── Run Once ───────────────────────────────────────────────────────

/// Runs its action on the first tick and finishes.
pub struct RunOnce {
    action: Action,
}

pub fn run_once(action: impl FnMut(&mut Robot) + 'static) -> RunOnce {
    RunOnce {
        action: Box::new(action),
    }
}

impl Task for RunOnce {
    fn name(&self) -> &str {
        "RunOnce"
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        (self.action)(robot);
        TaskStatus::Done
    }
}

// ─── Run ────────────────────────────────────────────────────────────

/// Runs its action every tick until interrupted, then the optional end action.
pub struct Run {
    action: Action,
    on_end: Option<Action>,
}

pub fn run(action: impl FnMut(&mut Robot) + 'static) -> Run {
    Run {
        action: Box::new(action),
        on_end: None,
    }
}

pub fn run_end(
    action: impl FnMut(&mut Robot) + 'static,
    on_end: impl FnMut(&mut Robot) + 'static,
) -> Run {
    Run {
        action: Box::new(action),
        on_end: Some(Box::new(on_end)),
    }
}

impl Task for Run {
    fn name(&self) -> &str {
        "Run"
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        (self.action)(robot);
        TaskStatus::Running
    }

    fn end(&mut self, robot: &mut Robot, _reason: EndReason) {
        if let Some(on_end) = self.on_end.as_mut() {
            on_end(robot);
        }
    }
}

// ─── Wait ───────────────────────────────────────────────────────────

/// Finishes once `duration` of cycle time has elapsed since start.
pub struct Wait {
    duration: Duration,
    started_at: Duration,
}

pub fn wait(duration: Duration) -> Wait {
    Wait {
        duration,
        started_at: Duration::ZERO,
    }
}

pub fn wait_seconds(seconds: f64) -> Wait {
    wait(secs(seconds))
}

impl Task for Wait {
    fn name(&self) -> &str {
        "Wait"
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }

    fn start(&mut self, robot: &mut Robot) {
        self.started_at = robot.now();
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if robot.now().saturating_sub(self.started_at) >= self.duration {
            TaskStatus::Done
        } else {
            TaskStatus::Running
        }
    }
}

// ─── Wait Until ─────────────────────────────────────────────────────

/// Finishes on the first tick where the condition holds.
pub struct WaitUntil {
    condition: Condition,
}

pub fn wait_until(condition: impl Fn(&Robot) -> bool + 'static) -> WaitUntil {
    WaitUntil {
        condition: Box::new(condition),
    }
}

impl Task for WaitUntil {
    fn name(&self) -> &str {
        "WaitUntil"
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if (self.condition)(robot) {
            TaskStatus::Done
        } else {
            TaskStatus::Running
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
