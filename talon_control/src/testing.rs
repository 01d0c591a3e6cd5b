//! Unit-test fixtures.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RobotConfig;
use crate::robot::Robot;
use crate::subsystem::sim::SimRig;
use crate::task::{EndReason, Task, TaskStatus};

/// Robot on simulated proxies with default configuration.
pub fn test_robot() -> (SimRig, Robot) {
    let config = RobotConfig::default();
    let rig = SimRig::new(&config);
    let robot = Robot::new(rig.subsystems(), &config);
    (rig, robot)
}

/// Shared record of task lifecycle events.
#[derive(Clone, Default)]
pub struct TaskLog(Rc<RefCell<Vec<String>>>);

impl TaskLog {
    pub fn push(&self, event: String) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == event).count()
    }
}

/// Task that logs its lifecycle and finishes after `ticks` ticks
/// (never, when `None`).
pub struct Probe {
    name: &'static str,
    ticks: Option<u32>,
    ticked: u32,
    log: TaskLog,
}

pub fn probe(name: &'static str, ticks: u32, log: &TaskLog) -> Probe {
    Probe {
        name,
        ticks: Some(ticks),
        ticked: 0,
        log: log.clone(),
    }
}

pub fn endless(name: &'static str, log: &TaskLog) -> Probe {
    Probe {
        name,
        ticks: None,
        ticked: 0,
        log: log.clone(),
    }
}

impl Task for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn start(&mut self, _robot: &mut Robot) {
        self.ticked = 0;
        self.log.push(format!("{}:start", self.name));
    }

    fn tick(&mut self, _robot: &mut Robot) -> TaskStatus {
        self.ticked += 1;
        self.log.push(format!("{}:tick", self.name));
        match self.ticks {
            Some(n) if self.ticked >= n => TaskStatus::Done,
            _ => TaskStatus::Running,
        }
    }

    fn end(&mut self, _robot: &mut Robot, reason: EndReason) {
        self.log.push(format!("{}:end:{reason:?}", self.name));
    }
}
