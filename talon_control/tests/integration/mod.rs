//! Shared fixtures for the integration suites.

mod autonomous;
mod config;
mod orchestrator;
mod properties;
mod shoot_sequence;
mod state_machine;
mod triggers;
mod zeroing;

use talon_common::state::{Mechanism, RobotMode, ZeroStatus};
use talon_control::config::RobotConfig;
use talon_control::cycle::CycleRunner;
use talon_control::robot::Robot;
use talon_control::subsystem::sim::SimRig;
use talon_control::task::{Task, TaskStatus};

/// Disabled robot context on simulated proxies.
pub fn robot() -> (SimRig, Robot) {
    let config = RobotConfig::default();
    let rig = SimRig::new(&config);
    let robot = Robot::new(rig.subsystems(), &config);
    (rig, robot)
}

/// Disabled cycle runner on simulated proxies.
pub fn runner() -> (SimRig, CycleRunner) {
    let config = RobotConfig::default();
    let rig = SimRig::new(&config);
    let runner = CycleRunner::new(config, rig.subsystems());
    (rig, runner)
}

/// Runner in teleop with both mechanisms already zeroed, so enabling
/// schedules nothing.
pub fn zeroed_teleop() -> (SimRig, CycleRunner) {
    let (rig, mut runner) = runner();
    for mechanism in Mechanism::ALL {
        runner.robot.zeroing.set(mechanism, ZeroStatus::Zeroed);
    }
    runner.set_mode(RobotMode::Teleop);
    (rig, runner)
}

/// Step until `done` holds; returns the number of cycles taken.
pub fn step_until(
    runner: &mut CycleRunner,
    max_cycles: usize,
    mut done: impl FnMut(&CycleRunner) -> bool,
) -> Option<usize> {
    for cycle in 1..=max_cycles {
        runner.step();
        if done(runner) {
            return Some(cycle);
        }
    }
    None
}

/// One cycle of a task driven by hand: advance the clock, tick, and end
/// the task if it finished.
pub fn cycle(task: &mut dyn Task, robot: &mut Robot) -> TaskStatus {
    robot.clock.advance();
    let status = task.tick(robot);
    if let Some(reason) = status.end_reason() {
        task.end(robot, reason);
    }
    status
}
