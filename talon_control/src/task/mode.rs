//! Tasks that drive the mode state machine.
//!
//! These declare no requirements: the state machine is shared by triggers,
//! bindings and maneuvers, and the maneuvers that must not interleave
//! declare `STATE_MACHINE` themselves.

use talon_common::state::{RobotState, TargetState};

use crate::robot::Robot;
use crate::state::TransitionResult;
use crate::task::base::{Task, TaskStatus};

/// Completes once `current == requested`. A rejected attempt keeps the task
/// running so the request is retried next cycle.
pub struct TryState {
    requested: RobotState,
    name: String,
}

pub fn try_state(requested: RobotState) -> TryState {
    TryState {
        requested,
        name: format!("TryState({requested:?})"),
    }
}

impl Task for TryState {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        match robot.try_state(self.requested) {
            TransitionResult::Applied(_) | TransitionResult::AlreadyActive => TaskStatus::Done,
            TransitionResult::Rejected(_) => TaskStatus::Running,
        }
    }
}

/// Like [`TryState`] for whatever the target maps to, re-read every tick.
pub struct TryTargetState;

pub fn try_target_state() -> TryTargetState {
    TryTargetState
}

impl Task for TryTargetState {
    fn name(&self) -> &str {
        "TryTargetState"
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if robot.try_target_state().is_complete() {
            TaskStatus::Done
        } else {
            TaskStatus::Running
        }
    }
}

/// Records a new target and completes.
pub struct SetTarget {
    target: TargetState,
}

pub fn set_target_state(target: TargetState) -> SetTarget {
    SetTarget { target }
}

impl Task for SetTarget {
    fn name(&self) -> &str {
        "SetTargetState"
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        robot.set_target_state(self.target);
        TaskStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_robot;

    #[test]
    fn try_state_retries_until_legal() {
        let (rig, mut robot) = test_robot();
        let mut task = try_state(RobotState::StoreFeeder);
        assert_eq!(task.name(), "TryState(StoreFeeder)");
        task.start(&mut robot);
        assert_eq!(task.tick(&mut robot), TaskStatus::Running);
        assert_eq!(task.tick(&mut robot), TaskStatus::Running);
        rig.transfer.model_mut().stored = true;
        assert_eq!(task.tick(&mut robot), TaskStatus::Done);
        assert_eq!(robot.robot_state(), RobotState::StoreFeeder);
    }

    #[test]
    fn try_state_on_current_is_immediate() {
        let (_rig, mut robot) = test_robot();
        let mut task = try_state(RobotState::None);
        task.start(&mut robot);
        assert_eq!(task.tick(&mut robot), TaskStatus::Done);
        assert_eq!(robot.modes.transition_count(), 0);
    }

    #[test]
    fn target_is_reread_each_tick() {
        let (rig, mut robot) = test_robot();
        rig.transfer.model_mut().stored = true;
        robot.try_state(RobotState::StoreFeeder);

        let mut task = try_target_state();
        robot.set_target_state(TargetState::PrepShuffle);
        task.start(&mut robot);
        rig.transfer.model_mut().stored = false;
        assert_eq!(task.tick(&mut robot), TaskStatus::Running);

        robot.set_target_state(TargetState::None);
        assert_eq!(task.tick(&mut robot), TaskStatus::Done);
        assert_eq!(robot.robot_state(), RobotState::None);
    }

    #[test]
    fn set_target_completes_immediately() {
        let (_rig, mut robot) = test_robot();
        let mut task = set_target_state(TargetState::PrepVision);
        assert_eq!(task.tick(&mut robot), TaskStatus::Done);
        assert_eq!(robot.target_state(), TargetState::PrepVision);
        assert_eq!(robot.robot_state(), RobotState::None);
    }
}
