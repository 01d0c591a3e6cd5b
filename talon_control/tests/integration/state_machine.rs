use talon_common::state::{RobotState, TargetState};
use talon_control::state::TransitionResult;
use talon_control::task::{Task, TaskExt, TaskStatus, try_state, try_target_state};

use super::{cycle, robot};

#[test]
fn rejected_request_holds_state_and_keeps_retrying() {
    let (_rig, mut robot) = robot();
    assert!(matches!(
        robot.try_state(RobotState::PrepSpeaker),
        TransitionResult::Rejected(_)
    ));
    assert_eq!(robot.robot_state(), RobotState::None);

    let mut task = try_state(RobotState::PrepSpeaker);
    task.start(&mut robot);
    for _ in 0..100 {
        assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
    }
    assert_eq!(robot.robot_state(), RobotState::None);
    assert_eq!(robot.modes.transition_count(), 0);
    assert_eq!(robot.modes.rejection_count(), 101);
}

#[test]
fn repeated_request_does_not_reissue_setpoints() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    assert_eq!(
        robot.try_state(RobotState::PrepSpeaker),
        TransitionResult::Applied(RobotState::PrepSpeaker)
    );
    let speaker = robot.subsystems.shooter.setpoint();

    // Something else moves the flywheels; a no-op transition leaves them.
    robot.subsystems.intake.set_roller_speed(0.4);
    assert_eq!(
        robot.try_state(RobotState::PrepSpeaker),
        TransitionResult::AlreadyActive
    );
    assert_eq!(rig.intake.model().roller_speed, 0.4);
    assert_eq!(robot.subsystems.shooter.setpoint(), speaker);
    assert_eq!(robot.modes.transition_count(), 1);
}

#[test]
fn repeated_try_enters_state_in_the_cycle_precondition_holds() {
    let (rig, mut robot) = robot();
    let mut task = try_state(RobotState::StoreFeeder).repeatedly();
    task.start(&mut robot);
    for _ in 0..10 {
        cycle(&mut task, &mut robot);
        assert_eq!(robot.robot_state(), RobotState::None);
    }

    rig.transfer.model_mut().stored = true;
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
    assert_eq!(robot.robot_state(), RobotState::StoreFeeder);
    for _ in 0..10 {
        cycle(&mut task, &mut robot);
    }
    assert_eq!(robot.modes.transition_count(), 1);
}

#[test]
fn stored_piece_with_idle_target_returns_to_none() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    robot.try_state(RobotState::StoreFeeder);
    robot.set_target_state(TargetState::None);

    let mut task = try_target_state();
    task.start(&mut robot);
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Done);
    assert_eq!(robot.robot_state(), RobotState::None);
}

#[test]
fn target_is_read_when_ticked_not_when_built() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    robot.set_target_state(TargetState::PrepSpeaker);
    let mut task = try_target_state();
    task.start(&mut robot);

    robot.set_target_state(TargetState::PrepShuffle);
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Done);
    assert_eq!(robot.robot_state(), RobotState::PrepShuffle);
}

#[test]
fn every_target_maps_to_its_state() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    for target in TargetState::ALL {
        robot.set_target_state(target);
        assert!(robot.try_target_state().is_complete(), "{target:?}");
        assert_eq!(robot.robot_state(), target.robot_state());
        assert!(robot.modes.is_current_state_target_state());
    }
}

#[test]
fn shooting_needs_prep_piece_and_readiness() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(true);
    robot.try_state(RobotState::StoreFeeder);
    assert!(matches!(
        robot.try_state(RobotState::Shooting),
        TransitionResult::Rejected(_)
    ));

    robot.try_state(RobotState::PrepShuffle);
    rig.shooter.model_mut().ready_override = Some(false);
    assert!(matches!(
        robot.try_state(RobotState::Shooting),
        TransitionResult::Rejected(_)
    ));

    rig.shooter.model_mut().ready_override = Some(true);
    assert_eq!(
        robot.try_state(RobotState::Shooting),
        TransitionResult::Applied(RobotState::Shooting)
    );
    assert!(rig.transfer.model().feeder_speed > 0.0);
}

#[test]
fn eject_and_none_are_always_reachable() {
    let (rig, mut robot) = robot();
    for stored in [false, true] {
        rig.transfer.model_mut().stored = stored;
        assert!(robot.try_state(RobotState::Ejecting).is_complete());
        assert!(robot.try_state(RobotState::None).is_complete());
    }
}
