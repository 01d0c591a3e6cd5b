use std::cell::RefCell;
use std::rc::Rc;

use talon_common::state::{RobotMode, RobotState, TargetState};
use talon_control::bindings::{GAME_PIECE_COLLECTED, GAME_PIECE_STORED};
use talon_control::subsystem::operator::Controller;
use talon_control::trigger::act;

use super::{runner, zeroed_teleop};

#[test]
fn arriving_piece_is_stored_and_follows_the_target() {
    let (rig, mut runner) = zeroed_teleop();
    runner.robot.set_target_state(TargetState::PrepSpeaker);
    runner.robot.try_state(RobotState::Intaking);

    rig.transfer.model_mut().stored = true;
    runner.step();
    assert_eq!(runner.robot.robot_state(), RobotState::PrepSpeaker);
    assert!(rig.transfer.model().collected);
    assert!(runner.scheduler.is_idle());
}

#[test]
fn piece_arriving_while_disabled_is_not_stored() {
    let (rig, mut runner) = runner();
    rig.transfer.model_mut().stored = true;
    runner.step();
    assert!(rig.transfer.model().collected);
    assert_eq!(runner.robot.robot_state(), RobotState::None);
    assert!(runner.scheduler.is_idle());
}

#[test]
fn collected_feedback_stays_silent() {
    let (rig, mut runner) = zeroed_teleop();
    rig.transfer.model_mut().collected = true;
    for _ in 0..20 {
        runner.step();
    }
    assert_eq!(rig.operator.model().strength(Controller::Driver), 0.0);
    assert!(runner.triggers.names().any(|n| n == GAME_PIECE_COLLECTED));
}

#[test]
fn triggers_fire_in_registration_order_before_tasks_run() {
    let (rig, mut runner) = zeroed_teleop();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    runner
        .triggers
        .add("late observer", |robot| robot.is_game_piece_stored())
        .on_true(act(move |robot| sink.borrow_mut().push(robot.robot_state())));
    assert_eq!(runner.triggers.names().next(), Some(GAME_PIECE_STORED));

    rig.transfer.model_mut().stored = true;
    runner.step();
    // The store task was scheduled by the earlier binding but has not
    // ticked yet when the later trigger fires.
    assert_eq!(*seen.borrow(), vec![RobotState::None]);
    assert_eq!(runner.robot.robot_state(), RobotState::None);

    runner.step();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn operator_rumble_tracks_readiness() {
    let (rig, mut runner) = zeroed_teleop();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(true);
    rig.drivetrain
        .model_mut()
        .face(talon_control::subsystem::FieldTarget::Speaker);
    runner.step();
    runner.step();
    let strength = runner.config().feedback.operator_rumble;
    assert_eq!(rig.operator.model().strength(Controller::Operator), strength);

    rig.shooter.model_mut().ready_override = Some(false);
    runner.step();
    assert_eq!(rig.operator.model().strength(Controller::Operator), 0.0);
    assert_eq!(runner.robot.mode(), RobotMode::Teleop);
}
