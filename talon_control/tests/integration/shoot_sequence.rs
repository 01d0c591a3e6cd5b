use std::time::Duration;

use talon_common::state::{RobotMode, RobotState, TargetState};
use talon_control::config::RobotConfig;
use talon_control::maneuver::readiness::ready_to_shoot_auto;
use talon_control::maneuver::{ShootOptions, shoot};
use talon_control::robot::Robot;
use talon_control::subsystem::FieldTarget;
use talon_control::task::{Task, TaskStatus};

use super::{cycle, robot, step_until, zeroed_teleop};

fn options(settle: Duration) -> ShootOptions {
    ShootOptions {
        settle,
        ..ShootOptions::teleop(&RobotConfig::default().maneuvers)
    }
}

fn shooter_ready(robot: &Robot) -> bool {
    robot.subsystems.shooter.ready_to_shoot() && robot.robot_state().is_prep()
}

#[test]
fn fires_in_the_cycle_readiness_is_observed() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(false);
    let mut task = shoot(shooter_ready, options(Duration::ZERO));
    task.start(&mut robot);

    for _ in 0..5 {
        assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
        assert_eq!(robot.robot_state(), RobotState::PrepVision);
    }
    assert_eq!(robot.target_state(), TargetState::PrepVision);

    rig.shooter.model_mut().ready_override = Some(true);
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
    assert_eq!(robot.robot_state(), RobotState::Shooting);
}

#[test]
fn returns_to_none_once_the_piece_leaves() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(true);
    let mut task = shoot(shooter_ready, options(Duration::ZERO));
    task.start(&mut robot);
    cycle(&mut task, &mut robot);
    cycle(&mut task, &mut robot);
    assert_eq!(robot.robot_state(), RobotState::Shooting);

    for _ in 0..3 {
        assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
        assert_eq!(robot.robot_state(), RobotState::Shooting);
    }

    rig.transfer.model_mut().stored = false;
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Done);
    assert_eq!(robot.robot_state(), RobotState::None);
}

#[test]
fn settle_delay_holds_shooting_state() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(true);
    // Five cycles at the default 20 ms period.
    let mut task = shoot(shooter_ready, options(Duration::from_millis(100)));
    task.start(&mut robot);
    cycle(&mut task, &mut robot);
    cycle(&mut task, &mut robot);

    rig.transfer.model_mut().stored = false;
    for _ in 0..5 {
        assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Running);
        assert_eq!(robot.robot_state(), RobotState::Shooting);
    }
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Done);
    assert_eq!(robot.robot_state(), RobotState::None);
}

#[test]
fn empty_robot_skips_the_shot() {
    let (rig, mut robot) = robot();
    let mut task = shoot(|_| true, options(Duration::ZERO));
    task.start(&mut robot);
    assert_eq!(cycle(&mut task, &mut robot), TaskStatus::Done);
    assert_eq!(robot.robot_state(), RobotState::None);
    assert_eq!(robot.target_state(), TargetState::None);
    assert_eq!(rig.transfer.model().feeder_speed, 0.0);
}

#[test]
fn auto_timeouts_give_up_on_a_shot_that_never_readies() {
    let (rig, mut robot) = robot();
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(false);
    let config = RobotConfig::default();
    let mut task = shoot(ready_to_shoot_auto, ShootOptions::autonomous(&config.maneuvers));
    task.start(&mut robot);

    let mut finished = None;
    for n in 1..=500 {
        if cycle(&mut task, &mut robot) != TaskStatus::Running {
            finished = Some(n);
            break;
        }
    }
    let bound = (config.maneuvers.auto_prep_timeout() + config.maneuvers.auto_shot_timeout()
        + config.maneuvers.settle_delay())
    .as_millis() as usize
        / 20
        + 3;
    assert!(finished.is_some_and(|n| n <= bound), "{finished:?}");
    assert_eq!(robot.robot_state(), RobotState::None);
}

#[test]
fn runner_fires_a_vision_shot_end_to_end() {
    let (rig, mut runner) = zeroed_teleop();
    {
        let mut transfer = rig.transfer.model_mut();
        transfer.stored = true;
        transfer.transit_cycles = Some(3);
    }
    // Let the store binding settle the piece first.
    runner.step();
    runner.step();
    assert_eq!(runner.robot.robot_state(), RobotState::None);
    rig.drivetrain.model_mut().face(FieldTarget::Speaker);

    let task = shoot(ready_to_shoot_auto, options(Duration::ZERO));
    assert!(runner.scheduler.schedule(task, &mut runner.robot).task_id().is_some());

    let fired = step_until(&mut runner, 200, |r| r.robot.robot_state() == RobotState::Shooting);
    assert!(fired.is_some());
    let done = step_until(&mut runner, 50, |r| {
        !r.robot.is_game_piece_stored() && r.robot.robot_state() == RobotState::None
    });
    assert!(done.is_some());
    assert_eq!(rig.transfer.model().pieces_shot, 1);
    assert_eq!(runner.robot.mode(), RobotMode::Teleop);
}
