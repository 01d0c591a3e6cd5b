use talon_common::resource::Resources;
use talon_common::state::{Mechanism, RobotMode, RobotState, ZeroStatus};
use talon_control::orchestrator::ScheduleOutcome;
use talon_control::state::TransitionResult;
use talon_control::task::{TaskExt, run};

use super::{runner, step_until};

#[test]
fn enabling_zeroes_unzeroed_mechanisms() {
    let (rig, mut runner) = runner();
    runner.set_mode(RobotMode::Teleop);
    assert_eq!(runner.scheduler.running_names(), vec!["ZeroSubsystems"]);
    assert_eq!(runner.robot.zeroing.status(Mechanism::Elevator), ZeroStatus::Attempting);

    let cycles = step_until(&mut runner, 100, |r| r.scheduler.is_idle());
    assert!(cycles.is_some());
    assert!(runner.robot.zeroing.all_zeroed());
    assert_eq!(rig.elevator.model().joint.reading(), 0.0);
    assert_eq!(rig.shooter.model().pivot.voltage, None);

    // Already zeroed: a second enable schedules nothing.
    runner.set_mode(RobotMode::Disabled);
    runner.set_mode(RobotMode::Teleop);
    assert!(runner.scheduler.is_idle());
}

#[test]
fn elevator_timeout_leaves_it_unzeroed_and_the_robot_usable() {
    let (rig, mut runner) = runner();
    rig.elevator.model_mut().joint.stall_amps_per_volt = 0.0;
    runner.set_mode(RobotMode::Teleop);

    let cycles = step_until(&mut runner, 500, |r| r.scheduler.is_idle());
    assert_eq!(cycles, Some(150));
    assert_eq!(runner.robot.zeroing.status(Mechanism::Elevator), ZeroStatus::NotZeroed);
    assert_eq!(runner.robot.zeroing.status(Mechanism::ShooterPivot), ZeroStatus::Zeroed);
    assert_eq!(rig.elevator.model().joint.voltage, None);
    assert_eq!(rig.elevator.model().joint.soft_limits, (true, true));

    rig.transfer.model_mut().stored = true;
    assert_eq!(
        runner.robot.try_state(RobotState::PrepSpeaker),
        TransitionResult::Applied(RobotState::PrepSpeaker)
    );
}

#[test]
fn disabled_robot_shows_zero_status_on_the_strip() {
    let (rig, mut runner) = runner();
    rig.elevator.model_mut().joint.stall_amps_per_volt = 0.0;
    runner.set_mode(RobotMode::Teleop);
    step_until(&mut runner, 500, |r| r.scheduler.is_idle());

    runner.set_mode(RobotMode::Disabled);
    runner.step();
    let feedback = runner.config().feedback.clone();
    let pixels = rig.leds.model().pixels.clone();
    assert_eq!(pixels[0], feedback.elevator_not_zeroed);
    assert_eq!(pixels[7], feedback.elevator_not_zeroed);
    assert_eq!(pixels[2], feedback.shooter_zeroed);
    assert_eq!(pixels[5], feedback.shooter_zeroed);
    assert!(rig.leds.model().any_animation());
}

#[test]
fn zeroing_refuses_incoming_elevator_work() {
    let (_rig, mut runner) = runner();
    runner.set_mode(RobotMode::Teleop);

    let lift = run(|robot| robot.subsystems.elevator.move_to(0.3))
        .requiring(Resources::ELEVATOR)
        .named("Lift")
        .boxed();
    match runner.scheduler.schedule(lift, &mut runner.robot) {
        ScheduleOutcome::Rejected { holder, .. } => assert_eq!(holder, "ZeroSubsystems"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(runner.scheduler.running_names(), vec!["ZeroSubsystems"]);
}

#[test]
fn disabling_mid_zero_cancels_it() {
    let (rig, mut runner) = runner();
    rig.elevator.model_mut().joint.stall_amps_per_volt = 0.0;
    runner.set_mode(RobotMode::Teleop);
    runner.step();

    runner.set_mode(RobotMode::Disabled);
    assert!(runner.scheduler.is_idle());
    assert_eq!(runner.robot.zeroing.status(Mechanism::Elevator), ZeroStatus::NotZeroed);
    assert_eq!(rig.elevator.model().joint.voltage, None);
}

#[test]
fn autonomous_enable_zeroes_before_the_routine() {
    let (rig, mut runner) = runner();
    // A preload that never becomes ready keeps the routine running.
    rig.transfer.model_mut().stored = true;
    rig.shooter.model_mut().ready_override = Some(false);
    runner.set_mode(RobotMode::Autonomous);
    assert_eq!(runner.scheduler.running_names(), vec!["ZeroSubsystems"]);

    let routine_started = step_until(&mut runner, 100, |r| {
        r.scheduler.running_names().iter().any(|n| n == "PreloadOnly")
    });
    assert!(routine_started.is_some());
    assert!(runner.robot.zeroing.all_zeroed());
}

#[test]
fn leaving_autonomous_keeps_a_zero_in_progress() {
    let (rig, mut runner) = runner();
    rig.elevator.model_mut().joint.stall_amps_per_volt = 0.0;
    runner.set_mode(RobotMode::Autonomous);
    for _ in 0..5 {
        runner.step();
    }
    let zero = runner.scheduler.holder(Resources::ELEVATOR);
    assert!(zero.is_some());

    runner.set_mode(RobotMode::Teleop);
    assert_eq!(runner.scheduler.running_names(), vec!["ZeroSubsystems"]);
    assert_eq!(runner.scheduler.holder(Resources::ELEVATOR), zero);
    assert_eq!(runner.scheduler.stats().cancelled, 0);
    assert_eq!(runner.robot.zeroing.status(Mechanism::Elevator), ZeroStatus::Attempting);

    // The original timeout still applies: 150 cycles from the first enable.
    let cycles = step_until(&mut runner, 500, |r| r.scheduler.is_idle());
    assert_eq!(cycles, Some(145));
    assert_eq!(runner.robot.zeroing.status(Mechanism::Elevator), ZeroStatus::NotZeroed);
    assert!(!runner.scheduler.running_names().iter().any(|n| n == "PreloadOnly"));
}
