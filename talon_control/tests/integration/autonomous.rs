use std::sync::atomic::AtomicBool;
use std::time::Duration;

use talon_common::state::{Mechanism, RobotMode, RobotState, ZeroStatus};
use talon_control::cycle::MatchTimeline;
use talon_control::maneuver::auto::{PRELOAD_CENTER, PRELOAD_TAXI};

use super::{runner, step_until};

#[test]
fn preload_taxi_shoots_then_leaves_the_zone() {
    let (rig, mut runner) = runner();
    for mechanism in Mechanism::ALL {
        runner.robot.zeroing.set(mechanism, ZeroStatus::Zeroed);
    }
    {
        let mut transfer = rig.transfer.model_mut();
        transfer.stored = true;
        transfer.transit_cycles = Some(3);
    }
    assert_eq!(runner.selected_auto(), Some(PRELOAD_CENTER));
    assert!(runner.select_auto(PRELOAD_TAXI));
    assert!(!runner.select_auto("Four Piece"));

    runner.set_mode(RobotMode::Autonomous);
    assert_eq!(runner.scheduler.running_names(), vec!["PreloadTaxi"]);

    let cycles = step_until(&mut runner, 400, |r| r.scheduler.is_idle());
    assert!(cycles.is_some());
    assert_eq!(rig.transfer.model().pieces_shot, 1);
    assert_eq!(runner.robot.robot_state(), RobotState::None);

    let start = runner.config().drivetrain.start_pose(1).unwrap();
    let pose = rig.drivetrain.model().pose;
    assert!(pose.x > start.x + 1.0, "{pose:?}");
    assert_eq!(rig.drivetrain.model().vx, 0.0);

    let snapshot = runner.snapshot();
    assert_eq!(snapshot.mode, RobotMode::Autonomous);
    assert!(snapshot.running_tasks.is_empty());
    assert!(snapshot.to_json().contains("\"mode\":\"AUTONOMOUS\""));
}

#[test]
fn paced_loop_stops_at_the_cycle_limit_and_disables() {
    let (_rig, mut runner) = runner();
    let running = AtomicBool::new(true);
    let timeline = MatchTimeline {
        disabled: Duration::ZERO,
        autonomous: Duration::ZERO,
        teleop: None,
    };
    runner.run(&running, &timeline, Some(5)).unwrap();
    assert_eq!(runner.stats.cycle_count, 5);
    assert_eq!(runner.robot.mode(), RobotMode::Disabled);
    assert_eq!(runner.robot.clock.cycle(), 5);
}

#[test]
fn cleared_run_flag_stops_before_the_first_cycle() {
    let (_rig, mut runner) = runner();
    let running = AtomicBool::new(false);
    runner
        .run(&running, &MatchTimeline::default(), None)
        .unwrap();
    assert_eq!(runner.stats.cycle_count, 0);
}
