//! Status snapshot for the selection/telemetry layer.
//!
//! Produced on request and serialised as JSON. Publishing is left to the
//! consumer.

use serde::Serialize;
use talon_common::state::{Mechanism, RobotMode, RobotState, TargetState, ZeroStatus};

use crate::orchestrator::Scheduler;
use crate::robot::Robot;

/// Point-in-time view of the control core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub cycle: u64,
    pub mode: RobotMode,
    pub robot_state: RobotState,
    pub target_state: TargetState,
    pub at_target: bool,
    pub game_piece_stored: bool,
    pub ready_to_shoot: bool,
    pub elevator_zero: ZeroStatus,
    pub shooter_zero: ZeroStatus,
    pub running_tasks: Vec<String>,
    pub overruns: u64,
    pub avg_cycle_us: u64,
}

impl StatusSnapshot {
    pub fn capture(robot: &Robot, scheduler: &Scheduler, overruns: u64, avg_cycle_ns: i64) -> Self {
        Self {
            cycle: robot.clock.cycle(),
            mode: robot.mode(),
            robot_state: robot.robot_state(),
            target_state: robot.target_state(),
            at_target: robot.modes.is_current_state_target_state(),
            game_piece_stored: robot.is_game_piece_stored(),
            ready_to_shoot: robot.subsystems.shooter.ready_to_shoot(),
            elevator_zero: robot.zeroing.status(Mechanism::Elevator),
            shooter_zero: robot.zeroing.status(Mechanism::ShooterPivot),
            running_tasks: scheduler.running_names(),
            overruns,
            avg_cycle_us: u64::try_from(avg_cycle_ns / 1_000).unwrap_or(0),
        }
    }

    pub fn to_json(&self) -> String {
        // Plain enums, strings and integers: serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
