//! Named readiness predicates.
//!
//! Each is a pure function of live proxy reads and state-machine fields.

use talon_common::state::RobotState;

use crate::robot::Robot;
use crate::subsystem::FieldTarget;

fn facing_a_target(robot: &Robot) -> bool {
    let dt = &robot.subsystems.drivetrain;
    dt.is_facing(FieldTarget::Speaker) || dt.is_facing(FieldTarget::Shuffle)
}

/// Operator feedback: aimed, spun up, settled in the target state, holding
/// a piece.
pub fn ready_to_shoot_operator(robot: &Robot) -> bool {
    facing_a_target(robot)
        && robot.subsystems.shooter.ready_to_shoot()
        && robot.modes.is_current_state_target_state()
        && robot.is_game_piece_stored()
}

/// Driver feedback: like the operator's, without the aim requirement.
pub fn ready_to_shoot_driver(robot: &Robot) -> bool {
    robot.subsystems.shooter.ready_to_shoot()
        && robot.modes.is_current_state_target_state()
        && robot.is_game_piece_stored()
}

/// Autonomous shots: aimed and spun up.
pub fn ready_to_shoot_auto(robot: &Robot) -> bool {
    facing_a_target(robot) && robot.subsystems.shooter.ready_to_shoot()
}

/// Speaker indicator: vision shot fully prepared.
pub fn ready_to_shoot_speaker_leds(robot: &Robot) -> bool {
    robot.subsystems.drivetrain.is_facing(FieldTarget::Speaker)
        && robot.subsystems.shooter.ready_to_shoot()
        && robot.robot_state() == RobotState::PrepVision
        && robot.is_game_piece_stored()
}

/// Shuffle indicator: shuffle lob fully prepared.
pub fn ready_to_shoot_shuffle_leds(robot: &Robot) -> bool {
    robot.subsystems.drivetrain.is_facing(FieldTarget::Shuffle)
        && robot.subsystems.shooter.ready_to_shoot()
        && robot.robot_state() == RobotState::PrepShuffle
        && robot.is_game_piece_stored()
}
