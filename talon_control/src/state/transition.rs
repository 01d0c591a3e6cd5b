//! Transition preconditions and the setpoints each state issues.
//!
//! Preconditions are pure predicates over live proxy reads. Nothing here is
//! cached across cycles.

use talon_common::state::RobotState;

use crate::config::{ShooterConfig, StateSetpoints};
use crate::subsystem::{FieldTarget, ShooterSetpoint, Subsystems};

/// Check whether `requested` may be entered from `current`.
///
/// Returns the rejection reason when the world is not ready.
pub fn precondition(
    current: RobotState,
    requested: RobotState,
    subsystems: &Subsystems,
) -> Result<(), &'static str> {
    use RobotState::*;

    let stored = subsystems.transfer.is_game_piece_stored();
    match requested {
        None | Ejecting => Ok(()),
        Intaking | IntakeSource if stored => Err("game piece already stored"),
        Intaking | IntakeSource => Ok(()),
        StoreFeeder | PrepVision | PrepShuffle | PrepSpeaker if !stored => {
            Err("no game piece stored")
        }
        StoreFeeder | PrepVision | PrepShuffle | PrepSpeaker => Ok(()),
        Shooting => {
            if !current.is_prep() {
                Err("shooting requires a prep state")
            } else if !stored {
                Err("no game piece stored")
            } else if !subsystems.shooter.ready_to_shoot() {
                Err("shooter not ready")
            } else {
                Ok(())
            }
        }
    }
}

/// Vision shot setpoint for the live speaker distance.
pub fn vision_setpoint(
    subsystems: &Subsystems,
    setpoints: &StateSetpoints,
    shooter: &ShooterConfig,
) -> ShooterSetpoint {
    let distance = subsystems.drivetrain.distance_to(FieldTarget::Speaker);
    ShooterSetpoint::new(
        setpoints.vision_left_rps,
        setpoints.vision_right_rps,
        shooter.pivot_for_distance(distance),
    )
}

/// Issue the actuator setpoints of `state`.
pub fn apply(
    state: RobotState,
    subsystems: &mut Subsystems,
    setpoints: &StateSetpoints,
    shooter: &ShooterConfig,
) {
    use RobotState::*;

    let sp = setpoints;
    match state {
        None => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(0.0);
            subsystems.shooter.set_setpoint(sp.idle_shooter);
            subsystems.elevator.move_to(sp.elevator_stow);
        }
        Intaking => {
            subsystems.intake.set_roller_speed(sp.intake_roller_speed);
            subsystems.transfer.set_feeder_speed(sp.transfer_intake_speed);
            subsystems.shooter.set_setpoint(sp.idle_shooter);
            subsystems.elevator.move_to(sp.elevator_stow);
        }
        IntakeSource => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(sp.transfer_source_speed);
            subsystems.shooter.set_setpoint(sp.source_shooter);
            subsystems.elevator.move_to(sp.elevator_stow);
        }
        StoreFeeder => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(0.0);
            subsystems.shooter.set_setpoint(sp.idle_shooter);
        }
        PrepVision => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(0.0);
            let aim = vision_setpoint(subsystems, sp, shooter);
            subsystems.shooter.set_setpoint(aim);
        }
        PrepShuffle => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(0.0);
            subsystems.shooter.set_setpoint(sp.shuffle_shooter);
        }
        PrepSpeaker => {
            subsystems.intake.set_roller_speed(0.0);
            subsystems.transfer.set_feeder_speed(0.0);
            subsystems.shooter.set_setpoint(sp.speaker_shooter);
        }
        // Flywheels keep the prep setpoint.
        Shooting => {
            subsystems.transfer.set_feeder_speed(sp.transfer_feed_speed);
        }
        Ejecting => {
            subsystems.intake.set_roller_speed(-sp.eject_speed);
            subsystems.transfer.set_feeder_speed(-sp.eject_speed);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
