//! Intake maneuvers.

use talon_common::resource::Resources;
use talon_common::state::RobotState;

use crate::robot::Robot;
use crate::task::{BoxedTask, Deferred, TaskExt, run_end, try_state};

/// Hold INTAKING until a piece is stored. The stored-piece trigger takes
/// over from there.
pub fn intaking() -> BoxedTask {
    try_state(RobotState::Intaking)
        .repeatedly()
        .until(Robot::is_game_piece_stored)
        .requiring(Resources::INTAKE | Resources::TRANSFER)
        .named("Intaking")
        .boxed()
}

/// Hold INTAKE_SOURCE until a piece is stored.
pub fn intake_source() -> BoxedTask {
    try_state(RobotState::IntakeSource)
        .repeatedly()
        .until(Robot::is_game_piece_stored)
        .requiring(Resources::SHOOTER | Resources::TRANSFER)
        .named("IntakeSource")
        .boxed()
}

/// Leave source intaking: store the piece if one arrived, otherwise idle.
/// The choice is made when the release starts.
pub fn release_intake_source() -> BoxedTask {
    Deferred::new(|robot: &Robot| {
        if robot.is_game_piece_stored() {
            try_state(RobotState::StoreFeeder).boxed()
        } else {
            try_state(RobotState::None).boxed()
        }
    })
    .with_requirements(Resources::SHOOTER | Resources::TRANSFER)
    .named("ReleaseIntakeSource")
    .boxed()
}

/// Spit the piece out for as long as the task runs, then idle.
pub fn eject() -> BoxedTask {
    run_end(
        |robot: &mut Robot| {
            robot.try_state(RobotState::Ejecting);
        },
        |robot: &mut Robot| {
            robot.try_state(RobotState::None);
        },
    )
    .requiring(Resources::INTAKE | Resources::TRANSFER)
    .named("Eject")
    .boxed()
}
