//! Reactive bindings registered at startup.
//!
//! Feedback only: rumble, indicator lights and the automatic store after a
//! piece arrives. Operator button bindings live outside the control core
//! and call the same task factories.

use talon_common::feedback::RumbleSide;
use talon_common::state::RobotState;

use crate::config::FeedbackConfig;
use crate::maneuver::readiness::{
    ready_to_shoot_driver, ready_to_shoot_operator, ready_to_shoot_shuffle_leds,
    ready_to_shoot_speaker_leds,
};
use crate::robot::Robot;
use crate::subsystem::operator::Controller;
use crate::task::{BoxedTask, TaskExt, try_state, try_target_state};
use crate::trigger::{Trigger, TriggerSet, act, schedule};

pub const GAME_PIECE_STORED: &str = "game piece stored";
pub const GAME_PIECE_COLLECTED: &str = "game piece collected";
pub const READY_OPERATOR: &str = "ready to shoot (operator)";
pub const READY_DRIVER: &str = "ready to shoot (driver)";
pub const READY_SPEAKER_LEDS: &str = "ready to shoot (speaker leds)";
pub const READY_SHUFFLE_LEDS: &str = "ready to shoot (shuffle leds)";

/// Store the arriving piece, then converge on whatever target is set.
pub fn store_game_piece() -> BoxedTask {
    try_state(RobotState::StoreFeeder)
        .and_then(try_target_state())
        .named("StoreGamePiece")
        .boxed()
}

fn rumble(controller: Controller, strength: f64) -> impl FnMut(&mut Robot) + 'static {
    move |robot: &mut Robot| {
        robot
            .subsystems
            .operator
            .rumble(controller, RumbleSide::Both, strength)
    }
}

pub fn configure_triggers(triggers: &mut TriggerSet, feedback: &FeedbackConfig) {
    triggers
        .add(GAME_PIECE_STORED, Robot::is_game_piece_stored)
        .on_true(schedule(|_| store_game_piece()))
        .on_true(act(|robot| robot.subsystems.transfer.set_game_piece_collected(true)));

    // Collected feedback is switched off; the trigger stays registered so it
    // can be re-enabled by swapping the condition.
    let collected_rumble = feedback.collected_rumble;
    let collected_color = feedback.collected_color;
    triggers
        .push(Trigger::never(GAME_PIECE_COLLECTED))
        .on_true(act(move |robot| {
            robot
                .subsystems
                .operator
                .rumble(Controller::Driver, RumbleSide::Left, collected_rumble)
        }))
        .on_true(act(move |robot| robot.subsystems.leds.set_color(collected_color)));

    triggers
        .add(READY_OPERATOR, ready_to_shoot_operator)
        .on_true(act(rumble(Controller::Operator, feedback.operator_rumble)))
        .on_false(act(rumble(Controller::Operator, 0.0)));

    triggers
        .add(READY_DRIVER, ready_to_shoot_driver)
        .on_true(act(rumble(Controller::Driver, feedback.driver_rumble)))
        .on_false(act(rumble(Controller::Driver, 0.0)));

    for (name, condition) in [
        (READY_SPEAKER_LEDS, ready_to_shoot_speaker_leds as fn(&Robot) -> bool),
        (READY_SHUFFLE_LEDS, ready_to_shoot_shuffle_leds),
    ] {
        let animation = feedback.ready_to_shoot_animation;
        triggers
            .add(name, condition)
            .on_true(act(move |robot| robot.subsystems.leds.set_animation(animation, 0)))
            .on_false(act(|robot| robot.subsystems.leds.clear_animation()));
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
