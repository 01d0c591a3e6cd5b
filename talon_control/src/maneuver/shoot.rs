//! Shoot maneuver.
//!
//! ```text
//! Unless(no piece,
//!   Sequence(
//!     SetTarget(target),
//!     Parallel(Repeatedly(TryState(prep)), Aim) until prep ∧ ready, [prep timeout]
//!     Repeatedly(TryState(SHOOTING)) until piece gone,         [shot timeout]
//!     Wait(settle),
//!     TryState(NONE)))
//! ```
//!
//! Timeouts are optional per stage. Without them a shot that never becomes
//! ready keeps preparing until the maneuver is cancelled; autonomous
//! routines bound both stages so the routine can move on.

use std::time::Duration;

use talon_common::resource::Resources;
use talon_common::state::{RobotState, TargetState};

use crate::config::ManeuverConfig;
use crate::robot::Robot;
use crate::subsystem::FieldTarget;
use crate::task::{
    BoxedTask, Parallel, Run, Sequence, Task, TaskExt, run_end, set_target_state, try_state, wait,
};

/// Per-invocation shot parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootOptions {
    /// Target state the shot prepares.
    pub target: TargetState,
    /// Delay after the piece leaves before returning to NONE.
    pub settle: Duration,
    /// Give up preparing after this long and try to shoot anyway.
    pub prep_timeout: Option<Duration>,
    /// Give up feeding after this long.
    pub shot_timeout: Option<Duration>,
}

impl ShootOptions {
    /// Vision shot with no stage timeouts.
    pub fn teleop(config: &ManeuverConfig) -> Self {
        Self {
            target: TargetState::PrepVision,
            settle: config.settle_delay(),
            prep_timeout: None,
            shot_timeout: None,
        }
    }

    /// Vision shot with both stages bounded.
    pub fn autonomous(config: &ManeuverConfig) -> Self {
        Self {
            target: TargetState::PrepVision,
            settle: config.settle_delay(),
            prep_timeout: Some(config.auto_prep_timeout()),
            shot_timeout: Some(config.auto_shot_timeout()),
        }
    }

    pub fn with_target(mut self, target: TargetState) -> Self {
        self.target = target;
        self
    }
}

/// Where the drivetrain points while preparing `target`, if anywhere.
fn aim_target(target: TargetState) -> Option<FieldTarget> {
    match target {
        TargetState::PrepVision => Some(FieldTarget::Speaker),
        TargetState::PrepShuffle => Some(FieldTarget::Shuffle),
        TargetState::PrepSpeaker | TargetState::None => None,
    }
}

/// Rotate in place toward `target` until interrupted, then stop.
pub fn aim_at(target: FieldTarget) -> Run {
    run_end(
        move |robot: &mut Robot| {
            let dt = &mut robot.subsystems.drivetrain;
            let omega = dt.velocity_to_snap(dt.angle_to(target));
            dt.drive(0.0, 0.0, omega, true);
        },
        |robot: &mut Robot| robot.subsystems.drivetrain.drive(0.0, 0.0, 0.0, true),
    )
}

fn bounded(task: impl Task + 'static, timeout: Option<Duration>) -> BoxedTask {
    match timeout {
        Some(limit) => task.with_timeout(limit).boxed(),
        None => task.boxed(),
    }
}

/// Prepare, fire once `ready` holds, and return to NONE.
pub fn shoot(ready: impl Fn(&Robot) -> bool + 'static, options: ShootOptions) -> BoxedTask {
    let prep_state = options.target.robot_state();
    let mut prep_children = vec![try_state(prep_state).repeatedly().boxed()];
    if let Some(field_target) = aim_target(options.target) {
        prep_children.push(aim_at(field_target).boxed());
    }
    // Readiness alone is not enough: feeding is only legal from a prep state.
    let prep = Parallel::until(prep_children, move |robot| {
        robot.robot_state() == prep_state && ready(robot)
    });

    let feed = try_state(RobotState::Shooting)
        .repeatedly()
        .until(|robot| !robot.is_game_piece_stored());

    Sequence::new(vec![
        set_target_state(options.target).boxed(),
        bounded(prep, options.prep_timeout),
        bounded(feed, options.shot_timeout),
        wait(options.settle).boxed(),
        try_state(RobotState::None).boxed(),
    ])
    .unless(|robot| !robot.is_game_piece_stored())
    .requiring(Resources::DRIVETRAIN | Resources::STATE_MACHINE)
    .named("Shoot")
    .boxed()
}

// ─── Tests ──────────────────────────────────────────────────────────
