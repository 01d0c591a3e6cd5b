//! Autonomous routine registry.
//!
//! Routines are registered by name and built fresh each time autonomous
//! starts, so a routine never carries state from a previous match.

use std::collections::BTreeMap;

use talon_common::resource::Resources;
use tracing::warn;

use crate::config::{ManeuverConfig, RobotConfig};
use crate::maneuver::readiness::ready_to_shoot_auto;
use crate::maneuver::shoot::{ShootOptions, shoot};
use crate::robot::Robot;
use crate::subsystem::Pose;
use crate::task::{BoxedTask, Sequence, TaskExt, run_end, run_once, wait};

pub const PRELOAD_AMP_SIDE: &str = "Preload Only Amp-Side";
pub const PRELOAD_CENTER: &str = "Preload Only Center";
pub const PRELOAD_SOURCE_SIDE: &str = "Preload Only Source-Side";
pub const PRELOAD_TAXI: &str = "Preload Taxi";

/// Named factory for one autonomous routine.
pub struct AutoRoutine {
    name: String,
    build: Box<dyn Fn() -> BoxedTask>,
}

impl AutoRoutine {
    pub fn new(name: impl Into<String>, build: impl Fn() -> BoxedTask + 'static) -> Self {
        Self {
            name: name.into(),
            build: Box::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(&self) -> BoxedTask {
        (self.build)()
    }
}

#[derive(Default)]
pub struct AutoRegistry {
    routines: BTreeMap<String, AutoRoutine>,
    default: Option<String>,
}

impl AutoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload shots from each starting position plus a taxi variant.
    /// The center preload is the default.
    pub fn standard(config: &RobotConfig) -> Self {
        let mut registry = Self::new();
        let starts = [PRELOAD_AMP_SIDE, PRELOAD_CENTER, PRELOAD_SOURCE_SIDE];
        for (index, name) in starts.into_iter().enumerate() {
            let start = config.drivetrain.start_pose(index);
            let maneuvers = config.maneuvers.clone();
            registry.register(AutoRoutine::new(name, move || {
                preload_only(start, &maneuvers)
            }));
        }

        let start = config.drivetrain.start_pose(1);
        let maneuvers = config.maneuvers.clone();
        registry.register(AutoRoutine::new(PRELOAD_TAXI, move || {
            preload_taxi(start, &maneuvers)
        }));

        registry.set_default(PRELOAD_CENTER);
        registry
    }

    /// Add a routine, replacing any routine with the same name.
    pub fn register(&mut self, routine: AutoRoutine) {
        if self.routines.contains_key(routine.name()) {
            warn!(routine = routine.name(), "replacing autonomous routine");
        }
        self.routines.insert(routine.name.clone(), routine);
    }

    /// Select the routine used when no other is chosen. Unknown names are
    /// ignored.
    pub fn set_default(&mut self, name: &str) -> bool {
        if !self.contains(name) {
            warn!(routine = name, "unknown default autonomous routine");
            return false;
        }
        self.default = Some(name.to_owned());
        true
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routines.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routines.contains_key(name)
    }

    pub fn build(&self, name: &str) -> Option<BoxedTask> {
        self.routines.get(name).map(AutoRoutine::build)
    }

    pub fn build_default(&self) -> Option<BoxedTask> {
        self.default.as_deref().and_then(|name| self.build(name))
    }
}

// ─── Routines ───────────────────────────────────────────────────────

fn preload_steps(start: Option<Pose>, maneuvers: &ManeuverConfig) -> Vec<BoxedTask> {
    let mut steps = Vec::with_capacity(3);
    if let Some(pose) = start {
        steps.push(
            run_once(move |robot: &mut Robot| robot.subsystems.drivetrain.reset_pose(pose))
                .requiring(Resources::DRIVETRAIN)
                .boxed(),
        );
    }
    steps.push(wait(maneuvers.preload_delay()).boxed());
    steps.push(shoot(ready_to_shoot_auto, ShootOptions::autonomous(maneuvers)));
    steps
}

/// Seed the pose, then fire the preloaded piece.
pub fn preload_only(start: Option<Pose>, maneuvers: &ManeuverConfig) -> BoxedTask {
    Sequence::new(preload_steps(start, maneuvers))
        .named("PreloadOnly")
        .boxed()
}

/// Preload shot, then drive straight out of the starting zone.
pub fn preload_taxi(start: Option<Pose>, maneuvers: &ManeuverConfig) -> BoxedTask {
    let speed = maneuvers.taxi_speed;
    let taxi = run_end(
        move |robot: &mut Robot| robot.subsystems.drivetrain.drive(speed, 0.0, 0.0, true),
        |robot: &mut Robot| robot.subsystems.drivetrain.drive(0.0, 0.0, 0.0, true),
    )
    .with_timeout(maneuvers.taxi_duration())
    .requiring(Resources::DRIVETRAIN)
    .named("Taxi");

    let mut steps = preload_steps(start, maneuvers);
    steps.push(taxi.boxed());
    Sequence::new(steps).named("PreloadTaxi").boxed()
}

// ─── Tests ──────────────────────────────────────────────────────────
