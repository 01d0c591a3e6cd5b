//! Ground intake proxy.

use std::time::Duration;

use crate::subsystem::sim::SimHandle;

/// Ground intake rollers.
pub trait Intake {
    /// Roller duty cycle in [-1, 1]; negative ejects.
    fn set_roller_speed(&mut self, speed: f64);
    fn roller_speed(&self) -> f64;
    fn periodic(&mut self, _dt: Duration) {}
}

#[derive(Debug, Clone, Default)]
pub struct IntakeModel {
    pub roller_speed: f64,
}

pub type SimIntake = SimHandle<IntakeModel>;

impl Intake for SimHandle<IntakeModel> {
    fn set_roller_speed(&mut self, speed: f64) {
        self.model_mut().roller_speed = speed.clamp(-1.0, 1.0);
    }

    fn roller_speed(&self) -> f64 {
        self.model().roller_speed
    }
}
