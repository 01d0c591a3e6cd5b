//! Climber proxy.

use std::time::Duration;

use crate::subsystem::sim::SimHandle;

/// Climber winch. Motion is only honoured while the rest of the robot is
/// stowed clear of the chain.
pub trait Climber {
    /// Duty cycle; ignored (treated as zero) unless safe to move.
    fn set_speed(&mut self, speed: f64);
    fn set_safe_to_move(&mut self, safe: bool);
    fn is_safe_to_move(&self) -> bool;
    fn position(&self) -> f64;
    fn is_at_position(&self, position: f64) -> bool;
    fn periodic(&mut self, _dt: Duration) {}
}

#[derive(Debug, Clone)]
pub struct ClimberModel {
    pub speed: f64,
    pub position: f64,
    pub safe_to_move: bool,
    /// Travel per unit duty per second.
    pub travel_rate: f64,
    pub tolerance: f64,
}

impl Default for ClimberModel {
    fn default() -> Self {
        Self {
            speed: 0.0,
            position: 0.0,
            safe_to_move: false,
            travel_rate: 100.0,
            tolerance: 2.0,
        }
    }
}

pub type SimClimber = SimHandle<ClimberModel>;

impl Climber for SimHandle<ClimberModel> {
    fn set_speed(&mut self, speed: f64) {
        let mut m = self.model_mut();
        m.speed = if m.safe_to_move { speed.clamp(-1.0, 1.0) } else { 0.0 };
    }

    fn set_safe_to_move(&mut self, safe: bool) {
        let mut m = self.model_mut();
        m.safe_to_move = safe;
        if !safe {
            m.speed = 0.0;
        }
    }

    fn is_safe_to_move(&self) -> bool {
        self.model().safe_to_move
    }

    fn position(&self) -> f64 {
        self.model().position
    }

    fn is_at_position(&self, position: f64) -> bool {
        let m = self.model();
        (m.position - position).abs() <= m.tolerance
    }

    fn periodic(&mut self, dt: Duration) {
        let mut m = self.model_mut();
        m.position += m.speed * m.travel_rate * dt.as_secs_f64();
    }
}
