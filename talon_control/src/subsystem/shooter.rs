//! Shooter proxy: dual flywheels and a zeroable pivot.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ShooterConfig;
use crate::subsystem::Zeroable;
use crate::subsystem::sim::{SimHandle, SimJoint};

/// Flywheel speeds [rot/s] and pivot angle [deg].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShooterSetpoint {
    pub left_rps: f64,
    pub right_rps: f64,
    pub pivot_deg: f64,
}

impl ShooterSetpoint {
    pub const fn new(left_rps: f64, right_rps: f64, pivot_deg: f64) -> Self {
        Self {
            left_rps,
            right_rps,
            pivot_deg,
        }
    }
}

pub trait Shooter {
    fn set_setpoint(&mut self, setpoint: ShooterSetpoint);
    fn setpoint(&self) -> ShooterSetpoint;
    fn pivot_angle(&self) -> f64;
    /// Flywheels and pivot within tolerance of the setpoint.
    fn is_at_setpoint(&self) -> bool;
    /// The shot would leave as commanded if the piece were fed now.
    fn ready_to_shoot(&self) -> bool {
        self.is_at_setpoint()
    }
    fn as_zeroable_mut(&mut self) -> &mut dyn Zeroable;
    fn periodic(&mut self, _dt: Duration) {}
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Flywheels slew toward their setpoint at `spinup_rate`; the pivot is a
/// hard-stop joint in degrees.
#[derive(Debug, Clone)]
pub struct ShooterModel {
    pub setpoint: ShooterSetpoint,
    pub left_rps: f64,
    pub right_rps: f64,
    pub pivot: SimJoint,
    pub spinup_rate: f64,
    pub rps_tolerance: f64,
    pub pivot_tolerance: f64,
    /// Forces `ready_to_shoot` regardless of the physics.
    pub ready_override: Option<bool>,
}

impl ShooterModel {
    pub fn new(config: &ShooterConfig) -> Self {
        Self {
            setpoint: ShooterSetpoint::default(),
            left_rps: 0.0,
            right_rps: 0.0,
            pivot: SimJoint::new(0.0, 0.0, 120.0),
            spinup_rate: 250.0,
            rps_tolerance: config.rps_tolerance,
            pivot_tolerance: config.pivot_tolerance_deg,
            ready_override: None,
        }
    }

    fn at_setpoint(&self) -> bool {
        (self.left_rps - self.setpoint.left_rps).abs() <= self.rps_tolerance
            && (self.right_rps - self.setpoint.right_rps).abs() <= self.rps_tolerance
            && (self.pivot.reading() - self.setpoint.pivot_deg).abs() <= self.pivot_tolerance
    }
}

impl Default for ShooterModel {
    fn default() -> Self {
        Self::new(&ShooterConfig::default())
    }
}

fn slew(current: f64, target: f64, max_step: f64) -> f64 {
    current + (target - current).clamp(-max_step, max_step)
}

pub type SimShooter = SimHandle<ShooterModel>;

impl Shooter for SimHandle<ShooterModel> {
    fn set_setpoint(&mut self, setpoint: ShooterSetpoint) {
        let mut m = self.model_mut();
        m.setpoint = setpoint;
        m.pivot.setpoint = setpoint.pivot_deg;
    }

    fn setpoint(&self) -> ShooterSetpoint {
        self.model().setpoint
    }

    fn pivot_angle(&self) -> f64 {
        self.model().pivot.reading()
    }

    fn is_at_setpoint(&self) -> bool {
        self.model().at_setpoint()
    }

    fn ready_to_shoot(&self) -> bool {
        let m = self.model();
        m.ready_override.unwrap_or_else(|| m.at_setpoint())
    }

    fn as_zeroable_mut(&mut self) -> &mut dyn Zeroable {
        self
    }

    fn periodic(&mut self, dt: Duration) {
        let mut m = self.model_mut();
        let step = m.spinup_rate * dt.as_secs_f64();
        m.left_rps = slew(m.left_rps, m.setpoint.left_rps, step);
        m.right_rps = slew(m.right_rps, m.setpoint.right_rps, step);
        m.pivot.step(dt);
    }
}

impl Zeroable for SimHandle<ShooterModel> {
    fn set_open_loop_voltage(&mut self, volts: Option<f64>) {
        let mut m = self.model_mut();
        m.pivot.voltage = volts;
        if volts.is_none() {
            m.pivot.setpoint = m.setpoint.pivot_deg;
        }
    }

    fn stator_current(&self) -> f64 {
        self.model().pivot.current
    }

    fn velocity(&self) -> f64 {
        self.model().pivot.velocity
    }

    fn reset_position(&mut self, position: f64) {
        let mut m = self.model_mut();
        m.pivot.offset = m.pivot.physical - position;
    }

    fn set_soft_limits(&mut self, reverse: bool, forward: bool) {
        self.model_mut().pivot.soft_limits = (reverse, forward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(20);

    #[test]
    fn spins_up_to_setpoint() {
        let mut s = SimShooter::default();
        s.set_setpoint(ShooterSetpoint::new(60.0, 50.0, 30.0));
        assert!(!s.ready_to_shoot());
        for _ in 0..25 {
            s.periodic(DT);
        }
        assert!(s.is_at_setpoint());
        assert!(s.ready_to_shoot());
        assert!((s.pivot_angle() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn override_wins() {
        let s = SimShooter::default();
        s.model_mut().ready_override = Some(true);
        assert!(s.ready_to_shoot());
        s.model_mut().ready_override = Some(false);
        assert!(!s.ready_to_shoot());
    }
}
