//! Elevator proxy.

use std::time::Duration;

use crate::subsystem::Zeroable;
use crate::subsystem::sim::{SimHandle, SimJoint};

/// Elevator carriage, positioned in metres above its zeroed hard stop.
pub trait Elevator {
    fn move_to(&mut self, position: f64);
    fn position(&self) -> f64;
    fn is_at_setpoint(&self) -> bool;
    fn as_zeroable_mut(&mut self) -> &mut dyn Zeroable;
    fn periodic(&mut self, _dt: Duration) {}
}

// ─── Simulation ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ElevatorModel {
    pub joint: SimJoint,
    pub tolerance: f64,
}

impl Default for ElevatorModel {
    /// Resting on the hard stop with an unknown sensor offset.
    fn default() -> Self {
        Self {
            joint: SimJoint::new(0.0, -0.12, 1.5),
            tolerance: 0.01,
        }
    }
}

pub type SimElevator = SimHandle<ElevatorModel>;

impl Elevator for SimHandle<ElevatorModel> {
    fn move_to(&mut self, position: f64) {
        self.model_mut().joint.setpoint = position;
    }

    fn position(&self) -> f64 {
        self.model().joint.reading()
    }

    fn is_at_setpoint(&self) -> bool {
        let m = self.model();
        (m.joint.reading() - m.joint.setpoint).abs() <= m.tolerance
    }

    fn as_zeroable_mut(&mut self) -> &mut dyn Zeroable {
        self
    }

    fn periodic(&mut self, dt: Duration) {
        self.model_mut().joint.step(dt);
    }
}

impl Zeroable for SimHandle<ElevatorModel> {
    fn set_open_loop_voltage(&mut self, volts: Option<f64>) {
        let mut m = self.model_mut();
        m.joint.voltage = volts;
        if volts.is_none() {
            m.joint.setpoint = m.joint.reading();
        }
    }

    fn stator_current(&self) -> f64 {
        self.model().joint.current
    }

    fn velocity(&self) -> f64 {
        self.model().joint.velocity
    }

    fn reset_position(&mut self, position: f64) {
        let mut m = self.model_mut();
        m.joint.offset = m.joint.physical - position;
        m.joint.setpoint = position;
    }

    fn set_soft_limits(&mut self, reverse: bool, forward: bool) {
        self.model_mut().joint.soft_limits = (reverse, forward);
    }
}
