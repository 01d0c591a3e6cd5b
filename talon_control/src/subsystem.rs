//! Subsystem proxies: the actuator/sensor surface the control core drives.
//!
//! Each physical subsystem is reached only through its trait. Hardware
//! bindings live outside this crate; the `sim` implementations back tests,
//! benchmarks and the bundled binary.

pub mod climber;
pub mod drivetrain;
pub mod elevator;
pub mod intake;
pub mod leds;
pub mod operator;
pub mod shooter;
pub mod sim;
pub mod transfer;

use std::time::Duration;

use talon_common::state::Mechanism;

pub use climber::Climber;
pub use drivetrain::{Drivetrain, FieldTarget, Pose};
pub use elevator::Elevator;
pub use intake::Intake;
pub use leds::Leds;
pub use operator::OperatorFeedback;
pub use shooter::{Shooter, ShooterSetpoint};
pub use transfer::Transfer;

// ─── Zeroable ───────────────────────────────────────────────────────

/// Mechanism whose relative position sensor is zeroed by driving it into a
/// hard stop and watching for the current spike.
pub trait Zeroable {
    /// `Some(volts)` drives open loop; `None` returns to closed-loop hold.
    fn set_open_loop_voltage(&mut self, volts: Option<f64>);
    /// Motor stator current [A].
    fn stator_current(&self) -> f64;
    /// Mechanism velocity, sign matching the applied voltage [units/s].
    fn velocity(&self) -> f64;
    /// Redefine the current sensor reading as `position`.
    fn reset_position(&mut self, position: f64);
    /// Enable or disable the reverse and forward software limits.
    fn set_soft_limits(&mut self, reverse: bool, forward: bool);
}

// ─── Subsystem Bundle ───────────────────────────────────────────────

/// Every subsystem proxy owned by the robot.
pub struct Subsystems {
    pub drivetrain: Box<dyn Drivetrain>,
    pub intake: Box<dyn Intake>,
    pub transfer: Box<dyn Transfer>,
    pub elevator: Box<dyn Elevator>,
    pub shooter: Box<dyn Shooter>,
    pub climber: Box<dyn Climber>,
    pub leds: Box<dyn Leds>,
    pub operator: Box<dyn OperatorFeedback>,
}

impl Subsystems {
    /// Zeroing surface of a mechanism.
    pub fn zeroable_mut(&mut self, mechanism: Mechanism) -> &mut dyn Zeroable {
        match mechanism {
            Mechanism::Elevator => self.elevator.as_zeroable_mut(),
            Mechanism::ShooterPivot => self.shooter.as_zeroable_mut(),
        }
    }

    /// Actuation phase: let every proxy push its outputs for this cycle.
    pub fn periodic(&mut self, dt: Duration) {
        self.drivetrain.periodic(dt);
        self.intake.periodic(dt);
        self.transfer.periodic(dt);
        self.elevator.periodic(dt);
        self.shooter.periodic(dt);
        self.climber.periodic(dt);
    }

    /// Neutral outputs for a disabled robot. Setpoints are retained by the
    /// state machine and reissued on the next transition.
    pub fn neutralize(&mut self) {
        self.drivetrain.drive(0.0, 0.0, 0.0, true);
        self.intake.set_roller_speed(0.0);
        self.transfer.set_feeder_speed(0.0);
        self.climber.set_speed(0.0);
        self.operator.set_rumble(talon_common::feedback::RumbleSide::Both, 0.0);
    }
}
