//! Shared plumbing for simulated subsystem proxies.
//!
//! A simulated proxy is a [`SimHandle`] around a plain model struct. The
//! robot owns one clone of each handle (boxed behind the subsystem trait) and
//! tests keep another to read outputs and inject sensor values.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use crate::config::RobotConfig;
use crate::subsystem::Subsystems;
use crate::subsystem::climber::ClimberModel;
use crate::subsystem::drivetrain::DrivetrainModel;
use crate::subsystem::elevator::ElevatorModel;
use crate::subsystem::intake::IntakeModel;
use crate::subsystem::leds::LedsModel;
use crate::subsystem::operator::OperatorModel;
use crate::subsystem::shooter::ShooterModel;
use crate::subsystem::transfer::TransferModel;

// ─── Handle ─────────────────────────────────────────────────────────

/// Shared, single-threaded handle to a simulation model.
#[derive(Debug, Default)]
pub struct SimHandle<M>(Rc<RefCell<M>>);

impl<M> Clone for SimHandle<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M> SimHandle<M> {
    pub fn new(model: M) -> Self {
        Self(Rc::new(RefCell::new(model)))
    }

    /// Read access. Panics if a mutable borrow is alive.
    pub fn model(&self) -> Ref<'_, M> {
        self.0.borrow()
    }

    /// Write access for tests that inject sensor values.
    pub fn model_mut(&self) -> RefMut<'_, M> {
        self.0.borrow_mut()
    }
}

// ─── Hard-Stop Joint ────────────────────────────────────────────────

/// One-axis joint with a hard stop at physical position 0 and a relative
/// encoder carrying an unknown offset until zeroed.
#[derive(Debug, Clone)]
pub struct SimJoint {
    /// Physical position above the hard stop.
    pub physical: f64,
    /// Sensor offset: `reading = physical - offset`.
    pub offset: f64,
    /// Closed-loop setpoint in sensor units.
    pub setpoint: f64,
    /// Open-loop voltage, when driving open loop.
    pub voltage: Option<f64>,
    pub velocity: f64,
    pub current: f64,
    /// Closed-loop travel rate [units/s].
    pub max_speed: f64,
    /// Open-loop speed per volt [units/s/V].
    pub speed_per_volt: f64,
    /// Stall current per volt at the hard stop [A/V].
    pub stall_amps_per_volt: f64,
    pub soft_limits: (bool, bool),
}

impl SimJoint {
    pub fn new(physical: f64, offset: f64, max_speed: f64) -> Self {
        Self {
            physical,
            offset,
            setpoint: physical - offset,
            voltage: None,
            velocity: 0.0,
            current: 0.0,
            max_speed,
            speed_per_volt: max_speed / 4.0,
            stall_amps_per_volt: 25.0,
            soft_limits: (true, true),
        }
    }

    #[inline]
    pub fn reading(&self) -> f64 {
        self.physical - self.offset
    }

    pub fn step(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        match self.voltage {
            Some(volts) => {
                self.velocity = volts * self.speed_per_volt;
                let next = self.physical + self.velocity * dt;
                if next <= 0.0 && self.velocity < 0.0 {
                    self.physical = 0.0;
                    self.velocity = 0.0;
                    self.current = volts.abs() * self.stall_amps_per_volt;
                } else {
                    self.physical = next;
                    self.current = volts.abs() * 2.0;
                }
            }
            None => {
                let error = self.setpoint - self.reading();
                let travel = error.clamp(-self.max_speed * dt, self.max_speed * dt);
                self.physical = (self.physical + travel).max(0.0);
                self.velocity = if dt > 0.0 { travel / dt } else { 0.0 };
                self.current = 0.0;
            }
        }
    }
}

// ─── Rig ────────────────────────────────────────────────────────────

/// Every simulated proxy, with test-side handles.
#[derive(Debug, Clone)]
pub struct SimRig {
    pub drivetrain: SimHandle<DrivetrainModel>,
    pub intake: SimHandle<IntakeModel>,
    pub transfer: SimHandle<TransferModel>,
    pub elevator: SimHandle<ElevatorModel>,
    pub shooter: SimHandle<ShooterModel>,
    pub climber: SimHandle<ClimberModel>,
    pub leds: SimHandle<LedsModel>,
    pub operator: SimHandle<OperatorModel>,
}

impl SimRig {
    /// Build a rig whose tolerances and field geometry follow `config`.
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            drivetrain: SimHandle::new(DrivetrainModel::new(&config.drivetrain)),
            intake: SimHandle::default(),
            transfer: SimHandle::default(),
            elevator: SimHandle::new(ElevatorModel::default()),
            shooter: SimHandle::new(ShooterModel::new(&config.shooter)),
            climber: SimHandle::default(),
            leds: SimHandle::default(),
            operator: SimHandle::default(),
        }
    }

    /// Boxed proxies for the robot; the rig keeps its own handles.
    pub fn subsystems(&self) -> Subsystems {
        Subsystems {
            drivetrain: Box::new(self.drivetrain.clone()),
            intake: Box::new(self.intake.clone()),
            transfer: Box::new(self.transfer.clone()),
            elevator: Box::new(self.elevator.clone()),
            shooter: Box::new(self.shooter.clone()),
            climber: Box::new(self.climber.clone()),
            leds: Box::new(self.leds.clone()),
            operator: Box::new(self.operator.clone()),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
