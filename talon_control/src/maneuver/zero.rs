//! Zeroing maneuvers.
//!
//! A failed or timed-out attempt leaves the mechanism `NotZeroed`, shown on
//! the indicator lights; the robot keeps running.

use talon_common::resource::Resources;
use talon_common::state::{Mechanism, ZeroStatus};
use tracing::{info, warn};

use crate::config::{ZeroingConfig, ZeroingSettings};
use crate::robot::Robot;
use crate::state::{ZeroTickResult, ZeroingSupervisor};
use crate::task::{
    BoxedTask, EndReason, InterruptPolicy, Parallel, Task, TaskExt, TaskStatus,
};

/// Drives one mechanism into its hard stop and zeroes its sensor.
pub struct ZeroMechanism {
    mechanism: Mechanism,
    supervisor: ZeroingSupervisor,
    start_failed: bool,
}

impl ZeroMechanism {
    pub fn new(mechanism: Mechanism, config: &ZeroingConfig) -> Self {
        Self {
            mechanism,
            supervisor: ZeroingSupervisor::new(config),
            start_failed: false,
        }
    }
}

impl Task for ZeroMechanism {
    fn name(&self) -> &str {
        match self.mechanism {
            Mechanism::Elevator => "ZeroElevator",
            Mechanism::ShooterPivot => "ZeroShooterPivot",
        }
    }

    fn requirements(&self) -> Resources {
        match self.mechanism {
            Mechanism::Elevator => Resources::ELEVATOR,
            Mechanism::ShooterPivot => Resources::SHOOTER,
        }
    }

    fn interrupt_policy(&self) -> InterruptPolicy {
        InterruptPolicy::CancelIncoming
    }

    fn start(&mut self, robot: &mut Robot) {
        robot.zeroing.set(self.mechanism, ZeroStatus::Attempting);
        let started = self.supervisor.start();
        self.start_failed = matches!(started, ZeroTickResult::Failed { .. });

        let zeroable = robot.subsystems.zeroable_mut(self.mechanism);
        zeroable.set_soft_limits(false, false);
        if !self.start_failed {
            zeroable.set_open_loop_voltage(Some(self.supervisor.voltage()));
        }
    }

    fn tick(&mut self, robot: &mut Robot) -> TaskStatus {
        if self.start_failed {
            warn!(mechanism = ?self.mechanism, "zeroing could not start");
            return TaskStatus::Cancelled;
        }

        let zeroable = robot.subsystems.zeroable_mut(self.mechanism);
        match self
            .supervisor
            .tick(zeroable.stator_current(), zeroable.velocity())
        {
            ZeroTickResult::InProgress => TaskStatus::Running,
            ZeroTickResult::Success => {
                zeroable.reset_position(0.0);
                robot.zeroing.set(self.mechanism, ZeroStatus::Zeroed);
                info!(mechanism = ?self.mechanism, "mechanism zeroed");
                TaskStatus::Done
            }
            ZeroTickResult::Failed { reason } => {
                warn!(mechanism = ?self.mechanism, ?reason, "zeroing failed");
                TaskStatus::Cancelled
            }
        }
    }

    fn end(&mut self, robot: &mut Robot, reason: EndReason) {
        let zeroable = robot.subsystems.zeroable_mut(self.mechanism);
        zeroable.set_open_loop_voltage(None);
        zeroable.set_soft_limits(true, true);
        self.supervisor.reset();

        if robot.zeroing.status(self.mechanism) != ZeroStatus::Zeroed {
            robot.zeroing.set(self.mechanism, ZeroStatus::NotZeroed);
            warn!(mechanism = ?self.mechanism, ?reason, "mechanism left unzeroed");
        }
    }
}

/// Zero the elevator and shooter pivot together, each under its own
/// timeout. Not interruptible by incoming tasks.
pub fn zero_subsystems(settings: &ZeroingSettings) -> BoxedTask {
    Parallel::all(vec![
        ZeroMechanism::new(Mechanism::Elevator, &settings.elevator)
            .with_timeout(settings.elevator.timeout())
            .boxed(),
        ZeroMechanism::new(Mechanism::ShooterPivot, &settings.shooter_pivot)
            .with_timeout(settings.shooter_pivot.timeout())
            .boxed(),
    ])
    .with_interrupt_policy(InterruptPolicy::CancelIncoming)
    .requiring(Resources::STATE_MACHINE)
    .named("ZeroSubsystems")
    .boxed()
}

// ─── Tests ──────────────────────────────────────────────────────────
