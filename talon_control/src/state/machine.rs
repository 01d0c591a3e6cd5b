//! Mode state machine: the single authoritative `RobotState`.
//!
//! `current` changes only through [`ModeStateMachine::try_state`], which
//! evaluates the requested state's precondition against live proxy reads and,
//! when it holds, issues that state's setpoints in the same call. `target` is
//! upstream intent and never moves `current` on its own.

use talon_common::state::{RobotState, TargetState};
use tracing::{debug, info};

use crate::config::{ShooterConfig, StateSetpoints};
use crate::state::transition;
use crate::subsystem::Subsystems;

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition applied; setpoints issued.
    Applied(RobotState),
    /// Requested state is already current; nothing reissued.
    AlreadyActive,
    /// Precondition not met; state unchanged.
    Rejected(&'static str),
}

impl TransitionResult {
    /// The requested state is current after the call.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Owner of `current` and `target`.
#[derive(Debug, Clone)]
pub struct ModeStateMachine {
    current: RobotState,
    target: TargetState,
    setpoints: StateSetpoints,
    shooter: ShooterConfig,
    transitions: u64,
    rejections: u64,
}

impl ModeStateMachine {
    /// Start in `NONE` with target `NONE`.
    pub fn new(setpoints: StateSetpoints, shooter: ShooterConfig) -> Self {
        Self {
            current: RobotState::None,
            target: TargetState::None,
            setpoints,
            shooter,
            transitions: 0,
            rejections: 0,
        }
    }

    #[inline]
    pub const fn robot_state(&self) -> RobotState {
        self.current
    }

    #[inline]
    pub const fn target_state(&self) -> TargetState {
        self.target
    }

    /// `current` equals the robot state the target maps to.
    #[inline]
    pub fn is_current_state_target_state(&self) -> bool {
        self.current == self.target.robot_state()
    }

    /// Applied transitions since startup.
    #[inline]
    pub const fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Rejected transition requests since startup.
    #[inline]
    pub const fn rejection_count(&self) -> u64 {
        self.rejections
    }

    /// Record upstream intent. Does not move `current`.
    pub fn set_target_state(&mut self, target: TargetState) {
        if target != self.target {
            debug!(from = ?self.target, to = ?target, "target state changed");
            self.target = target;
        }
    }

    /// Attempt to enter `requested`.
    pub fn try_state(
        &mut self,
        requested: RobotState,
        subsystems: &mut Subsystems,
    ) -> TransitionResult {
        if requested == self.current {
            return TransitionResult::AlreadyActive;
        }

        if let Err(reason) = transition::precondition(self.current, requested, subsystems) {
            self.rejections += 1;
            debug!(from = ?self.current, to = ?requested, reason, "transition rejected");
            return TransitionResult::Rejected(reason);
        }

        transition::apply(requested, subsystems, &self.setpoints, &self.shooter);
        info!(from = ?self.current, to = ?requested, "robot state transition");
        self.current = requested;
        self.transitions += 1;
        TransitionResult::Applied(requested)
    }

    /// Attempt to enter the state the current target maps to.
    pub fn try_target_state(&mut self, subsystems: &mut Subsystems) -> TransitionResult {
        self.try_state(self.target.robot_state(), subsystems)
    }

    /// Per-cycle step: refresh setpoints that track live sensor data.
    ///
    /// Only `PREP_VISION` has such a setpoint (the pivot follows the speaker
    /// distance while the drivetrain moves).
    pub fn periodic(&mut self, subsystems: &mut Subsystems) {
        if self.current == RobotState::PrepVision {
            let aim = transition::vision_setpoint(subsystems, &self.setpoints, &self.shooter);
            if subsystems.shooter.setpoint() != aim {
                subsystems.shooter.set_setpoint(aim);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
