//! Robot context handed to every task, trigger and maneuver.
//!
//! Everything a cycle mutates lives here: the subsystem proxies, the mode
//! state machine, the zero registry and the cycle clock. Tasks receive
//! `&mut Robot` for the duration of a single call and keep no references.

use std::time::Duration;

use talon_common::state::{Mechanism, RobotMode, RobotState, TargetState, ZeroStatus};
use tracing::info;

use crate::config::{FeedbackConfig, RobotConfig};
use crate::state::{ModeStateMachine, TransitionResult};
use crate::subsystem::Subsystems;

// ─── Cycle Clock ────────────────────────────────────────────────────

/// Cycle-relative time. Advanced exactly once per cycle by the runner, so
/// timeouts are deterministic in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleClock {
    cycle: u64,
    now: Duration,
    period: Duration,
}

impl CycleClock {
    pub const fn new(period: Duration) -> Self {
        Self {
            cycle: 0,
            now: Duration::ZERO,
            period,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.cycle += 1;
        self.now += self.period;
    }

    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub const fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

// ─── Zero Registry ──────────────────────────────────────────────────

/// Zero status per mechanism.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroRegistry {
    status: [ZeroStatus; Mechanism::ALL.len()],
}

impl ZeroRegistry {
    #[inline]
    pub fn status(&self, mechanism: Mechanism) -> ZeroStatus {
        self.status[mechanism.index()]
    }

    pub fn set(&mut self, mechanism: Mechanism, status: ZeroStatus) {
        let slot = &mut self.status[mechanism.index()];
        if *slot != status {
            info!(?mechanism, from = ?*slot, to = ?status, "zero status changed");
            *slot = status;
        }
    }

    pub fn all_zeroed(&self) -> bool {
        self.status.iter().all(|s| *s == ZeroStatus::Zeroed)
    }
}

// ─── Robot ──────────────────────────────────────────────────────────

pub struct Robot {
    pub subsystems: Subsystems,
    pub modes: ModeStateMachine,
    pub zeroing: ZeroRegistry,
    pub clock: CycleClock,
    mode: RobotMode,
}

impl Robot {
    pub fn new(subsystems: Subsystems, config: &RobotConfig) -> Self {
        Self {
            subsystems,
            modes: ModeStateMachine::new(config.setpoints.clone(), config.shooter.clone()),
            zeroing: ZeroRegistry::default(),
            clock: CycleClock::new(config.cycle.period()),
            mode: RobotMode::Disabled,
        }
    }

    /// Cycle-relative time of the current cycle.
    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[inline]
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mode.is_enabled()
    }

    pub(crate) fn set_mode(&mut self, mode: RobotMode) {
        self.mode = mode;
    }

    // ─── State Machine Surface ──────────────────────────────────────

    #[inline]
    pub fn robot_state(&self) -> RobotState {
        self.modes.robot_state()
    }

    #[inline]
    pub fn target_state(&self) -> TargetState {
        self.modes.target_state()
    }

    pub fn try_state(&mut self, requested: RobotState) -> TransitionResult {
        self.modes.try_state(requested, &mut self.subsystems)
    }

    pub fn set_target_state(&mut self, target: TargetState) {
        self.modes.set_target_state(target);
    }

    pub fn try_target_state(&mut self) -> TransitionResult {
        self.modes.try_target_state(&mut self.subsystems)
    }

    #[inline]
    pub fn is_game_piece_stored(&self) -> bool {
        self.subsystems.transfer.is_game_piece_stored()
    }

    // ─── Indicators ─────────────────────────────────────────────────

    /// Paint each mechanism's zero status onto its strip segments.
    pub fn show_zero_status(&mut self, feedback: &FeedbackConfig) {
        let elevator = match self.zeroing.status(Mechanism::Elevator) {
            ZeroStatus::Zeroed => feedback.elevator_zeroed,
            ZeroStatus::Attempting => feedback.elevator_attempting_zero,
            ZeroStatus::NotZeroed => feedback.elevator_not_zeroed,
        };
        let shooter = match self.zeroing.status(Mechanism::ShooterPivot) {
            ZeroStatus::Zeroed => feedback.shooter_zeroed,
            ZeroStatus::Attempting => feedback.shooter_attempting_zero,
            ZeroStatus::NotZeroed => feedback.shooter_not_zeroed,
        };
        let leds = &mut self.subsystems.leds;
        for [start, len] in &feedback.elevator_segments {
            leds.set_segment(elevator, *start, *len);
        }
        for [start, len] in &feedback.shooter_segments {
            leds.set_segment(shooter, *start, *len);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
