//! Hard-stop zeroing supervision.
//!
//! The mechanism is driven open loop into its hard stop. The stop is accepted
//! once the stator current stays at or above the configured threshold for
//! `confirm_cycles` consecutive cycles. The overall time budget is enforced
//! by the task wrapping the supervisor, not here.
//!
//! | Phase    | Exit condition                                   |
//! |----------|--------------------------------------------------|
//! | Idle     | `start()`                                        |
//! | Seeking  | current ≥ threshold for N cycles → Complete      |
//! | Seeking  | moving away from the stop → Failed               |

use crate::config::ZeroingConfig;

// ─── Phases ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroingPhase {
    Idle,
    /// Driving toward the hard stop.
    Seeking,
    Complete,
    Failed,
}

/// Result of one supervisor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroTickResult {
    InProgress,
    /// Hard stop confirmed; the caller resets the sensor position.
    Success,
    Failed { reason: ZeroFailReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroFailReason {
    /// Configured approach voltage is zero.
    NoApproachVoltage,
    /// Mechanism moved away from the stop faster than allowed.
    WrongDirection,
    /// Ticked without a successful `start()`.
    NotStarted,
}

// ─── Supervisor ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ZeroingSupervisor {
    phase: ZeroingPhase,
    voltage: f64,
    current_threshold: f64,
    confirm_cycles: u32,
    reverse_velocity_limit: f64,
    above_threshold: u32,
}

impl ZeroingSupervisor {
    pub fn new(config: &ZeroingConfig) -> Self {
        Self {
            phase: ZeroingPhase::Idle,
            voltage: config.voltage,
            current_threshold: config.current_threshold,
            confirm_cycles: config.confirm_cycles.max(1),
            reverse_velocity_limit: config.reverse_velocity_limit.abs(),
            above_threshold: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> ZeroingPhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == ZeroingPhase::Seeking
    }

    /// Approach voltage to apply while seeking [V].
    #[inline]
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Begin seeking. Fails immediately without an approach voltage.
    pub fn start(&mut self) -> ZeroTickResult {
        self.above_threshold = 0;
        if self.voltage.abs() < f64::EPSILON {
            self.phase = ZeroingPhase::Failed;
            return ZeroTickResult::Failed {
                reason: ZeroFailReason::NoApproachVoltage,
            };
        }
        self.phase = ZeroingPhase::Seeking;
        ZeroTickResult::InProgress
    }

    /// Evaluate one cycle of sensor data.
    pub fn tick(&mut self, stator_current: f64, velocity: f64) -> ZeroTickResult {
        match self.phase {
            ZeroingPhase::Complete => ZeroTickResult::Success,
            ZeroingPhase::Failed => ZeroTickResult::Failed {
                reason: ZeroFailReason::WrongDirection,
            },
            ZeroingPhase::Idle => ZeroTickResult::Failed {
                reason: ZeroFailReason::NotStarted,
            },
            ZeroingPhase::Seeking => {
                // Velocity along the approach direction should be >= 0.
                let approach_velocity = velocity * self.voltage.signum();
                if approach_velocity < -self.reverse_velocity_limit {
                    self.phase = ZeroingPhase::Failed;
                    return ZeroTickResult::Failed {
                        reason: ZeroFailReason::WrongDirection,
                    };
                }

                if stator_current.abs() >= self.current_threshold {
                    self.above_threshold += 1;
                    if self.above_threshold >= self.confirm_cycles {
                        self.phase = ZeroingPhase::Complete;
                        return ZeroTickResult::Success;
                    }
                } else {
                    self.above_threshold = 0;
                }
                ZeroTickResult::InProgress
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = ZeroingPhase::Idle;
        self.above_threshold = 0;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
