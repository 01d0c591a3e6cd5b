//! Operating-mode enums shared by the control core.
//!
//! All enums use `#[repr(u8)]` for a compact layout and a stable numeric
//! encoding in telemetry. `RobotState` is the single authoritative mode owned
//! by the mode state machine; `TargetState` is the upstream intent the machine
//! converges toward.

use serde::{Deserialize, Serialize};
use static_assertions::assert_eq_size;

// ─── Robot State ────────────────────────────────────────────────────

/// Mutually exclusive robot operating mode.
///
/// Exactly one value is current at any instant. Mutated only by the mode
/// state machine's transition routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum RobotState {
    /// Everything idle, flywheels at rest speed.
    #[default]
    None = 0,
    /// Ground intake running toward the transfer.
    Intaking = 1,
    /// Intaking through the shooter from the human-player source.
    IntakeSource = 2,
    /// Game piece held in the transfer, mechanisms stowed.
    StoreFeeder = 3,
    /// Spinning up and aiming using the drivetrain distance to the speaker.
    PrepVision = 4,
    /// Spinning up for a lob across the field.
    PrepShuffle = 5,
    /// Spinning up for a fixed close-range speaker shot.
    PrepSpeaker = 6,
    /// Feeding the stored piece into the flywheels.
    Shooting = 7,
    /// Reversing rollers to spit a piece out.
    Ejecting = 8,
}

assert_eq_size!(RobotState, u8);

impl RobotState {
    /// Every state, in discriminant order.
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::Intaking,
        Self::IntakeSource,
        Self::StoreFeeder,
        Self::PrepVision,
        Self::PrepShuffle,
        Self::PrepSpeaker,
        Self::Shooting,
        Self::Ejecting,
    ];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Intaking),
            2 => Some(Self::IntakeSource),
            3 => Some(Self::StoreFeeder),
            4 => Some(Self::PrepVision),
            5 => Some(Self::PrepShuffle),
            6 => Some(Self::PrepSpeaker),
            7 => Some(Self::Shooting),
            8 => Some(Self::Ejecting),
            _ => None,
        }
    }

    /// Returns true for the shot-preparation states that may lead to `Shooting`.
    #[inline]
    pub const fn is_prep(&self) -> bool {
        matches!(self, Self::PrepVision | Self::PrepShuffle | Self::PrepSpeaker)
    }
}

// ─── Target State ───────────────────────────────────────────────────

/// Desired end-mode set by upstream logic (driver input, autonomous script).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TargetState {
    /// No particular intent; converge to `RobotState::None`.
    #[default]
    None = 0,
    /// Prepare a vision-aimed speaker shot.
    PrepVision = 1,
    /// Prepare a shuffle lob.
    PrepShuffle = 2,
    /// Prepare a fixed speaker shot.
    PrepSpeaker = 3,
}

assert_eq_size!(TargetState, u8);

impl TargetState {
    /// Every target, in discriminant order.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::PrepVision,
        Self::PrepShuffle,
        Self::PrepSpeaker,
    ];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::PrepVision),
            2 => Some(Self::PrepShuffle),
            3 => Some(Self::PrepSpeaker),
            _ => None,
        }
    }

    /// Deterministic mapping from intent to the concrete robot state.
    #[inline]
    pub const fn robot_state(&self) -> RobotState {
        match self {
            Self::None => RobotState::None,
            Self::PrepVision => RobotState::PrepVision,
            Self::PrepShuffle => RobotState::PrepShuffle,
            Self::PrepSpeaker => RobotState::PrepSpeaker,
        }
    }
}

// ─── Robot Mode ─────────────────────────────────────────────────────

/// Match phase reported by the field / driver station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum RobotMode {
    /// Outputs disabled; only tasks marked as ignoring disable may run.
    #[default]
    Disabled = 0,
    /// Autonomous period.
    Autonomous = 1,
    /// Operator-controlled period.
    Teleop = 2,
    /// Pit test mode.
    Test = 3,
}

impl RobotMode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disabled),
            1 => Some(Self::Autonomous),
            2 => Some(Self::Teleop),
            3 => Some(Self::Test),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

// ─── Zeroing ────────────────────────────────────────────────────────

/// Mechanism whose position sensor must be zeroed against a hard stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mechanism {
    Elevator = 0,
    ShooterPivot = 1,
}

impl Mechanism {
    pub const ALL: [Self; 2] = [Self::Elevator, Self::ShooterPivot];

    /// Index into per-mechanism arrays.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Zeroing status of a mechanism.
///
/// `NotZeroed` after a failed or timed-out attempt is a degraded, non-fatal
/// status surfaced through the indicator lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ZeroStatus {
    #[default]
    NotZeroed = 0,
    Attempting = 1,
    Zeroed = 2,
}

// ─── Tests ──────────────────────────────────────────────────────────
