//! Prelude module for common re-exports.
//!
//! ```rust
//! use talon_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::CYCLE_PERIOD_MS;

// ─── States & Resources ─────────────────────────────────────────────
pub use crate::feedback::{LedAnimation, Rgb, RumbleSide};
pub use crate::resource::Resources;
pub use crate::state::{Mechanism, RobotMode, RobotState, TargetState, ZeroStatus};

/// Default control cycle period as Duration.
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(CYCLE_PERIOD_MS);
