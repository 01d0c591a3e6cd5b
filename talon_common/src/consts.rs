//! System-wide constants for the Talon workspace.
//!
//! Single source of truth for timing defaults and numeric limits.

/// Default control cycle period in milliseconds (50 Hz).
pub const CYCLE_PERIOD_MS: u64 = 20;

/// Smallest accepted control cycle period [ms].
pub const CYCLE_PERIOD_MS_MIN: u64 = 1;

/// Largest accepted control cycle period [ms].
pub const CYCLE_PERIOD_MS_MAX: u64 = 100;

/// Number of indicator animation slots on the LED controller.
pub const LED_ANIMATION_SLOTS: usize = 2;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/robot.toml";
