//! Talon Common Library
//!
//! Shared types for the Talon robot control core: the operating-mode enums
//! owned by the mode state machine, subsystem resource sets used by the task
//! orchestrator for mutual exclusion, indicator/feedback value types, and the
//! TOML configuration loading layer.
//!
//! # Module Structure
//!
//! - [`state`] - `RobotState`, `TargetState`, `RobotMode`, zeroing status
//! - [`resource`] - `Resources` bitflags (one flag per subsystem proxy)
//! - [`feedback`] - Indicator colours, LED animations, rumble sides
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - System-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use talon_common::prelude::*;
//!
//! assert_eq!(TargetState::PrepVision.robot_state(), RobotState::PrepVision);
//! ```

pub mod config;
pub mod consts;
pub mod feedback;
pub mod prelude;
pub mod resource;
pub mod state;
