//! Mode state machine and zeroing supervision.
//!
//! `machine` owns the single authoritative `RobotState`, `transition` holds
//! the per-state preconditions and setpoints, `zeroing` detects hard stops.

pub mod machine;
pub mod transition;
pub mod zeroing;

pub use machine::{ModeStateMachine, TransitionResult};
pub use zeroing::{ZeroFailReason, ZeroTickResult, ZeroingPhase, ZeroingSupervisor};
