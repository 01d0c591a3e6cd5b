//! # Talon Control
//!
//! Control core of a competition robot: a mode state machine holding the
//! single authoritative `RobotState`, a cooperative task orchestrator with
//! per-resource exclusivity, a reactive trigger layer, and the maneuvers
//! and autonomous routines composed from them. Everything runs on one
//! thread at a fixed cycle period.
//!
//! ## Cycle Order
//!
//! 1. Clock advance and input sampling
//! 2. Trigger evaluation ([`trigger`])
//! 3. Orchestrator step ([`orchestrator`])
//! 4. State-machine step ([`state`])
//! 5. Actuation dispatch ([`subsystem`])
//!
//! Subsystems are reached only through their proxy traits; the bundled
//! simulation proxies back the tests, the benchmark and the binary.

pub mod bindings;
pub mod config;
pub mod cycle;
pub mod maneuver;
pub mod orchestrator;
pub mod robot;
pub mod state;
pub mod subsystem;
pub mod task;
pub mod telemetry;
pub mod trigger;

#[cfg(test)]
mod testing;
