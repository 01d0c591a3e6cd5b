//! Integration tests for the Talon control core.
//!
//! These exercise several modules together through the public API: the
//! state machine behind tasks, maneuvers on the scheduler, triggers inside
//! the cycle runner, and configuration loading from disk.

mod integration;
