//! Maneuver compositions built from tasks.

pub mod auto;
pub mod intake;
pub mod readiness;
pub mod shoot;
pub mod zero;

pub use auto::{AutoRegistry, AutoRoutine};
pub use intake::{eject, intake_source, intaking, release_intake_source};
pub use shoot::{ShootOptions, aim_at, shoot};
pub use zero::{ZeroMechanism, zero_subsystems};
