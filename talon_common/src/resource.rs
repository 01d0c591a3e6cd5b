//! Subsystem resource sets.
//!
//! Every running task declares the set of subsystem proxies it requires. Two
//! tasks whose sets intersect never run concurrently; the orchestrator
//! arbitrates per flag.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Set of exclusively-owned subsystem proxies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Resources: u8 {
        const DRIVETRAIN    = 0x01;
        const INTAKE        = 0x02;
        const TRANSFER      = 0x04;
        const ELEVATOR      = 0x08;
        const SHOOTER       = 0x10;
        const CLIMBER       = 0x20;
        const LEDS          = 0x40;
        /// The mode state machine itself (held by maneuvers that must not be
        /// interleaved with other state-driving maneuvers).
        const STATE_MACHINE = 0x80;
    }
}

/// Number of distinct resource flags.
pub const RESOURCE_COUNT: usize = 8;

const_assert_eq!(Resources::all().bits().count_ones() as usize, RESOURCE_COUNT);

impl Resources {
    /// Index of a single-flag set into per-resource tables.
    ///
    /// Returns `None` unless exactly one flag is set.
    #[inline]
    pub const fn slot(&self) -> Option<usize> {
        if self.bits().count_ones() == 1 {
            Some(self.bits().trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Iterate the single-flag members of this set.
    pub fn flags(self) -> impl Iterator<Item = Resources> {
        (0..RESOURCE_COUNT)
            .map(|i| Resources::from_bits_truncate(1 << i))
            .filter(move |f| self.contains(*f))
    }
}
