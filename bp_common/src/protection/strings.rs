//! Parallel battery string status and control-word bits.

use bitflags::bitflags;

use super::snapshot::{ProtectionLimits, StartStop};

bitflags! {
    /// Running-string bits of the external converter control word.
    ///
    /// One fixed bit per string, every third bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StringControlMode: u8 {
        /// String A (2^0).
        const STRING_A = 0x01;
        /// String B (2^3).
        const STRING_B = 0x08;
        /// String C (2^6).
        const STRING_C = 0x40;
    }
}

impl StringControlMode {
    /// Bit for the string at `index` (0 = A).
    pub const fn for_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::STRING_A),
            1 => Some(Self::STRING_B),
            2 => Some(Self::STRING_C),
            _ => None,
        }
    }
}

/// What the weighting needs to know about one battery string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringStatus {
    /// Battery reports it is running.
    pub running: bool,
    /// Battery state is undefined (e.g. still starting up).
    pub undefined: bool,
    /// Present string voltage [V].
    pub voltage: f64,
    /// Published charge limit [A].
    pub charge_max_current: i32,
    /// Published discharge limit [A].
    pub discharge_max_current: i32,
}

impl StringStatus {
    /// Build from a start/stop status and the engine's published limits.
    pub fn new(start_stop: StartStop, voltage: f64, limits: ProtectionLimits) -> Self {
        Self {
            running: start_stop == StartStop::Start,
            undefined: start_stop == StartStop::Undefined,
            voltage,
            charge_max_current: limits.charge_max_current,
            discharge_max_current: limits.discharge_max_current,
        }
    }

    /// Running and not undefined.
    #[inline]
    pub const fn is_ready(&self) -> bool {
        self.running && !self.undefined
    }
}
