use std::io;

use crate::sequencer::Phase;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid clock frequency: {0} Hz")]
    InvalidFrequency(f64),
    #[error("invalid {phase} pulse width: {seconds} s")]
    InvalidPulseWidth { phase: Phase, seconds: f64 },
    #[error("{phase} phase resolves to {exact} cycles (expected 1..={max})", max = u32::MAX)]
    InvalidTiming { phase: Phase, exact: f64 },
    #[error("frame must contain at least one bit")]
    ZeroBits,
    #[error("period of {0} cycles cannot be counted")]
    InvalidPeriod(f64),
    #[error("sequencer is busy (bit {bit_index} of {bits_per_frame})")]
    Busy { bit_index: u32, bits_per_frame: u32 },
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns `true` for errors raised while resolving a timing configuration.
    pub fn is_invalid_timing(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrequency(_)
                | Self::InvalidPulseWidth { .. }
                | Self::InvalidTiming { .. }
                | Self::ZeroBits
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
