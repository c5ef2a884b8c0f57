//! Translation of real-time pulse widths into clock-cycle counts.
//!
//! A one-wire LED protocol specifies how long the line stays HIGH and LOW
//! for every bit. The same protocol logic has to run on clocks of unrelated
//! frequencies, so the widths are kept in seconds ([`Protocol`]) and turned
//! into cycle counts ([`TimingSpec`]) once, when the clock is known.
//!
//! Cycle counts are truncated toward zero, as an integer conversion of
//! `seconds * hertz` would.

use std::fmt::{self, Display};

use tracing::debug;

use crate::{domain::ClockDomain, error::Error, sequencer::Phase};

/// Resolved cycle counts of one pulse and the frame length.
///
/// Every count is at least 1. The only ways to get a value are [`resolve`]
/// and [`TimingSpec::from_cycles`], both of which check that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingSpec {
    high_cycles: u32,
    low_cycles: u32,
    bits_per_frame: u32,
}

impl Display for TimingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "high = {} cycles, low = {} cycles, {} bits per frame",
            self.high_cycles, self.low_cycles, self.bits_per_frame
        )
    }
}

impl TimingSpec {
    /// Fixed cycle counts, e.g. hand-tuned for a single known clock.
    pub fn from_cycles(
        high_cycles: u32,
        low_cycles: u32,
        bits_per_frame: u32,
    ) -> Result<Self, Error> {
        if bits_per_frame == 0 {
            return Err(Error::ZeroBits);
        }
        for (phase, cycles) in [(Phase::High, high_cycles), (Phase::Low, low_cycles)] {
            if cycles == 0 {
                return Err(Error::InvalidTiming { phase, exact: 0.0 });
            }
        }

        Ok(Self {
            high_cycles,
            low_cycles,
            bits_per_frame,
        })
    }

    #[inline]
    pub fn high_cycles(&self) -> u32 {
        self.high_cycles
    }

    #[inline]
    pub fn low_cycles(&self) -> u32 {
        self.low_cycles
    }

    #[inline]
    pub fn bits_per_frame(&self) -> u32 {
        self.bits_per_frame
    }

    #[inline]
    pub fn phase_cycles(&self, phase: Phase) -> u32 {
        match phase {
            Phase::High => self.high_cycles,
            Phase::Low => self.low_cycles,
        }
    }

    /// Length of one bit window in cycles.
    #[inline]
    pub fn bit_cycles(&self) -> u64 {
        self.high_cycles as u64 + self.low_cycles as u64
    }

    /// Length of a whole frame in cycles.
    #[inline]
    pub fn frame_cycles(&self) -> u64 {
        self.bits_per_frame as u64 * self.bit_cycles()
    }
}

fn phase_cycles(phase: Phase, seconds: f64, freq_hz: f64) -> Result<u32, Error> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(Error::InvalidPulseWidth { phase, seconds });
    }

    let exact = seconds * freq_hz;
    let cycles = exact.floor();
    if cycles < 1.0 || cycles > u32::MAX as f64 {
        return Err(Error::InvalidTiming { phase, exact });
    }

    Ok(cycles as u32)
}

/// Computes cycle counts of the HIGH and LOW phases at `sys_clk_freq_hz`.
///
/// Fails if the clock is too slow to represent either pulse width (the count
/// truncates to 0) or if the frame has no bits.
pub fn resolve(
    sys_clk_freq_hz: f64,
    t_high_seconds: f64,
    t_low_seconds: f64,
    bits_per_frame: u32,
) -> Result<TimingSpec, Error> {
    if !(sys_clk_freq_hz.is_finite() && sys_clk_freq_hz > 0.0) {
        return Err(Error::InvalidFrequency(sys_clk_freq_hz));
    }
    if bits_per_frame == 0 {
        return Err(Error::ZeroBits);
    }

    let timing = TimingSpec {
        high_cycles: phase_cycles(Phase::High, t_high_seconds, sys_clk_freq_hz)?,
        low_cycles: phase_cycles(Phase::Low, t_low_seconds, sys_clk_freq_hz)?,
        bits_per_frame,
    };
    debug!("resolve: freq = {sys_clk_freq_hz} Hz, {timing}");

    Ok(timing)
}

/// Real-time pulse contract of a one-wire LED device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Protocol {
    /// HIGH phase width in seconds
    pub t_high: f64,
    /// LOW phase width in seconds
    pub t_low: f64,
    pub bits_per_frame: u32,
}

impl Default for Protocol {
    fn default() -> Self {
        Self::WS2812
    }
}

impl Protocol {
    /// One 24-bit GRB command with the T1H/T1L widths of a WS2812 ring.
    pub const WS2812: Self = Self {
        t_high: 0.80e-6,
        t_low: 0.45e-6,
        bits_per_frame: 24,
    };

    #[inline]
    pub fn resolve(&self, freq_hz: f64) -> Result<TimingSpec, Error> {
        resolve(freq_hz, self.t_high, self.t_low, self.bits_per_frame)
    }

    #[inline]
    pub fn resolve_for<D: ClockDomain>(&self) -> Result<TimingSpec, Error> {
        self.resolve(D::FREQ as f64)
    }
}
