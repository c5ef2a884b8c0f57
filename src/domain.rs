use std::fmt::{self, Display};

use crate::error::Error;

pub const SECOND: usize = 1_000_000_000_000;
pub const MILLISECOND: usize = 1_000_000_000;
pub const MICROSECOND: usize = 1_000_000;
pub const NANOSECOND: usize = 1_000;
pub const PICOSECOND: usize = 1;

pub const fn hz_to_period(freq: usize) -> usize {
    assert!(freq > 0 && SECOND >= freq);
    SECOND / freq
}

pub const fn clk_divider<D: ClockDomain>(ps: usize) -> usize {
    assert!(ps >= D::PERIOD);
    ps / D::PERIOD
}

pub trait ClockDomain: 'static {
    /// In hertz
    const FREQ: usize;
    /// In picoseconds
    const PERIOD: usize = hz_to_period(Self::FREQ);
}

/// 100 MHz oscillator of the Arty A7 board.
pub struct ArtyA7;

impl ClockDomain for ArtyA7 {
    const FREQ: usize = 100_000_000;
}

/// 25 MHz oscillator of the iCESugar-Pro board.
pub struct IceSugarPro;

impl ClockDomain for IceSugarPro {
    const FREQ: usize = 25_000_000;
}

pub struct TestDomain<const N: usize>;

impl<const N: usize> ClockDomain for TestDomain<N> {
    const FREQ: usize = N;
}

pub type TD4 = TestDomain<4>;

/// Tick source.
///
/// The clock only counts ticks, it never drives anything by itself: whoever
/// owns it calls [`Clock::tick`] once per time step and hands a shared
/// reference to every component evaluated during that step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    cycle: u64,
    /// In picoseconds
    period: u64,
}

impl Default for Clock {
    #[inline]
    fn default() -> Self {
        Self::new(PICOSECOND as u64)
    }
}

impl Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {} ({} ps)", self.cycle, self.time())
    }
}

impl Clock {
    pub fn new(period: u64) -> Self {
        Self {
            cycle: 0,
            period: period.max(1),
        }
    }

    pub fn for_domain<D: ClockDomain>() -> Self {
        Self::new(D::PERIOD as u64)
    }

    pub fn from_freq(freq_hz: f64) -> Result<Self, Error> {
        if !(freq_hz.is_finite() && freq_hz > 0.0) {
            return Err(Error::InvalidFrequency(freq_hz));
        }

        Ok(Self::new((SECOND as f64 / freq_hz).round() as u64))
    }

    /// Number of ticks elapsed since reset.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Elapsed time in picoseconds.
    #[inline]
    pub fn time(&self) -> u64 {
        self.cycle.wrapping_mul(self.period)
    }

    #[inline]
    pub fn tick(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
    }

    pub fn reset(&mut self) {
        self.cycle = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods() {
        assert_eq!(ArtyA7::PERIOD, 10 * NANOSECOND);
        assert_eq!(IceSugarPro::PERIOD, 40 * NANOSECOND);
        assert_eq!(hz_to_period(1_000), MILLISECOND);
    }

    #[test]
    fn divider() {
        assert_eq!(clk_divider::<ArtyA7>(MICROSECOND), 100);
        assert_eq!(clk_divider::<IceSugarPro>(MICROSECOND), 25);
        assert_eq!(clk_divider::<TD4>(SECOND), 4);
    }

    #[test]
    fn clock_time() {
        let mut clk = Clock::for_domain::<ArtyA7>();
        for _ in 0..125 {
            clk.tick();
        }

        assert_eq!(clk.cycle(), 125);
        assert_eq!(clk.time(), 1_250 * NANOSECOND as u64);

        clk.reset();
        assert_eq!(clk.cycle(), 0);
    }

    #[test]
    fn clock_from_freq() {
        assert_eq!(Clock::from_freq(25e6).unwrap().period(), 40_000);
        assert!(matches!(
            Clock::from_freq(0.0),
            Err(Error::InvalidFrequency(_))
        ));
        assert!(matches!(
            Clock::from_freq(f64::NAN),
            Err(Error::InvalidFrequency(_))
        ));
    }
}
