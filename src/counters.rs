use crate::{domain::Clock, error::Error, simulation::Simulate};

fn cycles_in(freq_hz: f64, seconds: f64) -> Result<u64, Error> {
    if !(freq_hz.is_finite() && freq_hz > 0.0) {
        return Err(Error::InvalidFrequency(freq_hz));
    }

    let exact = seconds * freq_hz;
    let cycles = exact.floor();
    if !(cycles >= 1.0 && cycles <= u64::MAX as f64) {
        return Err(Error::InvalidPeriod(exact));
    }

    Ok(cycles as u64)
}

/// Strobes HIGH for one tick every `every` ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiseEvery {
    every: u64,
    count: u64,
}

impl RiseEvery {
    pub fn new(every: u64) -> Result<Self, Error> {
        if every == 0 {
            return Err(Error::InvalidPeriod(0.0));
        }

        Ok(Self { every, count: 0 })
    }

    /// Strobe with a period of `seconds` at `freq_hz`.
    pub fn from_period(freq_hz: f64, seconds: f64) -> Result<Self, Error> {
        Self::new(cycles_in(freq_hz, seconds)?)
    }

    #[inline]
    pub fn every(&self) -> u64 {
        self.every
    }

    pub fn advance(&mut self) -> bool {
        self.count += 1;
        if self.count == self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

impl Simulate for RiseEvery {
    type Value = bool;

    #[inline]
    fn step(&mut self, _: &Clock) -> Self::Value {
        self.advance()
    }
}

/// Free-running counter whose bit `bit` drives a status LED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blink {
    bit: u32,
    counter: u64,
}

impl Blink {
    pub fn new(bit: u32) -> Self {
        Self { bit, counter: 0 }
    }

    /// Picks the counter bit that toggles closest to (not above) every
    /// `seconds` at `freq_hz`.
    pub fn with_toggle_period(freq_hz: f64, seconds: f64) -> Result<Self, Error> {
        let cycles = cycles_in(freq_hz, seconds)?;

        Ok(Self::new(cycles.ilog2()))
    }

    #[inline]
    pub fn bit(&self) -> u32 {
        self.bit
    }

    pub fn advance(&mut self) -> bool {
        let level = self
            .counter
            .checked_shr(self.bit)
            .map_or(false, |c| c & 1 == 1);
        self.counter = self.counter.wrapping_add(1);

        level
    }
}

impl Simulate for Blink {
    type Value = bool;

    #[inline]
    fn step(&mut self, _: &Clock) -> Self::Value {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rise_every() {
        let rise = RiseEvery::new(3).unwrap();

        #[rustfmt::skip]
        assert_eq!(
            rise.simulate().take(9).map(u8::from).collect::<Vec<_>>(),
            [0, 0, 1, 0, 0, 1, 0, 0, 1]
        );
    }

    #[test]
    fn rise_every_period() {
        // 50 us at 100 MHz
        let rise = RiseEvery::from_period(100e6, 50e-6).unwrap();
        assert_eq!(rise.every(), 5_000);

        assert!(matches!(RiseEvery::new(0), Err(Error::InvalidPeriod(_))));
        assert!(matches!(
            RiseEvery::from_period(1e3, 1e-6),
            Err(Error::InvalidPeriod(_))
        ));
        assert!(matches!(
            RiseEvery::from_period(0.0, 1.0),
            Err(Error::InvalidFrequency(_))
        ));
    }

    #[test]
    fn blink() {
        let blink = Blink::new(1);

        #[rustfmt::skip]
        assert_eq!(
            blink.simulate().take(8).map(u8::from).collect::<Vec<_>>(),
            [0, 0, 1, 1, 0, 0, 1, 1]
        );
    }

    #[test]
    fn blink_toggle_period() {
        // 2^24 cycles is the largest power of two below 0.2 s at 100 MHz
        let blink = Blink::with_toggle_period(100e6, 0.2).unwrap();
        assert_eq!(blink.bit(), 24);

        assert!(Blink::with_toggle_period(100e6, 1e-9).is_err());
    }

    #[test]
    fn blink_wide_bit() {
        let mut blink = Blink::new(64);

        assert!((0..16).all(|_| !blink.advance()));
    }
}
