use crate::domain::Clock;

/// Component evaluated once per tick.
pub trait Simulate: Sized {
    type Value;

    fn step(&mut self, clk: &Clock) -> Self::Value;

    fn simulate(self) -> Values<Self> {
        self.simulate_with(Clock::default())
    }

    fn simulate_with(self, clk: Clock) -> Values<Self> {
        Values { clk, source: self }
    }
}

/// Endless iterator over the values produced by a [`Simulate`] source.
///
/// Tick `n` (counting from 1) is the `n`-th item.
#[derive(Debug)]
pub struct Values<S> {
    clk: Clock,
    source: S,
}

impl<S: Simulate> Values<S> {
    pub fn next_tick(&mut self) -> S::Value {
        self.clk.tick();
        self.source.step(&self.clk)
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clk
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Simulate> Iterator for Values<S> {
    type Item = S::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_tick())
    }
}
