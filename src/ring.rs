use std::io;

use tracing::trace;

use crate::{
    counters::{Blink, RiseEvery},
    domain::Clock,
    sequencer::Sequencer,
    simulation::Simulate,
    trace::{IdCode, TraceVars, Traceable, Tracer},
};

/// Pins driven by [`Ring`] on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingOutput {
    /// One-wire data line to the LED ring
    pub data: bool,
    /// Status LED
    pub led: bool,
}

impl Traceable for RingOutput {
    fn add_vars(vars: &mut TraceVars) {
        vars.add_field::<bool>("data");
        vars.add_field::<bool>("led");
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        self.data.trace(id, tracer)?;
        self.led.trace(id, tracer)
    }
}

/// Top module: LED ring encoder with an optional frame refresh and a status
/// blinker.
#[derive(Debug, Clone)]
pub struct Ring {
    seq: Sequencer,
    refresh: Option<RiseEvery>,
    blink: Blink,
}

impl Ring {
    pub fn new(seq: Sequencer, blink: Blink) -> Self {
        Self {
            seq,
            refresh: None,
            blink,
        }
    }

    /// Requests a new frame on every strobe of `refresh`. Strobes that arrive
    /// while a frame is in flight are dropped.
    pub fn with_refresh(mut self, refresh: RiseEvery) -> Self {
        self.refresh = Some(refresh);
        self
    }

    #[inline]
    pub fn sequencer(&self) -> &Sequencer {
        &self.seq
    }

    #[inline]
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.seq
    }

    pub fn step(&mut self, clk: &Clock) -> RingOutput {
        let led = self.blink.advance();
        let strobe = self.refresh.as_mut().map_or(false, RiseEvery::advance);
        let data = self.seq.step(clk);

        if strobe {
            if let Err(e) = self.seq.start_frame() {
                trace!("{clk}: refresh dropped: {e}");
            }
        }

        RingOutput { data, led }
    }
}

impl Simulate for Ring {
    type Value = RingOutput;

    #[inline]
    fn step(&mut self, clk: &Clock) -> Self::Value {
        Ring::step(self, clk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingSpec;

    #[test]
    fn single_frame_without_refresh() {
        let timing = TimingSpec::from_cycles(1, 1, 2).unwrap();
        let ring = Ring::new(Sequencer::new(timing), Blink::new(2));

        let mut sim = ring.simulate();
        let data = sim
            .by_ref()
            .take(8)
            .map(|out| out.data as u8)
            .collect::<Vec<_>>();

        assert_eq!(data, [1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(sim.source().sequencer().frames_sent(), 1);
    }

    #[test]
    fn refresh_restarts_frames() {
        let timing = TimingSpec::from_cycles(1, 1, 2).unwrap();
        let ring = Ring::new(Sequencer::idle(timing), Blink::new(0))
            .with_refresh(RiseEvery::new(6).unwrap());

        let out = ring.simulate().take(18).collect::<Vec<_>>();

        #[rustfmt::skip]
        assert_eq!(
            out.iter().map(|o| o.data as u8).collect::<Vec<_>>(),
            [
                0, 0, 0, 0, 0, 0,
                1, 0, 1, 0, 0, 0,
                1, 0, 1, 0, 0, 0,
            ]
        );
        #[rustfmt::skip]
        assert_eq!(
            out.iter().take(4).map(|o| o.led as u8).collect::<Vec<_>>(),
            [0, 1, 0, 1]
        );
    }

    #[test]
    fn refresh_dropped_mid_frame() {
        // frame takes 8 ticks, strobe every 3
        let timing = TimingSpec::from_cycles(2, 2, 2).unwrap();
        let ring = Ring::new(Sequencer::new(timing), Blink::new(0))
            .with_refresh(RiseEvery::new(3).unwrap());

        let mut sim = ring.simulate();
        let data = sim
            .by_ref()
            .take(12)
            .map(|out| out.data as u8)
            .collect::<Vec<_>>();

        #[rustfmt::skip]
        assert_eq!(data, [
            1, 1, 0, 0, 1, 1, 0, 0,
            0,
            1, 1, 0,
        ]);
        assert_eq!(sim.source().sequencer().frames_sent(), 1);
    }
}
