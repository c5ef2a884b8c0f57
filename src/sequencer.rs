//! Pulse sequencer.
//!
//! Every bit of a frame is sent as a HIGH phase of `high_cycles` ticks
//! followed by a LOW phase of `low_cycles` ticks. After `bits_per_frame`
//! bits the line is held LOW until a new frame is requested.
//!
//! The register update is the pure function [`next_state`]; [`Sequencer`]
//! owns the registers and applies it once per tick.

use strum::{Display, IntoStaticStr};
use tracing::{debug, trace};

use crate::{
    domain::Clock,
    error::Error,
    simulation::Simulate,
    timing::TimingSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Phase {
    #[strum(serialize = "HIGH")]
    High,
    #[strum(serialize = "LOW")]
    Low,
}

impl Phase {
    /// Line level driven during this phase.
    #[inline]
    pub fn level(self) -> bool {
        matches!(self, Self::High)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequencerState {
    bit_index: u32,
    phase: Phase,
    phase_elapsed: u32,
    output_level: bool,
}

impl Default for SequencerState {
    #[inline]
    fn default() -> Self {
        Self::RESET
    }
}

impl SequencerState {
    /// Registers at the start of a frame.
    pub const RESET: Self = Self {
        bit_index: 0,
        phase: Phase::High,
        phase_elapsed: 0,
        output_level: true,
    };

    /// Registers of a sequencer with no frame in flight.
    pub fn idle(timing: &TimingSpec) -> Self {
        Self {
            bit_index: timing.bits_per_frame(),
            phase: Phase::High,
            phase_elapsed: 0,
            output_level: false,
        }
    }

    #[inline]
    pub fn bit_index(&self) -> u32 {
        self.bit_index
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn phase_elapsed(&self) -> u32 {
        self.phase_elapsed
    }

    #[inline]
    pub fn output_level(&self) -> bool {
        self.output_level
    }

    #[inline]
    pub fn is_frame_done(&self, timing: &TimingSpec) -> bool {
        self.bit_index >= timing.bits_per_frame()
    }
}

/// Register values after one tick.
pub fn next_state(state: SequencerState, timing: &TimingSpec) -> SequencerState {
    if state.is_frame_done(timing) {
        return SequencerState {
            output_level: false,
            ..state
        };
    }

    let elapsed = state.phase_elapsed + 1;
    let output_level = state.phase.level();

    if elapsed < timing.phase_cycles(state.phase) {
        return SequencerState {
            phase_elapsed: elapsed,
            output_level,
            ..state
        };
    }

    match state.phase {
        Phase::High => SequencerState {
            phase: Phase::Low,
            phase_elapsed: 0,
            output_level,
            ..state
        },
        Phase::Low => SequencerState {
            bit_index: state.bit_index + 1,
            phase: Phase::High,
            phase_elapsed: 0,
            output_level,
        },
    }
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    timing: TimingSpec,
    state: SequencerState,
    frames: u64,
}

impl Sequencer {
    /// Sequencer right after reset: the first frame starts on the next tick.
    pub fn new(timing: TimingSpec) -> Self {
        Self {
            timing,
            state: SequencerState::RESET,
            frames: 0,
        }
    }

    /// Sequencer waiting for [`Sequencer::start_frame`].
    pub fn idle(timing: TimingSpec) -> Self {
        Self {
            timing,
            state: SequencerState::idle(&timing),
            frames: 0,
        }
    }

    #[inline]
    pub fn timing(&self) -> &TimingSpec {
        &self.timing
    }

    #[inline]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Current level of the data line.
    #[inline]
    pub fn output(&self) -> bool {
        self.state.output_level
    }

    #[inline]
    pub fn frame_done(&self) -> bool {
        self.state.is_frame_done(&self.timing)
    }

    /// Number of frames completed so far.
    #[inline]
    pub fn frames_sent(&self) -> u64 {
        self.frames
    }

    /// Arms a new frame. Rejected while a frame is in flight.
    pub fn start_frame(&mut self) -> Result<(), Error> {
        self.ensure_idle()?;

        self.state = SequencerState::RESET;
        debug!("start frame {}", self.frames + 1);

        Ok(())
    }

    /// Installs new timing. Rejected while a frame is in flight.
    pub fn reconfigure(&mut self, timing: TimingSpec) -> Result<(), Error> {
        self.ensure_idle()?;

        debug!("reconfigure: {timing}");
        self.timing = timing;
        self.state = SequencerState::idle(&timing);

        Ok(())
    }

    /// Evaluates one tick and returns the level driven on the data line.
    pub fn step(&mut self, clk: &Clock) -> bool {
        let busy = !self.frame_done();

        self.state = next_state(self.state, &self.timing);

        if busy {
            trace!(
                "{clk}: bit = {}, phase = {}, elapsed = {}, out = {}",
                self.state.bit_index,
                self.state.phase,
                self.state.phase_elapsed,
                self.state.output_level
            );
            if self.frame_done() {
                self.frames += 1;
                debug!("frame {} done at {clk}", self.frames);
            }
        }

        self.state.output_level
    }

    fn ensure_idle(&self) -> Result<(), Error> {
        if self.frame_done() {
            Ok(())
        } else {
            Err(Error::Busy {
                bit_index: self.state.bit_index,
                bits_per_frame: self.timing.bits_per_frame(),
            })
        }
    }
}

impl Simulate for Sequencer {
    type Value = bool;

    #[inline]
    fn step(&mut self, clk: &Clock) -> Self::Value {
        Sequencer::step(self, clk)
    }
}
