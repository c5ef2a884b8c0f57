pub mod counters;
pub mod domain;
pub mod error;
pub mod ring;
pub mod sequencer;
pub mod simulation;
pub mod timing;
pub mod trace;

pub use error::Error;

pub mod prelude {
    pub use crate::{
        counters::{Blink, RiseEvery},
        domain::{clk_divider, hz_to_period, Clock, ClockDomain},
        error::Error,
        ring::{Ring, RingOutput},
        sequencer::{next_state, Phase, Sequencer, SequencerState},
        simulation::Simulate,
        timing::{resolve, Protocol, TimingSpec},
    };
}
