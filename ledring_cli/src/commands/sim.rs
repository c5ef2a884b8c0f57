use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ledring::{
    counters::{Blink, RiseEvery},
    domain::Clock,
    ring::{Ring, RingOutput},
    sequencer::Sequencer,
    simulation::Simulate,
    trace::{TraceVars, Tracer},
};
use tracing::info;

use super::Run;
use crate::config::TimingArgs;

#[derive(Debug, Args)]
pub struct SimArgs {
    #[command(flatten)]
    timing: TimingArgs,
    /// Read timing from a JSON file instead of the command line
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the timing configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,
    /// Start a new frame every this many seconds
    #[arg(long)]
    refresh: Option<f64>,
    /// Counter bit driving the status LED
    #[arg(long, default_value_t = 24)]
    blink_bit: u32,
    /// Wait for the first refresh instead of sending a frame right after reset
    #[arg(long)]
    idle: bool,
    /// Dump waveforms to this VCD file
    #[arg(long)]
    vcd: Option<PathBuf>,
}

impl SimArgs {
    fn timing_args(&self) -> anyhow::Result<TimingArgs> {
        match &self.config {
            Some(path) => TimingArgs::from_json_file(path),
            None => Ok(self.timing.clone()),
        }
    }
}

impl Run for SimArgs {
    fn run(&self) -> anyhow::Result<()> {
        let args = self.timing_args()?;
        if self.dump_config {
            println!("{}", serde_json::to_string_pretty(&args)?);
            return Ok(());
        }

        let timing = args
            .resolve()
            .with_context(|| format!("cannot resolve timing at {} Hz", args.freq))?;
        info!("{timing}");

        let seq = if self.idle {
            Sequencer::idle(timing)
        } else {
            Sequencer::new(timing)
        };
        let mut ring = Ring::new(seq, Blink::new(self.blink_bit));
        if let Some(period) = self.refresh {
            let refresh = RiseEvery::from_period(args.freq, period)
                .with_context(|| format!("invalid refresh period {period} s"))?;
            info!("refresh every {} cycles", refresh.every());
            ring = ring.with_refresh(refresh);
        }

        let mut tracer = match &self.vcd {
            Some(path) => {
                let vars = TraceVars::default()
                    .add_var("ring", &RingOutput::default())
                    .add_var("seq", &ring.sequencer().state());
                let tracer = Tracer::open_vcd(path, vars, "ring", None)
                    .with_context(|| format!("cannot create '{}'", path.display()))?;
                Some(tracer)
            }
            None => None,
        };

        let mut sim = ring.simulate_with(Clock::from_freq(args.freq)?);
        let mut high_ticks = 0_u64;
        for _ in 0..self.ticks {
            let out = sim.next_tick();
            high_ticks += out.data as u64;

            if let Some(tracer) = tracer.as_mut() {
                tracer.dump_time(sim.clock().time())?;
                tracer.trace("ring", &out)?;
                tracer.trace("seq", &sim.source().sequencer().state())?;
            }
        }

        if let (Some(tracer), Some(path)) = (tracer.as_mut(), self.vcd.as_ref()) {
            tracer.flush()?;
            info!("waveforms written to '{}'", path.display());
        }

        let seq = sim.source().sequencer();
        println!("ticks:       {} ({} ps)", sim.clock().cycle(), sim.clock().time());
        println!("frames:      {}", seq.frames_sent());
        println!("high ticks:  {high_ticks}");
        println!(
            "state:       bit {} of {}, {}",
            seq.state().bit_index(),
            seq.timing().bits_per_frame(),
            if seq.frame_done() { "idle" } else { "busy" }
        );

        Ok(())
    }
}
