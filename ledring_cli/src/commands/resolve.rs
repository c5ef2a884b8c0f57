use anyhow::Context;
use clap::Args;
use ledring::timing::TimingSpec;
use serde::Serialize;

use super::Run;
use crate::config::TimingArgs;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    timing: TimingArgs,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    freq_hz: f64,
    high_cycles: u32,
    low_cycles: u32,
    bits_per_frame: u32,
    bit_cycles: u64,
    frame_cycles: u64,
    /// Time actually spent per bit after truncation, in seconds
    bit_time: f64,
}

impl Report {
    fn new(freq_hz: f64, timing: &TimingSpec) -> Self {
        Self {
            freq_hz,
            high_cycles: timing.high_cycles(),
            low_cycles: timing.low_cycles(),
            bits_per_frame: timing.bits_per_frame(),
            bit_cycles: timing.bit_cycles(),
            frame_cycles: timing.frame_cycles(),
            bit_time: timing.bit_cycles() as f64 / freq_hz,
        }
    }
}

impl Run for ResolveArgs {
    fn run(&self) -> anyhow::Result<()> {
        let freq = self.timing.freq;
        let timing = self
            .timing
            .resolve()
            .with_context(|| format!("cannot resolve timing at {freq} Hz"))?;
        let report = Report::new(freq, &timing);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("freq:        {} Hz", report.freq_hz);
            println!("high:        {} cycles", report.high_cycles);
            println!("low:         {} cycles", report.low_cycles);
            println!("bit:         {} cycles ({:e} s)", report.bit_cycles, report.bit_time);
            println!(
                "frame:       {} bits, {} cycles",
                report.bits_per_frame, report.frame_cycles
            );
        }

        Ok(())
    }
}
