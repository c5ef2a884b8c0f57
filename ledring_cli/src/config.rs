use std::{
    fs::File,
    io::{self, BufReader, IsTerminal},
    path::Path,
};

use anyhow::Context;
use clap::{Args, ValueEnum};
use ledring::{
    timing::{Protocol, TimingSpec},
    Error,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Args, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingArgs {
    /// System clock frequency in hertz
    #[arg(long, default_value_t = 100e6)]
    pub freq: f64,
    /// Width of the HIGH phase in seconds
    #[arg(long, default_value_t = Protocol::WS2812.t_high)]
    pub t_high: f64,
    /// Width of the LOW phase in seconds
    #[arg(long, default_value_t = Protocol::WS2812.t_low)]
    pub t_low: f64,
    /// Number of bits in a frame
    #[arg(long, default_value_t = Protocol::WS2812.bits_per_frame)]
    pub bits: u32,
}

impl Default for TimingArgs {
    fn default() -> Self {
        Self {
            freq: 100e6,
            t_high: Protocol::WS2812.t_high,
            t_low: Protocol::WS2812.t_low,
            bits: Protocol::WS2812.bits_per_frame,
        }
    }
}

impl TimingArgs {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open config '{}'", path.display()))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse config '{}'", path.display()))
    }

    pub fn protocol(&self) -> Protocol {
        Protocol {
            t_high: self.t_high,
            t_low: self.t_low,
            bits_per_frame: self.bits,
        }
    }

    pub fn resolve(&self) -> Result<TimingSpec, Error> {
        self.protocol().resolve(self.freq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Color {
    Never,
    Auto,
    Always,
}

impl Color {
    pub fn use_colors(&self) -> bool {
        match self {
            Self::Never => false,
            Self::Auto => io::stderr().is_terminal(),
            Self::Always => true,
        }
    }
}
