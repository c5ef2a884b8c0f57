use clap::Subcommand;

use self::{resolve::ResolveArgs, sim::SimArgs};

mod resolve;
mod sim;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve pulse widths into cycle counts
    Resolve(ResolveArgs),
    /// Simulate the LED ring controller
    Sim(SimArgs),
}

pub trait Run {
    fn run(&self) -> anyhow::Result<()>;
}

impl Commands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Resolve(args) => args.run(),
            Self::Sim(args) => args.run(),
        }
    }
}
