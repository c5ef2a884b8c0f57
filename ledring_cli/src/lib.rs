use std::io;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

mod commands;
mod config;
mod styles;

pub use config::{Color, TimingArgs};

const LOG_ENV_VAR: &str = "LEDRING_LOG";

#[derive(Parser)]
#[command(name = "ledring")]
#[command(version, about, long_about = None)]
#[command(styles = styles::get_styles())]
struct Cli {
    /// Use colors
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true)]
    color: Color,
    #[command(subcommand)]
    command: Commands,
}

fn init_logger(color: Color) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter);
    let subscriber = subscriber.with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(color.use_colors())
            .with_target(true),
    );

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.color)?;

    cli.command.run()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_resolve() {
        let cli =
            Cli::try_parse_from(["ledring", "resolve", "--freq", "25e6", "--json"]).unwrap();

        assert_eq!(cli.color, Color::Auto);
        assert!(matches!(cli.command, Commands::Resolve(_)));
    }

    #[test]
    fn parse_sim() {
        let cli = Cli::try_parse_from([
            "ledring",
            "--color",
            "never",
            "sim",
            "--ticks",
            "3000",
            "--refresh",
            "50e-6",
        ])
        .unwrap();

        assert_eq!(cli.color, Color::Never);
        assert!(matches!(cli.command, Commands::Sim(_)));
    }
}
