fn main() -> anyhow::Result<()> {
    ledring_cli::run_cli()
}
