fn main() -> anyhow::Result<()> {
    bundle::init();

    let cli = bundle::cli::Cli::parse_args();
    cli.run()
}
