use anyhow::Result;
use clap::Parser;
use title_card_sourcer::cli::Cli;
use title_card_sourcer::component::TitleCardGenerator;
use title_card_sourcer::init;
use title_card_sourcer::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();

    let config = Cli::parse().into_config();
    let shutdown_signal = setup_shutdown_signal();

    let generator = TitleCardGenerator::new(config, shutdown_signal);
    generator.run()?;

    Ok(())
}
