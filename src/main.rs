use std::time::Instant;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use xkcd_fetch::utils::display_report;
use xkcd_fetch::{AppConfig, Cli, Interrupt, XkcdCrawler, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (start, end) = match cli.range() {
        Ok(range) => range,
        Err(e) => Cli::command()
            .error(clap::error::ErrorKind::ValueValidation, e)
            .exit(),
    };

    logger::init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(threads) = cli.threads {
        config.threads = threads.into();
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    config.validate()?;

    let interrupt = Interrupt::new();
    interrupt.listen();

    let crawler = XkcdCrawler::from_config(&config, interrupt).await?;

    info!("downloading pages {} to {} into {}", start, end, config.output_dir.display());
    let started = Instant::now();
    let report = crawler.run(start, end).await?;
    display_report(&report, started.elapsed());

    Ok(())
}
