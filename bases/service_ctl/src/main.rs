use clap::Parser;
use color_eyre::Result;

mod commands;
mod config;
mod error;

use config::Task;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = config::CliArgs::parse();
    let config = config::Config::from_args(args)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match &config.task {
        Task::EncodeRanges(values) => println!("{}", commands::encode_ranges(values)),
        Task::DecodeRanges(text) => println!("{}", commands::decode_ranges(text)?),
        Task::Locations { fixture, path } => commands::show_locations(fixture, path).await?,
        Task::Provision(task) => commands::provision(task).await?,
    }

    Ok(())
}
