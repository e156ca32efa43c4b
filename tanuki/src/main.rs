use clap::Parser;
use color_eyre::eyre::{self, Context};
use std::path::PathBuf;
use tanuki::config::Configuration;
use tanuki_core::consts::VERSION;

/// tanuki social media server
#[derive(Parser)]
#[command(about, author, version = VERSION)]
struct Args {
    /// Path to the configuration file
    #[clap(long, short)]
    config: PathBuf,
}

async fn boot() -> eyre::Result<()> {
    let args = Args::parse();
    let config = Configuration::load(args.config).await?;
    tanuki::observability::initialise()?;

    let state = tanuki::initialise_state(&config)
        .await
        .wrap_err("Failed to initialise the application state")?;

    tanuki::http::run(state, config.server).await
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(boot())
}
