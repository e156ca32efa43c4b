use std::env;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

/// Install the global tracing subscriber
///
/// Log targets come from `RUST_LOG`, defaulting to `info`.
pub fn initialise() -> eyre::Result<()> {
    let env_filter = env::var("RUST_LOG")
        .ok()
        .and_then(|targets| targets.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::default().with_default(LevelFilter::INFO));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init()?;

    Ok(())
}
