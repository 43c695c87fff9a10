use std::env;

use anyhow::Context;
use forager::{app::App, config::SceneConfig, constants::LOOP_TIME, formatter::CustomFormatter, game::Game};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).event_format(CustomFormatter))
        .with(ErrorLayer::default())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("Could not set global tracing subscriber")
}

/// Runs the island scene headlessly with a scripted player.
///
/// `--realtime` paces ticks to the loop rate; `--seed N` fixes foragable placement.
pub fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args: Vec<String> = env::args().collect();
    let realtime = args.iter().any(|arg| arg == "--realtime" || arg == "-r");

    let mut config = SceneConfig::from_env().context("Could not load scene configuration")?;
    if let Some(position) = args.iter().position(|arg| arg == "--seed") {
        let seed = args.get(position + 1).context("--seed requires a value")?;
        config.seed = Some(seed.parse().with_context(|| format!("Invalid seed: {seed}"))?);
    }

    let game = Game::new(config).context("Could not create scene")?;
    let mut app = App::new(game, realtime);

    info!(loop_time = ?LOOP_TIME, realtime, "Starting game loop");
    while app.run() {}
    app.report();

    Ok(())
}
