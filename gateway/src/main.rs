//! Entry point: parse `Config`, open the registry, start the idle-room reap
//! sweep, serve `/ws` and `/healthz`. Grounded on
//! `services/live-table/src/main.rs`'s `main()` (tracing init, env-derived
//! config, a background `tokio::spawn` loop alongside `axum::serve`).

use std::sync::Arc;

use anyhow::Context;
use bluffhouse_gateway::connection::AppState;
use bluffhouse_gateway::{Config, RoomRegistry};
use bluffhouse_registry::Registry;
use clap::Parser;
use tokio::time::{interval, Duration};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let registry = if config.data_path == ":memory:" {
        Registry::open_in_memory().context("open in-memory registry")?
    } else {
        Registry::open(std::path::Path::new(&config.data_path)).context("open registry database")?
    }
    .with_max_username_len(config.max_username_len);

    let rooms = Arc::new(RoomRegistry::new(config.max_players, config.seed));

    let reap_rooms = rooms.clone();
    let reap_interval = config.reap_interval_secs;
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(reap_interval));
        loop {
            ticker.tick().await;
            reap_rooms.reap_idle();
        }
    });

    let state = AppState { rooms, registry };
    let app = bluffhouse_gateway::ws::app(state);

    let addr = config.addr();
    info!(%addr, "bluffhouse gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
