//! Stream Overlay Client - Main entry point.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overlay_client::application::{EventRouter, OverlayContext, OverlayDeps};
use overlay_client::infrastructure::{
    bridge::{dispatch_loop, mirror_status, spawn_catalog_fetch},
    websocket::FeedClient,
    EspeakSpeech, HttpCatalog, OverlayConfig, RodioAudio, SystemClock, TerminalDisplay,
};
use overlay_client::ports::outbound::DisplayPort;

/// Buffered frames between the socket reader and the dispatcher.
const FRAME_BUFFER: usize = 256;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overlay_client=debug,overlay_protocol=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting stream overlay client");

    let config = OverlayConfig::from_env()?;
    tracing::info!(
        origin = %config.origin,
        feed = %config.ws_url,
        catalog = %config.catalog_url,
        "configuration loaded"
    );

    // Platform adapters
    let display: Arc<dyn DisplayPort> = Arc::new(TerminalDisplay::new());
    let audio = Arc::new(RodioAudio::new(
        Some(config.origin.clone()),
        tokio::runtime::Handle::current(),
    ));
    let speech = Arc::new(EspeakSpeech::launch(&config.espeak_bin).await);

    let router = EventRouter::new(OverlayContext::new(OverlayDeps {
        audio,
        speech,
        display: Arc::clone(&display),
        clock: Arc::new(SystemClock::new()),
    }));

    let catalog_rx = if config.preload {
        spawn_catalog_fetch(Arc::new(HttpCatalog::new(config.catalog_url.clone())))
    } else {
        // dropped sender: nothing to preload
        tokio::sync::oneshot::channel().1
    };

    // Event feed
    let (frames_tx, frames_rx) = mpsc::channel(FRAME_BUFFER);
    let (client, state_rx) = FeedClient::new(config.ws_url.clone(), frames_tx);
    tokio::spawn(mirror_status(state_rx, Arc::clone(&display), client.url().clone()));
    tokio::spawn(client.run());

    tokio::select! {
        _ = dispatch_loop(router, frames_rx, catalog_rx) => {
            tracing::warn!("dispatch loop ended");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
