//! Bridge between the async transports and the synchronous overlay core.
//!
//! The feed client and the catalog fetch run as their own tasks; everything
//! they produce is funnelled into a single dispatch loop that owns the
//! [`EventRouter`], so overlay state is only ever touched from one place.

use std::sync::Arc;

use overlay_protocol::Catalog;
use tokio::sync::{mpsc, oneshot, watch};
use url::Url;

use crate::application::EventRouter;
use crate::infrastructure::websocket::ConnectionState;
use crate::ports::outbound::{CatalogPort, DisplayPort};

/// Fetch the catalog in the background.
///
/// The receiver resolves with the catalog, or errors if the fetch failed
/// (the failure is logged here and the overlay runs without preloading).
pub fn spawn_catalog_fetch(catalog: Arc<dyn CatalogPort>) -> oneshot::Receiver<Catalog> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        match catalog.fetch_catalog().await {
            Ok(catalog) => {
                tracing::info!(
                    abilities = catalog.abilities.len(),
                    quests = catalog.quests.len(),
                    "catalog loaded"
                );
                let _ = tx.send(catalog);
            }
            Err(e) => tracing::warn!(error = %e, "catalog unavailable, skipping preload"),
        }
    });
    rx
}

/// Run the overlay until the frame channel closes.
///
/// The catalog, if it arrives, is applied between frames; frames are
/// dispatched strictly in arrival order. Returns the router so callers can
/// inspect final state.
pub async fn dispatch_loop(
    mut router: EventRouter,
    mut frames: mpsc::Receiver<String>,
    mut catalog: oneshot::Receiver<Catalog>,
) -> EventRouter {
    let mut catalog_pending = true;

    loop {
        tokio::select! {
            biased;

            result = &mut catalog, if catalog_pending => {
                catalog_pending = false;
                if let Ok(catalog) = result {
                    router.apply_catalog(&catalog);
                }
            }

            frame = frames.recv() => {
                let Some(frame) = frame else {
                    tracing::info!("event feed closed, stopping dispatch");
                    break;
                };
                router.handle_frame(&frame);
            }
        }
    }

    router
}

/// Mirror connection state onto the status line until the client goes away.
pub async fn mirror_status(
    mut state: watch::Receiver<ConnectionState>,
    display: Arc<dyn DisplayPort>,
    url: Url,
) {
    loop {
        let current = *state.borrow_and_update();
        display.set_status(&current.status_text());
        if current == ConnectionState::Connected {
            display.toast(&format!("WebSocket open → {url}"));
        }

        if state.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{OverlayContext, OverlayDeps};
    use crate::infrastructure::testing::{
        ManualClock, RecordingAudio, RecordingDisplay, StaticCatalog,
    };
    use crate::ports::outbound::{MockSpeechEnginePort, ViewList};
    use overlay_protocol::CatalogAbility;

    fn router(audio: Arc<RecordingAudio>, display: Arc<RecordingDisplay>) -> EventRouter {
        let mut speech = MockSpeechEnginePort::new();
        speech.expect_is_available().return_const(false);
        EventRouter::new(OverlayContext::new(OverlayDeps {
            audio,
            speech: Arc::new(speech),
            display,
            clock: Arc::new(ManualClock::new(0)),
        }))
    }

    async fn settle(mut done: impl FnMut() -> bool) {
        for _ in 0..1_000 {
            if done() {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            abilities: vec![CatalogAbility {
                id: Some("trex".into()),
                name: Some("T-Rex".into()),
                sfx_url: Some("/sfx/roar.mp3".into()),
                ..CatalogAbility::default()
            }],
            quests: Vec::new(),
        }
    }

    #[tokio::test]
    async fn dispatches_frames_in_order_then_stops() {
        let audio = Arc::new(RecordingAudio::new());
        let display = Arc::new(RecordingDisplay::new());
        let (tx, rx) = mpsc::channel(8);
        let (_catalog_tx, catalog_rx) = oneshot::channel::<Catalog>();

        tx.send(r#"{"type":"QUEST_ADD","data":{"id":"q1","name":"Slay"}}"#.to_string())
            .await
            .expect("send");
        tx.send("not json".to_string()).await.expect("send");
        tx.send(r#"{"type":"QUEST_REMOVE","data":{"id":"q1"}}"#.to_string())
            .await
            .expect("send");
        drop(tx);

        let router = dispatch_loop(router(audio, display.clone()), rx, catalog_rx).await;
        assert!(router.context().quests.is_empty());
        assert!(display.elements(ViewList::Quests).is_empty());
    }

    #[tokio::test]
    async fn applies_catalog_when_it_arrives() {
        let audio = Arc::new(RecordingAudio::new());
        let display = Arc::new(RecordingDisplay::new());
        let (tx, rx) = mpsc::channel(8);

        let catalog_rx = spawn_catalog_fetch(Arc::new(StaticCatalog::new(catalog())));
        let loop_task = tokio::spawn(dispatch_loop(
            router(audio.clone(), display.clone()),
            rx,
            catalog_rx,
        ));

        settle(|| !audio.created_urls().is_empty()).await;
        tx.send(r#"{"type":"DONATION","data":{"donor":"Ann","amount":500}}"#.to_string())
            .await
            .expect("send");
        drop(tx);

        let router = loop_task.await.expect("dispatch loop");
        assert!(router.context().audio.entry("trex").is_some());
        assert_eq!(audio.created_urls(), vec!["/sfx/roar.mp3"]);
        assert!(display
            .toasts()
            .iter()
            .any(|t| t == "Preloading 1 sound…"));
        assert!(display
            .toasts()
            .iter()
            .any(|t| t == "💸 Ann donated $5.00"));
    }

    #[tokio::test]
    async fn failed_catalog_leaves_cache_empty() {
        let audio = Arc::new(RecordingAudio::new());
        let display = Arc::new(RecordingDisplay::new());
        let (tx, rx) = mpsc::channel(8);
        drop(tx);

        let catalog_rx = spawn_catalog_fetch(Arc::new(StaticCatalog::failing()));
        let router = dispatch_loop(router(audio.clone(), display), rx, catalog_rx).await;
        assert!(router.context().audio.is_empty());
        assert!(audio.created_urls().is_empty());
    }

    #[tokio::test]
    async fn status_follows_connection_state() {
        let display = Arc::new(RecordingDisplay::new());
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let url = Url::parse("ws://localhost:8080/ws").expect("url");
        let task = tokio::spawn(mirror_status(state_rx, display.clone(), url));

        settle(|| !display.statuses().is_empty()).await;
        state_tx.send_replace(ConnectionState::Connected);
        settle(|| !display.toasts().is_empty()).await;
        state_tx.send_replace(ConnectionState::Disconnected {
            retry_delay_ms: Some(2_000),
        });
        drop(state_tx);
        task.await.expect("mirror task");

        let statuses = display.statuses();
        assert_eq!(statuses.first().map(String::as_str), Some("WS: connecting"));
        assert_eq!(
            statuses.last().map(String::as_str),
            Some("WS: reconnecting in 2s")
        );
        assert_eq!(
            display.toasts(),
            vec!["WebSocket open → ws://localhost:8080/ws".to_string()]
        );
    }
}
