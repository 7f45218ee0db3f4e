//! Desktop feed client using tokio-tungstenite

use futures_util::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
};
use url::Url;

use super::core::{ConnectionState, ReconnectMachine};

/// How a connected session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Transport closed or errored; reconnect
    Closed,
    /// Nobody is consuming frames any more; stop
    Shutdown,
}

/// Receive-only client for the overlay event feed.
///
/// Text frames are forwarded unparsed, in arrival order, to the frame
/// channel. Connection state is published on a watch channel, which never
/// blocks the read loop.
pub struct FeedClient {
    url: Url,
    frames: mpsc::Sender<String>,
    state: watch::Sender<ConnectionState>,
}

impl FeedClient {
    pub fn new(url: Url, frames: mpsc::Sender<String>) -> (Self, watch::Receiver<ConnectionState>) {
        let (state, state_rx) = watch::channel(ConnectionState::Disconnected {
            retry_delay_ms: None,
        });
        (Self { url, frames, state }, state_rx)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn publish(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    /// Connect and keep reconnecting until the frame receiver is dropped.
    pub async fn run(self) {
        let mut machine = ReconnectMachine::default();
        self.publish(machine.begin_connect());

        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _response)) => {
                    tracing::info!(url = %self.url, "connected to event feed");
                    self.publish(machine.on_open());
                    if self.pump(stream).await == SessionEnd::Shutdown {
                        tracing::info!("frame consumer gone, stopping feed client");
                        return;
                    }
                }
                Err(e) => {
                    // a close always follows; nothing else to report
                    tracing::debug!(url = %self.url, error = %e, "event feed connection failed");
                }
            }

            let (state, delay) = machine.on_close();
            self.publish(state);
            tracing::info!(delay_ms = delay.as_millis() as u64, "reconnecting to event feed");
            tokio::time::sleep(delay).await;

            if self.frames.is_closed() {
                return;
            }
            self.publish(machine.on_timer());
        }
    }

    /// Forward text frames until the transport closes.
    async fn pump<S>(&self, mut stream: S) -> SessionEnd
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if self.frames.send(text).await.is_err() {
                        return SessionEnd::Shutdown;
                    }
                }
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "event feed closed by server");
                    break;
                }
                Ok(Message::Binary(bytes)) => {
                    tracing::trace!(len = bytes.len(), "ignoring binary frame");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "event feed transport error");
                    break;
                }
            }
        }
        SessionEnd::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream, SinkExt};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    fn client() -> (FeedClient, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(16);
        let url = Url::parse("ws://127.0.0.1:9/ws").expect("url");
        let (client, _state) = FeedClient::new(url, tx);
        (client, rx)
    }

    #[test]
    fn keeps_the_feed_url() {
        let (client, _rx) = client();
        assert_eq!(client.url().as_str(), "ws://127.0.0.1:9/ws");
    }

    #[tokio::test]
    async fn pump_forwards_text_frames_in_order() {
        let (client, mut rx) = client();
        let frames = stream::iter(vec![
            Ok(Message::Text("one".to_string())),
            Ok(Message::Binary(vec![1, 2, 3])),
            Ok(Message::Ping(Vec::new())),
            Ok(Message::Text("two".to_string())),
            Ok(Message::Close(None)),
            Ok(Message::Text("after close".to_string())),
        ]);

        assert_eq!(client.pump(frames).await, SessionEnd::Closed);
        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn pump_stops_on_transport_error() {
        let (client, mut rx) = client();
        let frames = stream::iter(vec![
            Err(WsError::ConnectionClosed),
            Ok(Message::Text("never".to_string())),
        ]);
        assert_eq!(client.pump(frames).await, SessionEnd::Closed);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn pump_shuts_down_when_consumer_is_gone() {
        let (client, rx) = client();
        drop(rx);
        let frames = stream::iter(vec![Ok(Message::Text("orphan".to_string()))]);
        assert_eq!(client.pump(frames).await, SessionEnd::Shutdown);
    }

    #[tokio::test]
    async fn delivers_frames_then_schedules_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(tcp).await.expect("handshake");
            ws.send(Message::Text(r#"{"type":"DONATION"}"#.to_string()))
                .await
                .expect("send");
            let _ = ws.close(None).await;
        });

        let (tx, mut rx) = mpsc::channel(16);
        let url = Url::parse(&format!("ws://{addr}/ws")).expect("url");
        let (client, mut state) = FeedClient::new(url, tx);
        let task = tokio::spawn(client.run());

        let frame = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(
            frame.ok().flatten().as_deref(),
            Some(r#"{"type":"DONATION"}"#)
        );

        let reconnect_scheduled = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let current = *state.borrow_and_update();
                if current
                    == (ConnectionState::Disconnected {
                        retry_delay_ms: Some(1_000),
                    })
                {
                    return true;
                }
                if state.changed().await.is_err() {
                    return false;
                }
            }
        })
        .await;
        assert_eq!(reconnect_scheduled.ok(), Some(true));

        task.abort();
    }
}
