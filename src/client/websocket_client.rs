//! WebSocket connection adapter for the realtime client

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::core::websocket::{ClientEvent, Envelope, Outbox, ServerEvent};

/// One live connection. Dropping it tears both tasks down.
pub struct Connection {
    outbox: Outbox,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Connection {
    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// Opens `url` and starts pumping frames. Everything read is delivered to
/// `inbound` tagged with `epoch`, in arrival order; the stream always ends
/// with exactly one `Disconnected`.
pub async fn connect(url: &str, epoch: u64, inbound: mpsc::UnboundedSender<Envelope>) -> Result<Connection> {
    let (ws_stream, _) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    info!(url, epoch, "websocket open");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();

    let writer = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "failed to encode outbound event");
                    continue;
                }
            };
            if let Err(e) = ws_sender.send(Message::Text(json)).await {
                // the reader will see the broken socket and report it
                warn!(error = %e, "websocket send failed");
                break;
            }
        }
    });

    let reader = tokio::spawn(async move {
        let reason = loop {
            match ws_receiver.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => {
                        debug!(?event, "received");
                        if inbound.send(Envelope::event(epoch, event)).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!(error = %e, frame = %text, "skipping unrecognized frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|f| f.reason.to_string())
                        .filter(|r| !r.is_empty())
                        .unwrap_or_else(|| "server closed the connection".into());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break e.to_string(),
                None => break "connection closed".to_string(),
            }
        };
        let _ = inbound.send(Envelope::disconnected(epoch, reason));
    });

    Ok(Connection { outbox: Outbox::new(out_tx), reader, writer })
}

/// Accepts `host:port` as shorthand for `ws://host:port`.
pub fn normalize_ws_url(addr: &str) -> String {
    if addr.starts_with("ws://") || addr.starts_with("wss://") {
        addr.to_string()
    } else {
        format!("ws://{addr}")
    }
}
