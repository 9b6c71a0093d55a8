//! JSON event protocol spoken over the realtime websocket

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::core::code::Code;
use crate::core::session::{ConnectionId, GameId};

/// Events the client emits. Framed as `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    CreateGame { secret: Code },
    JoinGame { game_id: String, secret: Code },
    MakeGuess { guess: Code },
}

/// Events the server pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// First frame on every connection.
    Connect { sid: ConnectionId },
    GameCreated { game_id: GameId },
    /// Kept raw so a malformed snapshot can't take the whole frame down.
    GameUpdate(serde_json::Value),
    GameError { message: String },
}

/// Everything a connection can deliver to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Event(ServerEvent),
    Disconnected { reason: String },
}

/// An inbound item tagged with the session epoch its connection belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub epoch: u64,
    pub inbound: Inbound,
}

impl Envelope {
    pub fn event(epoch: u64, event: ServerEvent) -> Self {
        Self { epoch, inbound: Inbound::Event(event) }
    }

    pub fn disconnected(epoch: u64, reason: impl Into<String>) -> Self {
        Self { epoch, inbound: Inbound::Disconnected { reason: reason.into() } }
    }
}

#[derive(Debug, Error)]
#[error("connection is closed")]
pub struct SendError;

/// Handle for queueing outbound events onto a connection's writer task.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    /// A detached outbox plus the receiving end, for tests and adapters.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, event: ClientEvent) -> Result<(), SendError> {
        self.tx.send(event).map_err(|_| SendError)
    }
}
