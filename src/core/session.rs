//! Session context for one client and the status state machine.
//!
//! `Setup -> Waiting -> Active -> Finished`, with a reset edge from any state
//! back to `Setup`. `Waiting -> Active` and `Active -> Finished` are only ever
//! taken on a server snapshot.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

/// Opaque match identifier. Servers may send it as text or as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGameId {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawGameId::deserialize(deserializer)? {
            RawGameId::Text(s) => GameId(s),
            RawGameId::Number(n) => GameId(n.to_string()),
        })
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one transport connection; changes on reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerRole {
    Player1,
    Player2,
    #[default]
    Unassigned,
}

impl PlayerRole {
    /// Parses the wire key (`"player1"` / `"player2"`).
    pub fn from_wire(s: &str) -> Self {
        match s {
            "player1" => PlayerRole::Player1,
            "player2" => PlayerRole::Player2,
            _ => PlayerRole::Unassigned,
        }
    }

    pub fn wire_key(self) -> Option<&'static str> {
        match self {
            PlayerRole::Player1 => Some("player1"),
            PlayerRole::Player2 => Some("player2"),
            PlayerRole::Unassigned => None,
        }
    }

    /// With exactly two roles the opponent is always the other one.
    pub fn opponent(self) -> Self {
        match self {
            PlayerRole::Player1 => PlayerRole::Player2,
            PlayerRole::Player2 => PlayerRole::Player1,
            PlayerRole::Unassigned => PlayerRole::Unassigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Setup,
    Waiting,
    Active,
    Finished,
}

/// Status as reported by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportedStatus {
    Waiting,
    Active,
    Finished,
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// Inputs to the status state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Server acknowledged our `create_game`.
    GameCreated,
    /// A full snapshot arrived.
    Snapshot(ReportedStatus),
    /// Disconnect, reconnect or explicit new game.
    Reset,
}

impl Status {
    /// Pure transition function.
    pub fn next(self, event: StatusEvent) -> Status {
        match (self, event) {
            (_, StatusEvent::Reset) => Status::Setup,
            (Status::Setup, StatusEvent::GameCreated) => Status::Waiting,
            // Duplicate acks never move an in-progress game backwards.
            (current, StatusEvent::GameCreated) => current,
            (_, StatusEvent::Snapshot(ReportedStatus::Waiting)) => Status::Waiting,
            (_, StatusEvent::Snapshot(ReportedStatus::Active)) => Status::Active,
            (_, StatusEvent::Snapshot(ReportedStatus::Finished)) => Status::Finished,
            (_, StatusEvent::Snapshot(ReportedStatus::Unrecognized)) => Status::Setup,
        }
    }

    /// Setup controls are the ones relevant in these states.
    pub fn in_setup_area(self) -> bool {
        matches!(self, Status::Setup | Status::Waiting)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuessResult {
    /// Exact matches (right digit, right place).
    pub plus: u8,
    /// Value-only matches (right digit, wrong place).
    pub minus: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guess: String,
    pub result: GuessResult,
}

/// Everything the client knows about the current match.
///
/// Mutated only by the reconciler and the action dispatcher.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub game_id: Option<GameId>,
    pub local_role: PlayerRole,
    /// Set once a snapshot has confirmed `local_role`; until then the
    /// creator's `Player1` is provisional.
    pub role_confirmed: bool,
    pub self_connection_id: Option<ConnectionId>,
    pub turn_holder: Option<ConnectionId>,
    pub status: Status,
    pub guess_history: HashMap<PlayerRole, Vec<GuessRecord>>,
    pub revealed_opponent_secret: Option<String>,
    pub winner: Option<ConnectionId>,
    epoch: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of this context; bumped on every reset so that events from an
    /// older connection can be recognized and dropped.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Clears every field and starts a new epoch.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self { epoch, ..Self::default() };
        info!(epoch, "session reset");
    }

    /// Clears the match but keeps the live connection identity and its
    /// epoch; the connection that delivered the event stays current.
    pub fn reset_game(&mut self) {
        let sid = self.self_connection_id.take();
        *self = Self { epoch: self.epoch, self_connection_id: sid, ..Self::default() };
        info!(epoch = self.epoch, "game cleared");
    }

    pub fn apply(&mut self, event: StatusEvent) {
        let next = self.status.next(event);
        if next != self.status {
            info!(from = ?self.status, to = ?next, "status transition");
        }
        self.status = next;
    }

    pub fn is_connected(&self) -> bool {
        self.self_connection_id.is_some()
    }

    pub fn is_my_turn(&self) -> bool {
        match (&self.turn_holder, &self.self_connection_id) {
            (Some(holder), Some(me)) => holder == me,
            _ => false,
        }
    }

    /// Guess submission eligibility: active game and we hold the turn.
    pub fn can_guess(&self) -> bool {
        self.status == Status::Active && self.is_my_turn()
    }

    pub fn history(&self, role: PlayerRole) -> &[GuessRecord] {
        self.guess_history.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }
}
