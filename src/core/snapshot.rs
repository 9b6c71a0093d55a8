//! Wire shape of a `game_update` snapshot

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::session::{ConnectionId, GameId, GuessRecord, PlayerRole, ReportedStatus};

#[derive(Debug, Error)]
#[error("malformed snapshot: {0}")]
pub struct SnapshotError(#[from] serde_json::Error);

/// Complete authoritative game state pushed by the server. Never a delta.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default, rename = "your_player_id")]
    pub assigned_role: Option<String>,
    #[serde(default, rename = "current_turn_sid")]
    pub turn_holder: Option<ConnectionId>,
    #[serde(default)]
    pub status: ReportedStatus,
    #[serde(default)]
    pub guesses: HashMap<String, Vec<GuessRecord>>,
    #[serde(default, rename = "winner_sid")]
    pub winner: Option<ConnectionId>,
    #[serde(default)]
    pub opponent_secret: Option<String>,
}

impl Snapshot {
    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn role(&self) -> PlayerRole {
        self.assigned_role
            .as_deref()
            .map(PlayerRole::from_wire)
            .unwrap_or_default()
    }

    /// Guesses for `role`, empty when the role or the key is missing.
    pub fn guesses_for(&self, role: PlayerRole) -> Vec<GuessRecord> {
        role.wire_key()
            .and_then(|key| self.guesses.get(key))
            .cloned()
            .unwrap_or_default()
    }
}
