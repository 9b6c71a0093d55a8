//! Request/response contract of the single-player HTTP API

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::code::Code;
use crate::core::session::{GameId, GuessResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx answer; `message` is the server's `error` text.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Could not talk to the server or could not read its answer.
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub game_id: GameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub guess: Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResponse {
    #[serde(default)]
    pub message: String,
    pub guess: String,
    pub attempts: u32,
    pub result: GuessResult,
    pub is_won: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /games` and `POST /games/{id}/guess`.
pub trait PracticeApi {
    fn start_game(&mut self) -> Result<NewGameResponse, ApiError>;

    fn submit_guess(&mut self, game_id: &GameId, guess: &Code) -> Result<GuessResponse, ApiError>;
}
