//! Local UI state derived from the session; what the renderer draws

use crate::core::session::{GuessRecord, SessionContext, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Area {
    #[default]
    Setup,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub area: Area,
    /// Secret/game-id inputs and the create/join buttons.
    pub setup_enabled: bool,
    /// Guess input and button.
    pub guess_enabled: bool,
    /// The single shared message region.
    pub message: String,
    pub game_id_label: Option<String>,
    pub turn_indicator: String,
    pub my_guesses: Vec<String>,
    pub opponent_guesses: Vec<String>,
    pub opponent_secret_label: Option<String>,
    pub outcome: Option<Outcome>,
    /// The line being typed; cleared as soon as an intent is sent.
    pub input: String,
}

impl ViewState {
    /// Fresh page: setup area shown, setup open, guessing closed.
    pub fn new() -> Self {
        Self {
            setup_enabled: true,
            ..Self::default()
        }
    }

    /// Back to a fresh view, keeping whatever is half-typed.
    pub fn reset(&mut self) {
        let input = std::mem::take(&mut self.input);
        *self = Self { input, ..Self::new() };
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

pub fn history_row(index: usize, record: &GuessRecord) -> String {
    format!(
        "Attempt {}: {} -> +{}/-{}",
        index + 1,
        record.guess,
        record.result.plus,
        record.result.minus
    )
}

/// Oldest-first rows, numbered from 1.
pub fn history_rows(records: &[GuessRecord]) -> Vec<String> {
    records.iter().enumerate().map(|(i, r)| history_row(i, r)).collect()
}

pub fn game_id_label(id: &str) -> String {
    format!("Game ID: {id} (share it with your opponent)")
}

pub fn turn_indicator(ctx: &SessionContext) -> String {
    match ctx.status {
        Status::Active if ctx.is_my_turn() => "Your turn".into(),
        Status::Active => "Opponent's turn".into(),
        Status::Waiting => "Waiting for opponent".into(),
        Status::Finished => "Game over".into(),
        Status::Setup => String::new(),
    }
}
