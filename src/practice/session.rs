//! Single-player practice session against the stateless HTTP API.
//!
//! History is newest-first here, unlike the two-player view.

use tracing::{info, warn};

use crate::core::code::{Code, CodeKind};
use crate::core::dispatcher::Dispatch;
use crate::core::session::{GameId, GuessRecord};
use crate::core::view;
use crate::practice::api::{ApiError, GuessResponse, PracticeApi};

pub const RETRY_START: &str = "Could not start a new game. Type 'new' to try again.";
pub const RETRY_GUESS: &str = "Could not reach the server. Please try your guess again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PracticeView {
    pub game_id_label: Option<String>,
    pub guess_enabled: bool,
    pub message: String,
    /// Newest first.
    pub history: Vec<String>,
    pub won: bool,
    pub input: String,
}

pub struct PracticeSession<A: PracticeApi> {
    api: A,
    game_id: Option<GameId>,
    view: PracticeView,
}

impl<A: PracticeApi> PracticeSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            game_id: None,
            view: PracticeView {
                message: "Type 'new' to start a game.".into(),
                ..PracticeView::default()
            },
        }
    }

    pub fn view(&self) -> &PracticeView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut PracticeView {
        &mut self.view
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn start_game(&mut self) -> Dispatch {
        self.game_id = None;
        self.view.guess_enabled = false;
        self.view.game_id_label = None;
        match self.api.start_game() {
            Ok(resp) => {
                info!(game_id = resp.game_id.as_str(), "practice game started");
                self.view.game_id_label = Some(format!("Game ID: {}", resp.game_id));
                self.game_id = Some(resp.game_id);
                self.view.history.clear();
                self.view.won = false;
                self.view.guess_enabled = true;
                self.view.input.clear();
                self.view.message = "New game started. Guess the 3-digit number (all digits differ).".into();
                Dispatch::Sent
            }
            Err(e) => {
                warn!(error = %e, "could not start practice game");
                self.view.message = RETRY_START.into();
                Dispatch::Rejected
            }
        }
    }

    /// Local checks and control lock. Returns the code to send, or `None`
    /// when the guess was refused without a network call.
    pub fn prepare_guess(&mut self, raw: &str) -> Option<Code> {
        if self.game_id.is_none() {
            self.view.message = "Start a new game first (type 'new').".into();
            return None;
        }
        if self.view.won {
            self.view.message = "This game is already won. Type 'new' to play again.".into();
            return None;
        }
        if !self.view.guess_enabled {
            self.view.message = "Please wait for the previous guess.".into();
            return None;
        }
        let code = match Code::parse(raw) {
            Ok(code) => code,
            Err(e) => {
                self.view.message = e.message(CodeKind::Guess);
                return None;
            }
        };
        self.view.guess_enabled = false;
        self.view.input.clear();
        self.view.message = "Sending guess...".into();
        Some(code)
    }

    /// The network round trip for a prepared guess.
    pub fn complete_guess(&mut self, code: &Code) -> Dispatch {
        let Some(game_id) = self.game_id.clone() else {
            return Dispatch::Rejected;
        };
        match self.api.submit_guess(&game_id, code) {
            Ok(resp) => {
                self.record(resp);
                Dispatch::Sent
            }
            Err(ApiError::Rejected { message, .. }) => {
                self.view.message = message;
                self.view.guess_enabled = true;
                Dispatch::Rejected
            }
            Err(ApiError::Transport(e)) => {
                warn!(error = %e, "guess request failed");
                self.view.message = RETRY_GUESS.into();
                self.view.guess_enabled = true;
                Dispatch::Rejected
            }
        }
    }

    pub fn submit_guess(&mut self, raw: &str) -> Dispatch {
        match self.prepare_guess(raw) {
            Some(code) => self.complete_guess(&code),
            None => Dispatch::Rejected,
        }
    }

    fn record(&mut self, resp: GuessResponse) {
        let record = GuessRecord { guess: resp.guess.clone(), result: resp.result };
        let row = view::history_row(resp.attempts.saturating_sub(1) as usize, &record);
        self.view.history.insert(0, row);

        if resp.is_won {
            info!(attempts = resp.attempts, "practice game won");
            self.view.won = true;
            self.view.guess_enabled = false;
            self.view.message = if resp.message.is_empty() {
                format!("You won in {} attempts!", resp.attempts)
            } else {
                format!("You won! {}", resp.message)
            };
        } else {
            self.view.guess_enabled = true;
            self.view.message = if resp.message.is_empty() {
                format!("Result: +{} / -{}", resp.result.plus, resp.result.minus)
            } else {
                resp.message
            };
        }
    }
}
