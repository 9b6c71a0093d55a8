//! ureq-backed client for the practice HTTP API

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::code::Code;
use crate::core::session::GameId;
use crate::practice::api::{ApiError, ErrorBody, GuessRequest, GuessResponse, NewGameResponse, PracticeApi};

pub struct HttpPracticeApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpPracticeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn games_url(&self) -> String {
        format!("{}/games", self.base_url)
    }

    pub fn guess_url(&self, game_id: &GameId) -> String {
        format!("{}/games/{}/guess", self.base_url, game_id)
    }
}

fn map_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let body: ErrorBody = response.into_json().unwrap_or_default();
            let message = body
                .error
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            warn!(status, message = %message, "request rejected");
            ApiError::Rejected { status, message }
        }
        ureq::Error::Transport(transport) => {
            warn!(error = %transport, "request failed");
            ApiError::Transport(transport.to_string())
        }
    }
}

impl PracticeApi for HttpPracticeApi {
    fn start_game(&mut self) -> Result<NewGameResponse, ApiError> {
        let url = self.games_url();
        debug!(url = %url, "starting practice game");
        let response = self.agent.post(&url).call().map_err(map_error)?;
        response
            .into_json()
            .map_err(|e| ApiError::Transport(format!("unreadable response: {e}")))
    }

    fn submit_guess(&mut self, game_id: &GameId, guess: &Code) -> Result<GuessResponse, ApiError> {
        let url = self.guess_url(game_id);
        debug!(url = %url, guess = guess.as_str(), "submitting guess");
        let response = self
            .agent
            .post(&url)
            .send_json(GuessRequest { guess: guess.clone() })
            .map_err(map_error)?;
        response
            .into_json()
            .map_err(|e| ApiError::Transport(format!("unreadable response: {e}")))
    }
}
