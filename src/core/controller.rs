//! Client game view controller: one session, one view, one outbox

use rand::Rng;
use tracing::{debug, warn};

use crate::core::code::Code;
use crate::core::command::{Command, REALTIME_HELP};
use crate::core::dispatcher::{self, Dispatch};
use crate::core::reconciler;
use crate::core::session::SessionContext;
use crate::core::view::ViewState;
use crate::core::websocket::{Envelope, Inbound, Outbox, ServerEvent};

/// What the transport layer should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Open a fresh connection under the current epoch.
    Connect,
    Quit,
}

#[derive(Debug)]
pub struct GameController {
    session: SessionContext,
    view: ViewState,
    outbox: Option<Outbox>,
}

impl GameController {
    pub fn new() -> Self {
        let mut view = ViewState::new();
        view.setup_enabled = false;
        view.set_message("Connecting to the server...");
        Self { session: SessionContext::new(), view, outbox: None }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch()
    }

    /// Binds the outbox of a connection opened under `epoch`. A connection
    /// opened for an older epoch is ignored.
    pub fn attach(&mut self, epoch: u64, outbox: Outbox) -> bool {
        if epoch != self.session.epoch() {
            warn!(epoch, current = self.session.epoch(), "not attaching stale connection");
            return false;
        }
        self.outbox = Some(outbox);
        true
    }

    pub fn connect_failed(&mut self, reason: &str) {
        warn!(reason, "connection attempt failed");
        self.outbox = None;
        self.view.setup_enabled = false;
        self.view
            .set_message(format!("Could not reach the server ({reason}). Type 'reconnect' to try again."));
    }

    /// Applies one inbound item in arrival order. Returns `false` when the
    /// envelope belongs to an older session and was dropped.
    pub fn handle(&mut self, envelope: Envelope) -> bool {
        if envelope.epoch != self.session.epoch() {
            debug!(epoch = envelope.epoch, current = self.session.epoch(), "dropping stale envelope");
            return false;
        }
        let (ctx, view) = (&mut self.session, &mut self.view);
        match envelope.inbound {
            Inbound::Event(ServerEvent::Connect { sid }) => dispatcher::on_connect(ctx, view, sid),
            Inbound::Event(ServerEvent::GameCreated { game_id }) => {
                dispatcher::on_game_created(ctx, view, game_id)
            }
            Inbound::Event(ServerEvent::GameUpdate(raw)) => reconciler::apply_raw(ctx, view, raw),
            Inbound::Event(ServerEvent::GameError { message }) => dispatcher::on_error(ctx, view, &message),
            Inbound::Disconnected { reason } => {
                dispatcher::on_disconnect(ctx, view, &reason);
                self.outbox = None;
            }
        }
        true
    }

    pub fn create_game(&mut self, secret: &str) -> Dispatch {
        dispatcher::create_game(&mut self.session, &mut self.view, self.outbox.as_ref(), secret)
    }

    pub fn join_game(&mut self, game_id: &str, secret: &str) -> Dispatch {
        dispatcher::join_game(&mut self.session, &mut self.view, self.outbox.as_ref(), game_id, secret)
    }

    pub fn submit_guess(&mut self, guess: &str) -> Dispatch {
        dispatcher::submit_guess(&mut self.session, &mut self.view, self.outbox.as_ref(), guess)
    }

    /// Drops the session and its connection; the caller reconnects.
    pub fn restart(&mut self) {
        self.session.reset();
        self.outbox = None;
        self.view.reset();
        self.view.setup_enabled = false;
        self.view.set_message("Connecting to the server...");
    }

    pub fn execute<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> Action {
        match command {
            Command::Create(secret) => {
                let secret = secret.unwrap_or_else(|| Code::random(rng).to_string());
                self.create_game(&secret);
            }
            Command::Join { game_id, secret } => {
                self.join_game(&game_id, &secret);
            }
            Command::Guess(guess) => {
                self.submit_guess(&guess);
            }
            Command::New | Command::Reconnect => {
                self.restart();
                self.view.input.clear();
                return Action::Connect;
            }
            Command::Help => {
                self.view.input.clear();
                self.view.set_message(REALTIME_HELP);
            }
            Command::Quit => return Action::Quit,
        }
        Action::None
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}
