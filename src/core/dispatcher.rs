//! Outbound user intents and the non-snapshot inbound signals.
//!
//! Every intent validates locally first; a rejected intent makes no network
//! call and leaves its controls enabled. A sent intent locks its controls
//! until the server answers with an ack, a snapshot or an error.

use tracing::{debug, info, warn};

use crate::core::code::{Code, CodeKind};
use crate::core::reconciler;
use crate::core::session::{ConnectionId, GameId, PlayerRole, SessionContext, Status, StatusEvent};
use crate::core::view::ViewState;
use crate::core::websocket::{ClientEvent, Outbox};

pub const NOT_CONNECTED: &str = "You are not connected to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    Rejected,
}

fn reject(view: &mut ViewState, message: impl Into<String>) -> Dispatch {
    view.set_message(message);
    Dispatch::Rejected
}

fn send(ctx: &SessionContext, outbox: Option<&Outbox>, event: ClientEvent) -> bool {
    if !ctx.is_connected() {
        return false;
    }
    let Some(outbox) = outbox else {
        return false;
    };
    debug!(?event, "sending");
    match outbox.send(event) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "outbound event dropped");
            false
        }
    }
}

pub fn create_game(
    ctx: &mut SessionContext,
    view: &mut ViewState,
    outbox: Option<&Outbox>,
    secret: &str,
) -> Dispatch {
    if !view.setup_enabled {
        return reject(view, "Game setup is locked right now.");
    }
    let secret = match Code::parse(secret) {
        Ok(code) => code,
        Err(e) => return reject(view, e.message(CodeKind::Secret)),
    };
    let shown = secret.to_string();
    if !send(ctx, outbox, ClientEvent::CreateGame { secret }) {
        return reject(view, NOT_CONNECTED);
    }
    view.setup_enabled = false;
    view.input.clear();
    view.set_message(format!("Creating game (your secret is {shown})..."));
    Dispatch::Sent
}

pub fn join_game(
    ctx: &mut SessionContext,
    view: &mut ViewState,
    outbox: Option<&Outbox>,
    game_id: &str,
    secret: &str,
) -> Dispatch {
    if !view.setup_enabled {
        return reject(view, "Game setup is locked right now.");
    }
    let secret = match Code::parse(secret) {
        Ok(code) => code,
        Err(e) => return reject(view, e.message(CodeKind::Secret)),
    };
    let game_id = game_id.trim();
    if game_id.is_empty() {
        return reject(view, "Please enter a game ID to join.");
    }
    let event = ClientEvent::JoinGame { game_id: game_id.to_string(), secret };
    if !send(ctx, outbox, event) {
        return reject(view, NOT_CONNECTED);
    }
    view.setup_enabled = false;
    view.input.clear();
    view.set_message("Join request sent...");
    Dispatch::Sent
}

pub fn submit_guess(
    ctx: &mut SessionContext,
    view: &mut ViewState,
    outbox: Option<&Outbox>,
    guess: &str,
) -> Dispatch {
    if !view.guess_enabled {
        let message = match ctx.status {
            Status::Active if !ctx.is_my_turn() => "It's not your turn!",
            Status::Active => "Your last guess is still being processed.",
            _ => "You need an active game and it must be your turn to guess.",
        };
        return reject(view, message);
    }
    let guess = match Code::parse(guess) {
        Ok(code) => code,
        Err(e) => return reject(view, e.message(CodeKind::Guess)),
    };
    if !ctx.can_guess() {
        return reject(view, "It's not your turn!");
    }
    if !send(ctx, outbox, ClientEvent::MakeGuess { guess }) {
        return reject(view, NOT_CONNECTED);
    }
    view.guess_enabled = false;
    view.input.clear();
    view.set_message("Sending guess...");
    Dispatch::Sent
}

pub fn on_connect(ctx: &mut SessionContext, view: &mut ViewState, sid: ConnectionId) {
    info!(sid = sid.as_str(), "connected");
    ctx.reset_game();
    ctx.self_connection_id = Some(sid);
    view.reset();
    view.set_message("Create a game or join one.");
}

pub fn on_disconnect(ctx: &mut SessionContext, view: &mut ViewState, reason: &str) {
    info!(reason, "disconnected");
    ctx.reset();
    view.reset();
    view.setup_enabled = false;
    view.set_message("Connection to the server was lost. Type 'reconnect' to try again.");
}

/// The creator is Player1 by convention; the role stays provisional until a
/// snapshot confirms it. An ack while Waiting (create retried after an error)
/// replaces the pending game.
pub fn on_game_created(ctx: &mut SessionContext, view: &mut ViewState, game_id: GameId) {
    if !ctx.status.in_setup_area() {
        warn!(game_id = game_id.as_str(), status = ?ctx.status, "ignoring game_created during a match");
        return;
    }
    info!(game_id = game_id.as_str(), replaced = ?ctx.game_id, "game created");
    ctx.game_id = Some(game_id);
    ctx.local_role = PlayerRole::Player1;
    ctx.role_confirmed = false;
    ctx.apply(StatusEvent::GameCreated);
    reconciler::refresh(ctx, view);
    view.set_message("Game created. Waiting for opponent...");
}

/// Shows the server's message and reopens what the current status allows.
/// Never changes status.
pub fn on_error(ctx: &mut SessionContext, view: &mut ViewState, message: &str) {
    warn!(message, status = ?ctx.status, "server reported an error");
    view.set_message(format!("Error: {message}"));
    match ctx.status {
        Status::Setup | Status::Waiting => view.setup_enabled = ctx.is_connected(),
        Status::Active => view.guess_enabled = ctx.can_guess(),
        Status::Finished => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::Area;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn connected() -> (SessionContext, ViewState, Outbox, UnboundedReceiver<ClientEvent>) {
        let mut ctx = SessionContext::new();
        let mut view = ViewState::new();
        on_connect(&mut ctx, &mut view, ConnectionId::new("abc"));
        let (outbox, rx) = Outbox::channel();
        (ctx, view, outbox, rx)
    }

    fn make_active(ctx: &mut SessionContext, view: &mut ViewState, turn: &str) {
        ctx.game_id = Some(GameId::new("G1"));
        ctx.local_role = PlayerRole::Player1;
        ctx.status = Status::Active;
        ctx.turn_holder = Some(ConnectionId::new(turn));
        reconciler::refresh(ctx, view);
    }

    #[test]
    fn invalid_secret_is_not_sent() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        assert_eq!(create_game(&mut ctx, &mut view, Some(&outbox), "112"), Dispatch::Rejected);
        assert!(rx.try_recv().is_err());
        assert!(view.setup_enabled);
        assert_eq!(view.message, "The digits of the secret number must be different.");
    }

    #[test]
    fn create_locks_setup() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        assert_eq!(create_game(&mut ctx, &mut view, Some(&outbox), "123"), Dispatch::Sent);
        assert!(!view.setup_enabled);
        assert_eq!(
            rx.try_recv().unwrap(),
            ClientEvent::CreateGame { secret: Code::parse("123").unwrap() }
        );
        // second click is refused locally
        assert_eq!(create_game(&mut ctx, &mut view, Some(&outbox), "123"), Dispatch::Rejected);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn join_requires_game_id() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        assert_eq!(join_game(&mut ctx, &mut view, Some(&outbox), "  ", "123"), Dispatch::Rejected);
        assert_eq!(view.message, "Please enter a game ID to join.");
        assert!(rx.try_recv().is_err());
        assert!(view.setup_enabled);

        assert_eq!(join_game(&mut ctx, &mut view, Some(&outbox), "G1", "123"), Dispatch::Sent);
        assert!(!view.setup_enabled);
        assert!(matches!(rx.try_recv().unwrap(), ClientEvent::JoinGame { game_id, .. } if game_id == "G1"));
    }

    #[test]
    fn not_connected_is_reported() {
        let mut ctx = SessionContext::new();
        let mut view = ViewState::new();
        assert_eq!(create_game(&mut ctx, &mut view, None, "123"), Dispatch::Rejected);
        assert_eq!(view.message, NOT_CONNECTED);
    }

    #[test]
    fn guess_out_of_turn_is_refused() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        make_active(&mut ctx, &mut view, "xyz");
        assert_eq!(submit_guess(&mut ctx, &mut view, Some(&outbox), "456"), Dispatch::Rejected);
        assert_eq!(view.message, "It's not your turn!");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn guess_on_my_turn_locks_and_clears_input() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        make_active(&mut ctx, &mut view, "abc");
        view.input = "456".into();
        assert_eq!(submit_guess(&mut ctx, &mut view, Some(&outbox), "456"), Dispatch::Sent);
        assert!(!view.guess_enabled);
        assert!(view.input.is_empty());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn invalid_guess_keeps_control_enabled() {
        let (mut ctx, mut view, outbox, mut rx) = connected();
        make_active(&mut ctx, &mut view, "abc");
        view.input = "12a".into();
        assert_eq!(submit_guess(&mut ctx, &mut view, Some(&outbox), "12a"), Dispatch::Rejected);
        assert!(view.guess_enabled);
        assert_eq!(view.input, "12a");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn error_reopens_setup_without_changing_status() {
        let (mut ctx, mut view, outbox, _rx) = connected();
        join_game(&mut ctx, &mut view, Some(&outbox), "NOPE", "123");
        on_error(&mut ctx, &mut view, "Game not found");
        assert_eq!(view.message, "Error: Game not found");
        assert!(view.setup_enabled);
        assert_eq!(ctx.status, Status::Setup);
    }

    #[test]
    fn error_while_active_follows_turn_rule() {
        let (mut ctx, mut view, outbox, _rx) = connected();
        make_active(&mut ctx, &mut view, "abc");
        submit_guess(&mut ctx, &mut view, Some(&outbox), "456");
        assert!(!view.guess_enabled);
        on_error(&mut ctx, &mut view, "Invalid guess");
        assert!(view.guess_enabled);
        assert!(!view.setup_enabled);
        assert_eq!(ctx.status, Status::Active);
    }

    #[test]
    fn game_created_moves_to_waiting() {
        let (mut ctx, mut view, outbox, _rx) = connected();
        create_game(&mut ctx, &mut view, Some(&outbox), "123");
        on_game_created(&mut ctx, &mut view, GameId::new("G1"));
        assert_eq!(ctx.status, Status::Waiting);
        assert_eq!(ctx.local_role, PlayerRole::Player1);
        assert!(!ctx.role_confirmed);
        assert!(!view.setup_enabled);
        assert_eq!(view.area, Area::Setup);
        assert_eq!(view.game_id_label.as_deref(), Some("Game ID: G1 (share it with your opponent)"));
    }

    #[test]
    fn create_retried_after_error_adopts_new_game() {
        let (mut ctx, mut view, outbox, _rx) = connected();
        create_game(&mut ctx, &mut view, Some(&outbox), "123");
        on_game_created(&mut ctx, &mut view, GameId::new("G1"));
        on_error(&mut ctx, &mut view, "Game creation failed");
        assert!(view.setup_enabled);

        assert_eq!(create_game(&mut ctx, &mut view, Some(&outbox), "456"), Dispatch::Sent);
        on_game_created(&mut ctx, &mut view, GameId::new("G2"));
        assert_eq!(ctx.status, Status::Waiting);
        assert_eq!(ctx.game_id, Some(GameId::new("G2")));
        assert_eq!(ctx.local_role, PlayerRole::Player1);
        assert!(!ctx.role_confirmed);
        assert!(!view.setup_enabled);
        assert_eq!(view.game_id_label.as_deref(), Some("Game ID: G2 (share it with your opponent)"));
    }

    #[test]
    fn game_created_is_ignored_during_a_match() {
        let (mut ctx, mut view, _outbox, _rx) = connected();
        make_active(&mut ctx, &mut view, "abc");
        on_game_created(&mut ctx, &mut view, GameId::new("G9"));
        assert_eq!(ctx.status, Status::Active);
        assert_ne!(ctx.game_id, Some(GameId::new("G9")));
    }

    #[test]
    fn disconnect_clears_everything_and_locks_setup() {
        let (mut ctx, mut view, _outbox, _rx) = connected();
        make_active(&mut ctx, &mut view, "abc");
        let epoch = ctx.epoch();
        on_disconnect(&mut ctx, &mut view, "transport close");
        assert_eq!(ctx.status, Status::Setup);
        assert!(ctx.game_id.is_none());
        assert!(!ctx.is_connected());
        assert!(ctx.epoch() > epoch);
        assert!(!view.setup_enabled);
        assert!(!view.guess_enabled);
    }
}
