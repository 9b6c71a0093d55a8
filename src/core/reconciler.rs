//! Maps inbound snapshots onto the local session and view.
//!
//! Each snapshot replaces everything it describes, so applying the same one
//! twice leaves the same observable state and history lists always equal the
//! latest snapshot's lists.

use tracing::{info, warn};

use crate::core::session::{ReportedStatus, SessionContext, Status, StatusEvent};
use crate::core::snapshot::Snapshot;
use crate::core::view::{self, Area, Outcome, ViewState};

pub const UNEXPECTED_STATE: &str = "Unexpected game state received. Create a game or join one.";

/// Parses and applies a raw `game_update` payload. Never panics; a payload
/// that is not a snapshot takes the same fallback as an unrecognized status.
pub fn apply_raw(ctx: &mut SessionContext, view: &mut ViewState, raw: serde_json::Value) {
    match Snapshot::from_value(raw) {
        Ok(snapshot) => apply(ctx, view, &snapshot),
        Err(e) => {
            warn!(error = %e, "dropping malformed snapshot");
            fall_back_to_setup(ctx, view);
        }
    }
}

pub fn apply(ctx: &mut SessionContext, view: &mut ViewState, snapshot: &Snapshot) {
    if snapshot.status == ReportedStatus::Unrecognized {
        warn!(?snapshot.game_id, "snapshot without a recognized status");
        fall_back_to_setup(ctx, view);
        return;
    }

    adopt_identity(ctx, snapshot);
    ctx.apply(StatusEvent::Snapshot(snapshot.status));
    ctx.turn_holder = snapshot.turn_holder.clone();

    let mine = ctx.local_role;
    ctx.guess_history.clear();
    if mine.wire_key().is_some() {
        ctx.guess_history.insert(mine, snapshot.guesses_for(mine));
        ctx.guess_history.insert(mine.opponent(), snapshot.guesses_for(mine.opponent()));
    }

    if ctx.status == Status::Finished {
        ctx.revealed_opponent_secret = snapshot.opponent_secret.clone();
        ctx.winner = snapshot.winner.clone();
    } else {
        ctx.revealed_opponent_secret = None;
        ctx.winner = None;
    }

    refresh(ctx, view);
}

/// Game id and role from the server overwrite local placeholders. Once a
/// snapshot has confirmed our role for a game it stays fixed for that game.
fn adopt_identity(ctx: &mut SessionContext, snapshot: &Snapshot) {
    let same_game = match (&ctx.game_id, &snapshot.game_id) {
        (Some(current), Some(incoming)) => current == incoming,
        (_, None) => true,
        (None, Some(_)) => false,
    };
    if !same_game {
        ctx.role_confirmed = false;
    }
    if let Some(id) = &snapshot.game_id {
        ctx.game_id = Some(id.clone());
    }

    let role = snapshot.role();
    if role.wire_key().is_none() {
        return;
    }
    if !ctx.role_confirmed {
        if ctx.local_role != role {
            info!(?role, "role assigned by server");
        }
        ctx.local_role = role;
        ctx.role_confirmed = true;
    } else if ctx.local_role != role {
        warn!(kept = ?ctx.local_role, received = ?role, "ignoring role change within a game");
    }
}

fn fall_back_to_setup(ctx: &mut SessionContext, view: &mut ViewState) {
    ctx.reset_game();
    view.reset();
    view.setup_enabled = ctx.is_connected();
    view.set_message(UNEXPECTED_STATE);
}

/// Rebuilds the view from the session after a snapshot.
pub fn refresh(ctx: &SessionContext, view: &mut ViewState) {
    view.game_id_label = ctx.game_id.as_ref().map(|id| view::game_id_label(id.as_str()));
    view.turn_indicator = view::turn_indicator(ctx);

    match ctx.status {
        Status::Setup => {
            view.area = Area::Setup;
            view.setup_enabled = ctx.is_connected();
            view.guess_enabled = false;
        }
        Status::Waiting => {
            view.area = Area::Setup;
            view.setup_enabled = false;
            view.guess_enabled = false;
            view.set_message("Waiting for opponent...");
        }
        Status::Active | Status::Finished => {
            view.area = Area::Game;
            view.setup_enabled = false;
            view.my_guesses = view::history_rows(ctx.history(ctx.local_role));
            view.opponent_guesses = view::history_rows(ctx.history(ctx.local_role.opponent()));

            if ctx.status == Status::Finished {
                // The winner id is the only win signal.
                let won = matches!(
                    (&ctx.winner, &ctx.self_connection_id),
                    (Some(w), Some(me)) if w == me
                );
                view.outcome = Some(if won { Outcome::Won } else { Outcome::Lost });
                view.set_message(if won { "Congratulations, you WON!" } else { "You lost." });
                view.opponent_secret_label = ctx
                    .revealed_opponent_secret
                    .as_ref()
                    .map(|s| format!("Opponent's secret: {s}"));
                view.guess_enabled = false;
            } else {
                view.outcome = None;
                view.opponent_secret_label = None;
                view.guess_enabled = ctx.can_guess();
                view.set_message(if ctx.is_my_turn() {
                    "Your turn!"
                } else {
                    "Waiting for opponent's move..."
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{ConnectionId, GameId, PlayerRole};
    use serde_json::json;

    fn connected(sid: &str) -> (SessionContext, ViewState) {
        let mut ctx = SessionContext::new();
        ctx.self_connection_id = Some(ConnectionId::new(sid));
        (ctx, ViewState::new())
    }

    fn active(turn: &str) -> serde_json::Value {
        json!({
            "game_id": "G1",
            "your_player_id": "player1",
            "current_turn_sid": turn,
            "status": "active",
            "guesses": {
                "player1": [{"guess": "456", "result": {"plus": 1, "minus": 1}}],
                "player2": [{"guess": "102", "result": {"plus": 0, "minus": 0}}]
            }
        })
    }

    #[test]
    fn active_snapshot_on_my_turn_enables_guessing() {
        let (mut ctx, mut view) = connected("abc");
        apply_raw(&mut ctx, &mut view, active("abc"));
        assert_eq!(ctx.status, Status::Active);
        assert_eq!(view.area, Area::Game);
        assert!(view.guess_enabled);
        assert_eq!(view.my_guesses, vec!["Attempt 1: 456 -> +1/-1"]);
        assert_eq!(view.opponent_guesses, vec!["Attempt 1: 102 -> +0/-0"]);
        assert_eq!(view.turn_indicator, "Your turn");
    }

    #[test]
    fn opponent_history_is_keyed_by_the_other_role() {
        let (mut ctx, mut view) = connected("abc");
        let mut snap = active("xyz");
        snap["your_player_id"] = json!("player2");
        apply_raw(&mut ctx, &mut view, snap);
        assert_eq!(ctx.local_role, PlayerRole::Player2);
        assert_eq!(view.my_guesses, vec!["Attempt 1: 102 -> +0/-0"]);
        assert_eq!(view.opponent_guesses, vec!["Attempt 1: 456 -> +1/-1"]);
        assert!(!view.guess_enabled);
    }

    #[test]
    fn finished_snapshot_reveals_secret_and_decides_by_winner_id() {
        let (mut ctx, mut view) = connected("abc");
        let mut snap = active("abc");
        snap["status"] = json!("finished");
        snap["winner_sid"] = json!("abc");
        snap["opponent_secret"] = json!("987");
        apply_raw(&mut ctx, &mut view, snap.clone());
        assert_eq!(view.outcome, Some(Outcome::Won));
        assert_eq!(view.opponent_secret_label.as_deref(), Some("Opponent's secret: 987"));
        assert!(!view.guess_enabled);

        let (mut ctx, mut view) = connected("abc");
        snap["winner_sid"] = json!("xyz");
        apply_raw(&mut ctx, &mut view, snap);
        assert_eq!(view.outcome, Some(Outcome::Lost));
        assert_eq!(view.message, "You lost.");
    }

    #[test]
    fn finished_without_secret_leaves_label_empty() {
        let (mut ctx, mut view) = connected("abc");
        let mut snap = active("abc");
        snap["status"] = json!("finished");
        apply_raw(&mut ctx, &mut view, snap);
        assert!(view.opponent_secret_label.is_none());
        assert_eq!(view.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn unknown_status_falls_back_to_setup() {
        let (mut ctx, mut view) = connected("abc");
        apply_raw(&mut ctx, &mut view, active("abc"));
        apply_raw(&mut ctx, &mut view, json!({"game_id": "G1", "status": "exploded"}));
        assert_eq!(ctx.status, Status::Setup);
        assert!(ctx.game_id.is_none());
        assert_eq!(view.area, Area::Setup);
        assert!(view.setup_enabled);
        assert!(!view.guess_enabled);
        assert_eq!(view.message, UNEXPECTED_STATE);
    }

    #[test]
    fn non_object_payload_falls_back_to_setup() {
        let (mut ctx, mut view) = connected("abc");
        apply_raw(&mut ctx, &mut view, json!([1, 2, 3]));
        assert_eq!(ctx.status, Status::Setup);
        assert_eq!(view.message, UNEXPECTED_STATE);
    }

    #[test]
    fn confirmed_role_is_not_replaced_within_a_game() {
        let (mut ctx, mut view) = connected("abc");
        apply_raw(&mut ctx, &mut view, active("abc"));
        let mut snap = active("abc");
        snap["your_player_id"] = json!("player2");
        apply_raw(&mut ctx, &mut view, snap);
        assert_eq!(ctx.local_role, PlayerRole::Player1);
    }

    #[test]
    fn provisional_role_is_overwritten_by_server() {
        let (mut ctx, mut view) = connected("abc");
        ctx.game_id = Some(GameId::new("G1"));
        ctx.local_role = PlayerRole::Player1;
        let mut snap = active("abc");
        snap["your_player_id"] = json!("player2");
        apply_raw(&mut ctx, &mut view, snap);
        assert_eq!(ctx.local_role, PlayerRole::Player2);
        assert!(ctx.role_confirmed);
    }

    #[test]
    fn waiting_snapshot_keeps_setup_locked() {
        let (mut ctx, mut view) = connected("abc");
        apply_raw(
            &mut ctx,
            &mut view,
            json!({"game_id": "G9", "your_player_id": "player1", "status": "waiting"}),
        );
        assert_eq!(ctx.status, Status::Waiting);
        assert_eq!(view.area, Area::Setup);
        assert!(!view.setup_enabled);
        assert_eq!(view.turn_indicator, "Waiting for opponent");
    }
}
