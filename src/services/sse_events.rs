use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{PlayerJoinedEvent, ServerEvent, SessionStateEvent},
    state::{
        SseHub,
        session::{Player, Session},
    },
};

const EVENT_SESSION_STATE: &str = "session.state";
const EVENT_PLAYER_JOINED: &str = "session.player_joined";

/// Broadcast the state and question position of a session.
pub fn broadcast_session_state(hub: &SseHub, session: &Session) {
    let payload = SessionStateEvent {
        session_id: session.session_id,
        state: session.state,
        at_question: session.at_question,
    };
    send_event(hub, EVENT_SESSION_STATE, &payload);
}

/// Broadcast that a player entered the lobby of a session.
pub fn broadcast_player_joined(hub: &SseHub, session: &Session, player: &Player) {
    let payload = PlayerJoinedEvent {
        session_id: session.session_id,
        player_id: player.player_id,
        name: player.name.clone(),
    };
    send_event(hub, EVENT_PLAYER_JOINED, &payload);
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
