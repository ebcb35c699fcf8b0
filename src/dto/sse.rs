use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{
    session::{PlayerId, SessionId},
    state_machine::SessionState,
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Serialise `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast whenever a session changes state.
pub struct SessionStateEvent {
    pub session_id: SessionId,
    pub state: SessionState,
    pub at_question: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when a player joins a lobby.
pub struct PlayerJoinedEvent {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub name: String,
}
