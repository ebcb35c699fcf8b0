/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Lobby, answers, results and chat for players.
pub mod player_service;
/// Quiz definitions and snapshots.
pub mod quiz_service;
/// Session lifecycle driven by quiz hosts.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
