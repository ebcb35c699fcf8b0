use crate::dto::health::HealthResponse;

/// Sessions live in memory, so a responding server is a healthy one.
pub fn health_status() -> HealthResponse {
    HealthResponse::ok()
}
