pub mod health;
pub mod player;
pub mod quiz;
pub mod session;
pub mod sse;
pub mod validation;
