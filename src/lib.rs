//! Study Buddy · Quiz Backend
//!
//! Hosts the quiz lifecycle (topic → generation → answers → grading → review →
//! reset) behind an axum HTTP + WebSocket API. Question generation is delegated
//! to a hosted language model through the `ModelGateway` trait.

pub mod config;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod openai;
pub mod protocol;
pub mod quiz;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod util;

pub use routes::build_router;
pub use state::AppState;
