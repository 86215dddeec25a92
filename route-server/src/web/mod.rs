//! HTTP API layer.
//!
//! A thin axum surface over the plan orchestrator: request validation and
//! error mapping live in the core; this layer only translates between
//! HTTP and domain types.

mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppPlanner, AppState};
