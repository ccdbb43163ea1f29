//! Web layer for the reachability server.
//!
//! Provides HTTP endpoints for the search form and reachability queries.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
