//! NoteTube server: HTTP surface for the discovery pipeline.

pub mod request_log;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
