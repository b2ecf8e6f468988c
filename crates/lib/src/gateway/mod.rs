//! Gateway: the webhook HTTP server and the per-event answer pipeline.

mod server;

pub use server::{router, run_server, AppState, BACKEND_UNAVAILABLE, GENERATION_FALLBACK};
