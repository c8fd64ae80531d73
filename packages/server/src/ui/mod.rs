//! WebSocket chat server implementation.

mod handler;
mod runner;
pub mod session;
mod signal;
pub mod state;

pub use runner::{ServerError, build_router, run, serve};
