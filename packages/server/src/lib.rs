//! ClassChat real-time hub.
//!
//! Authenticated school members subscribe to one class room per WebSocket
//! connection, post messages that are authorized, persisted and fanned out to
//! every live member of the class, and receive recent history on join.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerArgs;
pub use ui::run;
