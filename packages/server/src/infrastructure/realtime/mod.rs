//! Realtime hub: per-class rooms and the registry that owns them.

pub mod config;
pub mod outbound;
pub mod registry;
pub mod room;

pub use config::HubConfig;
pub use outbound::Outbound;
pub use registry::RoomRegistry;
pub use room::{Member, RoomHandle};
