use std::sync::Arc;

use crate::domain::Message;

/// One item in a client's outbound queue.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// A message delivered through the room broadcast.
    Live(Arc<Message>),
    /// History replayed to this client only, right after it joined.
    Backfill(Vec<Message>),
    /// A diagnostic for this client only.
    Error(String),
}
