use std::time::Duration;

/// Default capacity of each client's outbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default interval between keepalive pings on an idle connection.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(90);

/// Default number of messages replayed to a client right after it joins.
pub const DEFAULT_BACKFILL_LIMIT: usize = 50;

/// Tunables for the realtime hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub queue_capacity: usize,
    pub keepalive_interval: Duration,
    pub backfill_limit: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            keepalive_interval: DEFAULT_KEEPALIVE,
            backfill_limit: DEFAULT_BACKFILL_LIMIT,
        }
    }
}
