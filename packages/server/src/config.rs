//! Command-line and environment configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::infrastructure::realtime::{
    HubConfig,
    config::{DEFAULT_BACKFILL_LIMIT, DEFAULT_QUEUE_CAPACITY},
};

/// ClassChat real-time hub
#[derive(Debug, Clone, Parser)]
#[command(name = "classchat-server", version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "CLASSCHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Shared secret used to verify HS256 access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// JSON file with the users, classes and enrollments to serve
    #[arg(long, env = "CLASSCHAT_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Capacity of each client's outbound queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, value_parser = parse_positive)]
    pub queue_capacity: usize,

    /// Seconds of write inactivity before a keepalive ping
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u64).range(1..))]
    pub keepalive_secs: u64,

    /// Number of recent messages replayed on join
    #[arg(long, default_value_t = DEFAULT_BACKFILL_LIMIT)]
    pub backfill_limit: usize,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "CLASSCHAT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl ServerArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            queue_capacity: self.queue_capacity.max(1),
            keepalive_interval: Duration::from_secs(self.keepalive_secs.max(1)),
            backfill_limit: self.backfill_limit,
        }
    }
}
