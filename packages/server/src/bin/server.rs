//! ClassChat real-time hub server.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... cargo run --bin classchat-server -- --directory school.json
//! ```

use clap::Parser;
use classchat_server::ServerArgs;
use classchat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = classchat_server::run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
