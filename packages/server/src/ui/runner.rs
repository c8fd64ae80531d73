//! Router construction and server entry point.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerArgs,
    infrastructure::{
        auth::JwtCredentialValidator,
        repository::{DirectoryError, SchoolDirectory},
    },
};

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("failed to load school directory: {0}")]
    Directory(#[from] DirectoryError),
}

/// Build the HTTP + WebSocket router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/ws/chat/{class_id}", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the server with the given configuration.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let directory = match &args.directory {
        Some(path) => {
            let directory = SchoolDirectory::from_json_file(path)?;
            tracing::info!(
                path = %path.display(),
                users = directory.users.len(),
                classes = directory.classes.len(),
                "Loaded school directory"
            );
            directory
        }
        None => {
            tracing::warn!("No school directory given, every class starts empty");
            SchoolDirectory::default()
        }
    };

    let hub = args.hub_config();
    let credentials = Arc::new(JwtCredentialValidator::new(&args.jwt_secret));
    let state = Arc::new(AppState::in_memory(credentials, &directory, hub));

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", addr);

    serve(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}
