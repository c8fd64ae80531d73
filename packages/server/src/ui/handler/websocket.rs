//! WebSocket access gateway.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use futures_util::stream::StreamExt;

use crate::{
    domain::ClassId,
    infrastructure::dto::websocket::Envelope,
    ui::{
        session::{ClientSession, ConnectionState, Lifecycle},
        state::AppState,
    },
    usecase::ConnectError,
};

/// `GET /ws/chat/{class_id}`
///
/// Identity failures are answered before the upgrade. A caller who is not a
/// member of the class gets the upgrade, one error envelope and a close.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(raw_class_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let class_id = match raw_class_id.parse::<ClassId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid class id '{}': {}", raw_class_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let lifecycle = Arc::new(Lifecycle::new());
    lifecycle.advance(ConnectionState::Authorizing);

    // A header that is not visible ASCII is treated as malformed
    let authorization = headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    match state.admit.execute(authorization, class_id).await {
        Ok(identity) => {
            tracing::info!(
                %class_id,
                user_id = %identity.user_id,
                name = %identity.display_name,
                "Client admitted"
            );
            let room = state.registry.get_or_create(class_id).await;
            let session = ClientSession::new(identity, room, &state.hub, lifecycle);
            let services = state.services.clone();
            Ok(ws.on_upgrade(move |socket| async move {
                let (sink, stream) = socket.split();
                session.run(sink, stream, services).await;
            }))
        }
        Err(ConnectError::Unauthenticated(e)) => {
            tracing::warn!(%class_id, "Rejecting unauthenticated connection: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(ConnectError::MembershipLookup(e)) => {
            tracing::error!(%class_id, "Membership lookup failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(ConnectError::Forbidden) => {
            lifecycle.advance(ConnectionState::Closed);
            Ok(ws.on_upgrade(reject_socket))
        }
    }
}

/// Tell the client why and close without ever joining a room.
async fn reject_socket(mut socket: WebSocket) {
    let reason = ConnectError::Forbidden.to_string();
    match Envelope::Error(&reason).to_json() {
        Ok(json) => {
            if let Err(e) = socket.send(Message::Text(json.into())).await {
                tracing::debug!("Failed to send rejection: {}", e);
                return;
            }
        }
        Err(e) => tracing::error!("Failed to serialize rejection: {}", e),
    }
    let _ = socket.send(Message::Close(None)).await;
}
