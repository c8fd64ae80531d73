//! Test fixtures shared by the integration tests.
//!
//! Starts the real router on an ephemeral port with a small seeded school:
//!
//! | user | name         | classes |
//! |------|--------------|---------|
//! | 1    | Alice Martin | 42, 99  |
//! | 2    | Bob Durand   | 42      |
//! | 3    | Chloe Petit  | 99      |

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Duration as TokenTtl;
use classchat_server::{
    infrastructure::{
        auth::{JwtCredentialValidator, TokenClaims},
        realtime::HubConfig,
        repository::SchoolDirectory,
    },
    ui::{serve, state::AppState},
};
use futures_util::StreamExt;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, client::IntoClientRequest, http::HeaderValue},
};

pub const SECRET: &str = "integration-secret";
pub const WAIT: Duration = Duration::from_secs(3);

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const DIRECTORY: &str = r#"{
    "users": [
        {"id": 1, "firstName": "Alice", "lastName": "Martin", "role": "student", "avatarUrl": null},
        {"id": 2, "firstName": "Bob", "lastName": "Durand", "role": "student"},
        {"id": 3, "firstName": "Chloe", "lastName": "Petit", "role": "teacher"}
    ],
    "classes": [
        {"id": 42, "name": "6A", "members": [1, 2]},
        {"id": 99, "name": "5B", "members": [1, 3]}
    ]
}"#;

/// In-process server, shut down on drop
pub struct TestServer {
    addr: SocketAddr,
    pub state: Arc<AppState>,
    validator: JwtCredentialValidator,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubConfig::default()).await
    }

    pub async fn start_with(hub: HubConfig) -> Self {
        let directory = SchoolDirectory::from_json(DIRECTORY).expect("Failed to parse directory");
        let state = Arc::new(AppState::in_memory(
            Arc::new(JwtCredentialValidator::new(SECRET)),
            &directory,
            hub,
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown, shutdown_rx) = oneshot::channel();
        let server_state = Arc::clone(&state);
        tokio::spawn(async move {
            let _ = serve(listener, server_state, async {
                let _ = shutdown_rx.await;
            })
            .await;
        });

        Self {
            addr,
            state,
            validator: JwtCredentialValidator::new(SECRET),
            shutdown: Some(shutdown),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, class_id: &str) -> String {
        format!("ws://{}/ws/chat/{}", self.addr, class_id)
    }

    pub fn token_for(&self, user_id: i64) -> String {
        let claims = TokenClaims::new(
            user_id,
            format!("user{user_id}@example.com"),
            "student",
            1,
            TokenTtl::hours(1),
        );
        self.validator
            .issue_token(&claims)
            .expect("Failed to issue token")
    }

    /// Open a WebSocket with an optional raw `Authorization` value.
    pub async fn try_connect(
        &self,
        class_id: &str,
        authorization: Option<&str>,
    ) -> Result<WsClient, tungstenite::Error> {
        let mut request = self.ws_url(class_id).into_client_request()?;
        if let Some(value) = authorization {
            request.headers_mut().insert(
                "Authorization",
                HeaderValue::from_str(value).expect("Invalid header value"),
            );
        }
        let (stream, _) = connect_async(request).await?;
        Ok(stream)
    }

    /// Connect as a user and wait until the room reports them as joined.
    pub async fn connect_as(&self, user_id: i64, class_id: i64, expected_members: usize) -> WsClient {
        let token = format!("Bearer {}", self.token_for(user_id));
        let stream = self
            .try_connect(&class_id.to_string(), Some(&token))
            .await
            .expect("Failed to connect");
        self.wait_for_members(class_id, expected_members).await;
        stream
    }

    /// Poll `/api/rooms` until a class reports the expected member count.
    pub async fn wait_for_members(&self, class_id: i64, expected: usize) {
        let client = reqwest::Client::new();
        let url = format!("{}/api/rooms", self.base_url());
        tokio::time::timeout(WAIT, async {
            loop {
                let rooms: serde_json::Value = client
                    .get(&url)
                    .send()
                    .await
                    .expect("Failed to send request")
                    .json()
                    .await
                    .expect("Failed to parse JSON");
                let members = rooms
                    .as_array()
                    .and_then(|rooms| rooms.iter().find(|room| room["classId"] == class_id))
                    .and_then(|room| room["members"].as_u64());
                if members == Some(expected as u64) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Room never reached the expected member count");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Next text frame as JSON, skipping pings.
pub async fn next_json(stream: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(WAIT, stream.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        match frame {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {other:?}"),
        }
    }
}

/// Assert that nothing but keepalive traffic arrives for a short while.
pub async fn assert_silent(stream: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                other => return other,
            }
        }
    })
    .await;
    assert!(result.is_err(), "Unexpected frame: {result:?}");
}
