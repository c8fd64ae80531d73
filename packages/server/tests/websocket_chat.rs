//! WebSocket integration tests.
//!
//! Admission, broadcast, disconnect handling and backfill over real sockets.

mod fixtures;

use classchat_server::domain::{ClassId, MessageContent, UserId};
use fixtures::{TestServer, assert_silent, next_json};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};

fn text(content: &str) -> Message {
    Message::text(serde_json::json!({ "content": content }).to_string())
}

#[tokio::test]
async fn test_message_reaches_every_member_of_the_class() {
    // テスト項目: クラス 42 で A が送ったメッセージが A と B の両方に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect_as(1, 42, 1).await;
    let mut bob = server.connect_as(2, 42, 2).await;

    // when (操作):
    alice.send(text("hello")).await.unwrap();

    // then (期待する結果):
    for stream in [&mut alice, &mut bob] {
        let frame = next_json(stream).await;
        assert_eq!(frame["type"], "message");
        assert_eq!(frame["content"]["content"], "hello");
        assert_eq!(frame["content"]["classId"], 42);
        assert_eq!(frame["content"]["className"], "6A");
        assert_eq!(frame["content"]["author"]["id"], 1);
        assert_eq!(frame["content"]["author"]["fullName"], "Alice Martin");
        assert_eq!(frame["content"]["isPinned"], false);
        assert!(frame["content"]["createdAt"].is_string());
    }
}

#[tokio::test]
async fn test_ungraceful_disconnect_only_affects_that_client() {
    // テスト項目: B が Close を送らずに切断しても、A の送信は正常に完了する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect_as(1, 42, 1).await;
    let bob = server.connect_as(2, 42, 2).await;

    // when (操作): B のソケットを破棄し、Room から外れるのを待ってから A が送る
    drop(bob);
    server.wait_for_members(42, 1).await;
    alice.send(text("still here")).await.unwrap();

    // then (期待する結果):
    let frame = next_json(&mut alice).await;
    assert_eq!(frame["content"]["content"], "still here");
    let history = server
        .state
        .services
        .recent_messages
        .execute(ClassId::new(42).unwrap(), 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_publish_to_room_without_members_still_persists() {
    // テスト項目: メンバーが 0 人の Room への送信も保存される
    // given (前提条件):
    let server = TestServer::start().await;
    let class_99 = ClassId::new(99).unwrap();

    // when (操作):
    let result = server
        .state
        .services
        .send_message
        .execute(
            UserId::new(3).unwrap(),
            class_99,
            MessageContent::new("anyone here?".to_string()).unwrap(),
        )
        .await;

    // then (期待する結果):
    assert!(result.is_ok());
    let history = server
        .state
        .services
        .recent_messages
        .execute(class_99, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].author.full_name, "Chloe Petit");
    server.wait_for_members(99, 0).await;
}

#[tokio::test]
async fn test_backfill_on_join_without_duplicates() {
    // テスト項目: 参加時に過去 3 件がバックフィルで届き、直後の 4 件目とも重複しない
    // given (前提条件): クラス 42 に 3 件の保存済みメッセージがある
    let server = TestServer::start().await;
    let class_42 = ClassId::new(42).unwrap();
    let send = &server.state.services.send_message;
    for content in ["first", "second", "third"] {
        send.execute(
            UserId::new(2).unwrap(),
            class_42,
            MessageContent::new(content.to_string()).unwrap(),
        )
        .await
        .unwrap();
    }

    // when (操作): A が参加した直後に 4 件目を送る
    let mut alice = server.connect_as(1, 42, 1).await;
    send.execute(
        UserId::new(2).unwrap(),
        class_42,
        MessageContent::new("fourth".to_string()).unwrap(),
    )
    .await
    .unwrap();

    // then (期待する結果): 4 件がちょうど 1 回ずつ届く
    // (4 件目がバックフィルより先にライブで届くこともある)
    let mut contents = Vec::new();
    for _ in 0..4 {
        let frame = next_json(&mut alice).await;
        contents.push(frame["content"]["content"].as_str().unwrap().to_string());
    }
    contents.sort();
    assert_eq!(contents, vec!["first", "fourth", "second", "third"]);
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_missing_or_invalid_credentials_are_rejected_before_upgrade() {
    // テスト項目: 認証情報がない・不正な場合はアップグレード前に 401 が返る
    // given (前提条件):
    let server = TestServer::start().await;
    let expired = {
        use chrono::Duration;
        use classchat_server::infrastructure::auth::{JwtCredentialValidator, TokenClaims};
        let claims = TokenClaims::new(1, "a@example.com", "student", 1, Duration::hours(-2));
        JwtCredentialValidator::new(fixtures::SECRET)
            .issue_token(&claims)
            .unwrap()
    };

    // when (操作):
    let cases = [
        None,
        Some("Basic dXNlcjpwYXNz".to_string()),
        Some("Bearer not-a-token".to_string()),
        Some(format!("Bearer {expired}")),
    ];

    // then (期待する結果):
    for authorization in cases {
        let result = server.try_connect("42", authorization.as_deref()).await;
        match result {
            Err(tungstenite::Error::Http(response)) => {
                assert_eq!(response.status().as_u16(), 401, "{authorization:?}");
            }
            Err(e) => panic!("Expected HTTP 401 for {authorization:?}, got {e}"),
            Ok(_) => panic!("Expected HTTP 401 for {authorization:?}, got an upgrade"),
        }
    }
    assert!(server.state.registry.get(ClassId::new(42).unwrap()).await.is_none());
}

#[tokio::test]
async fn test_non_numeric_class_id_is_bad_request() {
    // テスト項目: 数値でないクラス ID は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let token = format!("Bearer {}", server.token_for(1));

    // when (操作):
    let result = server.try_connect("abc", Some(&token)).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status().as_u16(), 400),
        Err(e) => panic!("Expected HTTP 400, got {e}"),
        Ok(_) => panic!("Expected HTTP 400, got an upgrade"),
    }
}

#[tokio::test]
async fn test_non_member_gets_access_denied_and_close() {
    // テスト項目: クラスのメンバーでないユーザーはエラーを 1 件受け取り、切断される
    // given (前提条件): Chloe (3) はクラス 42 のメンバーではない
    let server = TestServer::start().await;
    let token = format!("Bearer {}", server.token_for(3));

    // when (操作):
    let mut chloe = server.try_connect("42", Some(&token)).await.unwrap();

    // then (期待する結果):
    let frame = next_json(&mut chloe).await;
    assert_eq!(
        frame,
        serde_json::json!({"type": "error", "content": "Access denied"})
    );
    let next = tokio::time::timeout(fixtures::WAIT, chloe.next()).await.unwrap();
    assert!(matches!(next, Some(Ok(Message::Close(_))) | None | Some(Err(_))));
    assert!(server.state.registry.get(ClassId::new(42).unwrap()).await.is_none());
}

#[tokio::test]
async fn test_invalid_content_is_discarded() {
    // テスト項目: 空・1000 文字超・JSON でないフレームは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect_as(1, 42, 1).await;

    // when (操作):
    alice.send(text("")).await.unwrap();
    alice.send(text(&"a".repeat(1001))).await.unwrap();
    alice.send(Message::text("just text")).await.unwrap();
    alice.send(text(&"b".repeat(1000))).await.unwrap();

    // then (期待する結果): 1000 文字ちょうどのメッセージだけが届く
    let frame = next_json(&mut alice).await;
    assert_eq!(frame["content"]["content"].as_str().map(str::len), Some(1000));
    assert_silent(&mut alice).await;
    let history = server
        .state
        .services
        .recent_messages
        .execute(ClassId::new(42).unwrap(), 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}
