//! InMemory Message Repository 実装
//!
//! メッセージはクラスごとの Vec に挿入順で保持します。
//! ID はプロセス内で単調増加します。

use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use classchat_shared::time::now_utc;
use tokio::sync::Mutex;

use crate::domain::{
    Author, ClassId, Message, MessageContent, MessageId, MessageRepository, RepositoryError, UserId,
};

use super::directory::{SchoolDirectory, UserRecord};

/// インメモリ Message Repository 実装
#[derive(Debug)]
pub struct InMemoryMessageRepository {
    users: HashMap<UserId, UserRecord>,
    class_names: HashMap<ClassId, String>,
    messages: Mutex<HashMap<ClassId, Vec<Message>>>,
    next_id: AtomicI64,
}

impl InMemoryMessageRepository {
    pub fn new(directory: &SchoolDirectory) -> Self {
        Self {
            users: directory
                .users
                .iter()
                .map(|user| (user.id, user.clone()))
                .collect(),
            class_names: directory
                .classes
                .iter()
                .map(|class| (class.id, class.name.clone()))
                .collect(),
            messages: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored messages for a class.
    pub async fn count(&self, class_id: ClassId) -> usize {
        self.messages
            .lock()
            .await
            .get(&class_id)
            .map_or(0, Vec::len)
    }

    fn author(&self, user_id: UserId) -> Result<Author, RepositoryError> {
        let user = self
            .users
            .get(&user_id)
            .ok_or(RepositoryError::UserNotFound(user_id.value()))?;
        Ok(Author {
            id: user.id,
            full_name: user.full_name(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
        })
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(
        &self,
        user_id: UserId,
        class_id: ClassId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let author = self.author(user_id)?;
        let class_name = self
            .class_names
            .get(&class_id)
            .cloned()
            .ok_or(RepositoryError::ClassNotFound(class_id.value()))?;

        let now = now_utc();
        let message = Message {
            id: MessageId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            content,
            class_id,
            class_name,
            author,
            file_url: None,
            is_pinned: false,
            created_at: now,
            updated_at: now,
        };

        self.messages
            .lock()
            .await
            .entry(class_id)
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn recent(&self, class_id: ClassId, limit: usize) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let Some(history) = messages.get(&class_id) else {
            return Ok(Vec::new());
        };
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }

    async fn delete(&self, message_id: MessageId) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        for history in messages.values_mut() {
            if let Some(index) = history.iter().position(|m| m.id == message_id) {
                history.remove(index);
                return Ok(());
            }
        }
        Err(RepositoryError::MessageNotFound(message_id.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Role, infrastructure::repository::inmemory::directory::ClassRecord};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - insert がディレクトリ情報で author / class_name を補完すること
    // - recent が直近 N 件を古い順で返すこと
    // - delete と各種 NotFound エラー
    // ========================================

    fn create_test_repository() -> InMemoryMessageRepository {
        let directory = SchoolDirectory {
            users: vec![UserRecord {
                id: UserId::new(7).unwrap(),
                first_name: "Alice".to_string(),
                last_name: "Martin".to_string(),
                role: Role::Student,
                avatar_url: Some("/uploads/alice.png".to_string()),
            }],
            classes: vec![ClassRecord {
                id: ClassId::new(42).unwrap(),
                name: "6A".to_string(),
                members: vec![UserId::new(7).unwrap()],
            }],
        };
        InMemoryMessageRepository::new(&directory)
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_enriches_message() {
        // テスト項目: 保存したメッセージに投稿者とクラス名が補完される
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let message = repo
            .insert(UserId::new(7).unwrap(), ClassId::new(42).unwrap(), content("hello"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.id, MessageId::new(1));
        assert_eq!(message.class_name, "6A");
        assert_eq!(message.author.full_name, "Alice Martin");
        assert_eq!(message.author.role, Role::Student);
        assert_eq!(message.author.avatar_url.as_deref(), Some("/uploads/alice.png"));
        assert!(!message.is_pinned);
        assert_eq!(message.created_at, message.updated_at);
    }

    #[tokio::test]
    async fn test_insert_unknown_user_or_class() {
        // テスト項目: 未知のユーザー・クラスへの保存は NotFound
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let unknown_user = repo
            .insert(UserId::new(8).unwrap(), ClassId::new(42).unwrap(), content("hi"))
            .await;
        let unknown_class = repo
            .insert(UserId::new(7).unwrap(), ClassId::new(43).unwrap(), content("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(unknown_user, Err(RepositoryError::UserNotFound(8)));
        assert_eq!(unknown_class, Err(RepositoryError::ClassNotFound(43)));
        assert_eq!(repo.count(ClassId::new(42).unwrap()).await, 0);
    }

    #[tokio::test]
    async fn test_recent_returns_latest_oldest_first() {
        // テスト項目: recent は直近 N 件を古い順に返す
        // given (前提条件):
        let repo = create_test_repository();
        let alice = UserId::new(7).unwrap();
        let class_42 = ClassId::new(42).unwrap();
        for i in 1..=5 {
            repo.insert(alice, class_42, content(&format!("message {i}")))
                .await
                .unwrap();
        }

        // when (操作):
        let recent = repo.recent(class_42, 3).await.unwrap();
        let all = repo.recent(class_42, 50).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["message 3", "message 4", "message 5"]);
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_recent_for_class_without_messages() {
        // テスト項目: メッセージのないクラスでは空の Vec を返す
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let recent = repo.recent(ClassId::new(99).unwrap(), 50).await;

        // then (期待する結果):
        assert_eq!(recent, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_delete_message() {
        // テスト項目: 保存済みメッセージを削除でき、2 回目は NotFound
        // given (前提条件):
        let repo = create_test_repository();
        let class_42 = ClassId::new(42).unwrap();
        let message = repo
            .insert(UserId::new(7).unwrap(), class_42, content("oops"))
            .await
            .unwrap();

        // when (操作):
        let first = repo.delete(message.id).await;
        let second = repo.delete(message.id).await;

        // then (期待する結果):
        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(RepositoryError::MessageNotFound(message.id.value())));
        assert_eq!(repo.count(class_42).await, 0);
    }
}
