//! UseCase: 直近メッセージの取得（接続直後のバックフィル用）

use std::sync::Arc;

use crate::domain::{ClassId, Message, MessageRepository, RepositoryError};

/// 直近メッセージ取得のユースケース
///
/// Read-only. The result goes straight to one client's outbound queue and
/// never through a room broadcast.
pub struct RecentMessagesUseCase {
    messages: Arc<dyn MessageRepository>,
}

impl RecentMessagesUseCase {
    /// 新しい RecentMessagesUseCase を作成
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Fetch up to `limit` of the latest messages of a class, oldest first.
    pub async fn execute(
        &self,
        class_id: ClassId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.messages.recent(class_id, limit).await
    }
}
