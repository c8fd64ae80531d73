//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 認可 → 永続化 → ブロードキャストの順に、厳密に逐次実行されること
//!
//! ### なぜこのテストが必要か
//! - 認可されていない送信者のメッセージは保存もブロードキャストもされない
//! - 保存に失敗したメッセージはブロードキャストされない
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存済みメッセージが送信先クラスにブロードキャストされる
//! - 異常系：クラスのメンバーではない / 所属確認の失敗
//! - 異常系：保存の失敗

use std::sync::Arc;

use crate::domain::{
    ClassId, ClassMembershipRepository, Message, MessageBroadcaster, MessageContent,
    MessageRepository, UserId,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    membership: Arc<dyn ClassMembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        membership: Arc<dyn ClassMembershipRepository>,
        messages: Arc<dyn MessageRepository>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            membership,
            messages,
            broadcaster,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 送信者のユーザー ID
    /// * `class_id` - 送信先クラスの ID
    /// * `content` - 検証済みのメッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 保存され、ブロードキャストされたメッセージ
    /// * `Err(SendMessageError)` - 送信者にのみ通知するエラー
    pub async fn execute(
        &self,
        user_id: UserId,
        class_id: ClassId,
        content: MessageContent,
    ) -> Result<Message, SendMessageError> {
        // 1. 認可
        match self.membership.is_member(user_id, class_id).await {
            Ok(true) => {}
            Ok(false) => return Err(SendMessageError::AccessDenied),
            Err(e) => {
                tracing::warn!(%user_id, %class_id, "Membership lookup failed: {}", e);
                return Err(SendMessageError::AccessDenied);
            }
        }

        // 2. 永続化
        let message = self
            .messages
            .insert(user_id, class_id, content)
            .await
            .map_err(|e| {
                tracing::error!(%user_id, %class_id, "Failed to persist message: {}", e);
                SendMessageError::Persistence(e)
            })?;

        // 3. ブロードキャスト
        self.broadcaster.publish(class_id, message.clone()).await;
        tracing::debug!(%user_id, %class_id, message_id = %message.id, "Message published");

        Ok(message)
    }
}
