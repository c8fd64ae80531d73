//! UseCase: 接続受付（Access Gateway）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdmitParticipantUseCase::execute() メソッド
//! - 認証（bearer トークン検証）→ 認可（クラス所属確認）の順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンかつクラスのメンバー
//! - 異常系：無効なトークン（認可チェックは呼ばれない）
//! - 異常系：クラスのメンバーではない
//! - 異常系：所属確認そのものが失敗

use std::sync::Arc;

use crate::domain::{AuthError, ClassId, ClassMembershipRepository, CredentialValidator, Identity};

use super::error::ConnectError;

/// Bearer scheme prefix expected in the `Authorization` header.
const BEARER_PREFIX: &str = "Bearer ";

/// 接続受付のユースケース
pub struct AdmitParticipantUseCase {
    credentials: Arc<dyn CredentialValidator>,
    membership: Arc<dyn ClassMembershipRepository>,
}

impl AdmitParticipantUseCase {
    /// 新しい AdmitParticipantUseCase を作成
    pub fn new(
        credentials: Arc<dyn CredentialValidator>,
        membership: Arc<dyn ClassMembershipRepository>,
    ) -> Self {
        Self {
            credentials,
            membership,
        }
    }

    /// Extract the token from a raw `Authorization` header value.
    pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;
        match header.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.is_empty() && !token.contains(' ') => Ok(token),
            _ => Err(AuthError::MalformedHeader),
        }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `authorization` - `Authorization` ヘッダの値（存在する場合）
    /// * `class_id` - 接続先クラスの ID
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 認証・認可ともに成功
    /// * `Err(ConnectError)` - どちらかが失敗
    pub async fn execute(
        &self,
        authorization: Option<&str>,
        class_id: ClassId,
    ) -> Result<Identity, ConnectError> {
        // 1. 認証
        let token = Self::bearer_token(authorization)?;
        let identity = self.credentials.validate(token).await?;

        // 2. 認可
        let is_member = self
            .membership
            .is_member(identity.user_id, class_id)
            .await
            .map_err(ConnectError::MembershipLookup)?;
        if !is_member {
            tracing::info!(
                user_id = %identity.user_id,
                class_id = %class_id,
                "User is not a member of the class"
            );
            return Err(ConnectError::Forbidden);
        }

        Ok(identity)
    }
}
