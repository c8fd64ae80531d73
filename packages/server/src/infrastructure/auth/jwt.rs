//! HS256 JWT bearer credentials.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, CredentialValidator, Identity, Role, UserId};

/// Claims carried by a classchat access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub school_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl TokenClaims {
    /// Claims issued now and valid for `ttl`.
    pub fn new(
        user_id: i64,
        email: impl Into<String>,
        role: impl Into<String>,
        school_id: i64,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: email.into(),
            role: role.into(),
            school_id,
            name: None,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn into_identity(self) -> Result<Identity, AuthError> {
        let user_id = UserId::new(self.user_id)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let role = parse_role(&self.role)?;
        let display_name = self.name.unwrap_or(self.email);
        Ok(Identity::new(user_id, display_name, role))
    }
}

fn parse_role(role: &str) -> Result<Role, AuthError> {
    match role.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "teacher" => Ok(Role::Teacher),
        "student" => Ok(Role::Student),
        "parent" => Ok(Role::Parent),
        other => Err(AuthError::InvalidToken(format!("unknown role: {other}"))),
    }
}

/// Validates bearer tokens signed with a shared secret
pub struct JwtCredentialValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign claims with this validator's secret.
    pub fn issue_token(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl std::fmt::Debug for JwtCredentialValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCredentialValidator").finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialValidator for JwtCredentialValidator {
    async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;
        data.claims.into_identity()
    }
}
