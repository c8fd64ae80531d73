//! Credential validation backends.

pub mod jwt;

pub use jwt::{JwtCredentialValidator, TokenClaims};
