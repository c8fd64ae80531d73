//! HTTP API DTOs.

use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: &'static str,
    /// Server start time (RFC 3339, UTC)
    pub started_at: String,
}

/// Active room summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub class_id: i64,
    pub members: usize,
}
