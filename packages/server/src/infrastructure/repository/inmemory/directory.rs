//! Seed data for the in-memory stores.
//!
//! Loaded from a JSON document of the form:
//!
//! ```json
//! {
//!   "users": [
//!     { "id": 7, "firstName": "Alice", "lastName": "Martin", "role": "student" }
//!   ],
//!   "classes": [
//!     { "id": 42, "name": "6A", "members": [7] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{ClassId, Role, UserId};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read directory file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse directory file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: ClassId,
    pub name: String,
    /// Users enrolled in the class.
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Users, classes and enrollments known to this process
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchoolDirectory {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
}

impl SchoolDirectory {
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
