//! Category Model
//!
//! Categories are owned by the surrounding catalog; this crate only reads
//! the tree shape.

use serde::{Deserialize, Serialize};

/// Category tree node (read only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_deleted: bool,
}

impl CategoryNode {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// One step of an ancestor path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPathEntry {
    pub id: i64,
    pub name: String,
    /// 0 = the category itself, 1 = parent, ...
    pub distance: u32,
}
