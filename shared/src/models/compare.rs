//! Product comparison table

use serde::{Deserialize, Serialize};

/// Compare request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub product_ids: Vec<i64>,
}

/// One cell of the comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareCell {
    pub product_id: i64,
    /// Formatted value, or the missing marker
    pub display: String,
    pub is_missing: bool,
    /// True iff at least one other product shows a different value
    pub differs: bool,
}

/// One row per attribute observed on any compared product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRow {
    pub attribute_id: i64,
    pub name: String,
    pub sort_order: i32,
    /// Cells in product column order
    pub cells: Vec<CompareCell>,
}

impl CompareRow {
    pub fn cell(&self, product_id: i64) -> Option<&CompareCell> {
        self.cells.iter().find(|c| c.product_id == product_id)
    }
}

/// Full-outer-join comparison across several products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareTable {
    pub product_ids: Vec<i64>,
    pub rows: Vec<CompareRow>,
}

impl CompareTable {
    pub fn row(&self, attribute_id: i64) -> Option<&CompareRow> {
        self.rows.iter().find(|r| r.attribute_id == attribute_id)
    }
}
