//! Effective attribute schema of a category

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeOption, DataType};

/// One attribute of the effective schema (definition joined with its winning binding)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveAttribute {
    pub attribute_id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub is_required: bool,
    pub sort_order: i32,
    pub is_filterable: bool,
    pub options: Vec<AttributeOption>,
    /// Category that owns the winning binding
    pub source_category_id: i64,
}

impl EffectiveAttribute {
    pub fn option_label(&self, option_id: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.value.as_str())
    }

    pub fn owns_option(&self, option_id: i64) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }
}

/// Ordered effective schema (sort_order asc, then name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSchema {
    pub category_id: i64,
    pub attributes: Vec<EffectiveAttribute>,
}

impl EffectiveSchema {
    pub fn get(&self, attribute_id: i64) -> Option<&EffectiveAttribute> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id == attribute_id)
    }

    pub fn contains(&self, attribute_id: i64) -> bool {
        self.get(attribute_id).is_some()
    }

    pub fn attribute_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.attributes.iter().map(|a| a.attribute_id)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
