//! Category ↔ Attribute binding models

use serde::{Deserialize, Serialize};

/// Stored binding row, unique per (category_id, attribute_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttributeBinding {
    pub category_id: i64,
    pub attribute_id: i64,
    pub is_required: bool,
    pub sort_order: i32,
    pub is_filterable: bool,
}

/// Binding item in a full-replace payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingInput {
    pub attribute_id: i64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_filterable: bool,
}

impl BindingInput {
    pub fn into_binding(self, category_id: i64) -> CategoryAttributeBinding {
        CategoryAttributeBinding {
            category_id,
            attribute_id: self.attribute_id,
            is_required: self.is_required,
            sort_order: self.sort_order,
            is_filterable: self.is_filterable,
        }
    }
}

/// Binding joined with the attribute name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingView {
    pub attribute_id: i64,
    pub attribute_name: String,
    pub is_required: bool,
    pub sort_order: i32,
    pub is_filterable: bool,
}

/// Binding inherited from an ancestor category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritedBinding {
    #[serde(flatten)]
    pub binding: BindingView,
    pub source_category_id: i64,
    pub source_category_name: String,
}

/// Direct + inherited bindings after the closest-wins merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveBindings {
    pub category_id: i64,
    pub direct: Vec<BindingView>,
    pub inherited: Vec<InheritedBinding>,
}

impl EffectiveBindings {
    pub fn len(&self) -> usize {
        self.direct.len() + self.inherited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.inherited.is_empty()
    }

    pub fn contains(&self, attribute_id: i64) -> bool {
        self.direct.iter().any(|b| b.attribute_id == attribute_id)
            || self
                .inherited
                .iter()
                .any(|b| b.binding.attribute_id == attribute_id)
    }
}

/// Outcome of a full-replace write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_input_defaults() {
        let input: BindingInput = serde_json::from_str(r#"{"attributeId":10}"#).unwrap();
        assert!(!input.is_required);
        assert_eq!(input.sort_order, 0);
        assert!(!input.is_filterable);

        let binding = input.into_binding(7);
        assert_eq!(binding.category_id, 7);
        assert_eq!(binding.attribute_id, 10);
    }

    #[test]
    fn test_inherited_binding_is_flat() {
        let inherited = InheritedBinding {
            binding: BindingView {
                attribute_id: 10,
                attribute_name: "Колір".into(),
                is_required: true,
                sort_order: 1,
                is_filterable: false,
            },
            source_category_id: 1,
            source_category_name: "Одяг".into(),
        };
        let json = serde_json::to_value(&inherited).unwrap();
        assert_eq!(json["attributeId"], 10);
        assert_eq!(json["sourceCategoryId"], 1);
    }
}
