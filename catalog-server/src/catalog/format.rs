//! Display formatting of attribute values

use shared::models::{AttributeValue, EffectiveAttribute};

/// Localized labels used when rendering values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLabels {
    pub yes: String,
    pub no: String,
    /// Marker for a cell with no value (compare table, dangling option)
    pub missing: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            yes: "Так".into(),
            no: "Ні".into(),
            missing: "—".into(),
        }
    }
}

/// Render a value against its schema entry
///
/// Numbers are printed without trailing zeros, immediately followed by the unit.
pub fn format_value(value: &AttributeValue, attribute: &EffectiveAttribute, labels: &DisplayLabels) -> String {
    match value {
        AttributeValue::String(s) => s.clone(),
        AttributeValue::Number(n) => {
            format!("{}{}", n.normalize(), attribute.unit.as_deref().unwrap_or(""))
        }
        AttributeValue::Bool(true) => labels.yes.clone(),
        AttributeValue::Bool(false) => labels.no.clone(),
        AttributeValue::Option(id) => attribute
            .option_label(*id)
            .unwrap_or(&labels.missing)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{AttributeOption, DataType};
    use std::str::FromStr;

    fn attribute(data_type: DataType, unit: Option<&str>) -> EffectiveAttribute {
        EffectiveAttribute {
            attribute_id: 10,
            name: "Колір".into(),
            slug: None,
            data_type,
            unit: unit.map(Into::into),
            is_required: false,
            sort_order: 0,
            is_filterable: false,
            options: vec![AttributeOption {
                id: 1,
                attribute_id: 10,
                value: "Чорний".into(),
            }],
            source_category_id: 7,
        }
    }

    #[test]
    fn test_format_number_with_unit() {
        let labels = DisplayLabels::default();
        let value = AttributeValue::Number(Decimal::from_str("6.50").unwrap());
        assert_eq!(
            format_value(&value, &attribute(DataType::Number, Some("\"")), &labels),
            "6.5\""
        );
        let value = AttributeValue::Number(Decimal::from(5));
        assert_eq!(
            format_value(&value, &attribute(DataType::Number, None), &labels),
            "5"
        );
    }

    #[test]
    fn test_format_bool_and_enum() {
        let labels = DisplayLabels::default();
        assert_eq!(
            format_value(&AttributeValue::Bool(true), &attribute(DataType::Bool, None), &labels),
            "Так"
        );
        assert_eq!(
            format_value(&AttributeValue::Option(1), &attribute(DataType::Enum, None), &labels),
            "Чорний"
        );
        assert_eq!(
            format_value(&AttributeValue::Option(9), &attribute(DataType::Enum, None), &labels),
            "—"
        );
    }
}
