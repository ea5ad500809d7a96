//! Product attribute value models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attribute::DataType;

/// Product reference (read only, owned by the product catalog)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: i64,
    pub category_id: i64,
    pub is_deleted: bool,
}

impl ProductRef {
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Typed attribute value
///
/// Exactly one slot per value, selected by the attribute's data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    String(String),
    Number(Decimal),
    Bool(bool),
    Option(i64),
}

impl AttributeValue {
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::String(_) => DataType::String,
            AttributeValue::Number(_) => DataType::Number,
            AttributeValue::Bool(_) => DataType::Bool,
            AttributeValue::Option(_) => DataType::Enum,
        }
    }

    pub fn option_id(&self) -> Option<i64> {
        match self {
            AttributeValue::Option(id) => Some(*id),
            _ => None,
        }
    }
}

/// Stored value row, keyed by (product_id, attribute_id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductAttributeValue {
    pub product_id: i64,
    pub attribute_id: i64,
    pub value: AttributeValue,
}

/// Wire form of a value: four nullable slots
///
/// Used both as `SetValues` input item and as `GetValues` output row.
/// `valueNumber` is written as a decimal string; input accepts a string or a
/// JSON number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueRecord {
    pub attribute_id: i64,
    #[serde(default)]
    pub value_string: Option<String>,
    #[serde(default)]
    pub value_number: Option<Decimal>,
    #[serde(default)]
    pub value_bool: Option<bool>,
    #[serde(default)]
    pub option_id: Option<i64>,
}

/// Why a record does not fit the declared data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// The slot for the declared type is empty
    Missing(&'static str),
    /// A slot of another type is populated
    Unexpected(&'static str),
}

impl AttributeValueRecord {
    pub fn string(attribute_id: i64, value: impl Into<String>) -> Self {
        Self {
            attribute_id,
            value_string: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn number(attribute_id: i64, value: Decimal) -> Self {
        Self {
            attribute_id,
            value_number: Some(value),
            ..Default::default()
        }
    }

    pub fn boolean(attribute_id: i64, value: bool) -> Self {
        Self {
            attribute_id,
            value_bool: Some(value),
            ..Default::default()
        }
    }

    pub fn option(attribute_id: i64, option_id: i64) -> Self {
        Self {
            attribute_id,
            option_id: Some(option_id),
            ..Default::default()
        }
    }

    /// Names of the populated slots
    fn populated(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            self.value_string.is_some().then_some("valueString"),
            self.value_number.is_some().then_some("valueNumber"),
            self.value_bool.is_some().then_some("valueBool"),
            self.option_id.is_some().then_some("optionId"),
        ]
        .into_iter()
        .flatten()
    }

    /// Select the slot named by `data_type`; every other slot must be empty.
    pub fn to_value(&self, data_type: DataType) -> Result<AttributeValue, SlotError> {
        let (slot, value) = match data_type {
            DataType::String => (
                "valueString",
                self.value_string.clone().map(AttributeValue::String),
            ),
            DataType::Number => ("valueNumber", self.value_number.map(AttributeValue::Number)),
            DataType::Bool => ("valueBool", self.value_bool.map(AttributeValue::Bool)),
            DataType::Enum => ("optionId", self.option_id.map(AttributeValue::Option)),
        };
        if let Some(other) = self.populated().find(|name| *name != slot) {
            return Err(SlotError::Unexpected(other));
        }
        value.ok_or(SlotError::Missing(slot))
    }
}

impl From<&ProductAttributeValue> for AttributeValueRecord {
    fn from(row: &ProductAttributeValue) -> Self {
        let mut record = AttributeValueRecord {
            attribute_id: row.attribute_id,
            ..Default::default()
        };
        match &row.value {
            AttributeValue::String(s) => record.value_string = Some(s.clone()),
            AttributeValue::Number(n) => record.value_number = Some(*n),
            AttributeValue::Bool(b) => record.value_bool = Some(*b),
            AttributeValue::Option(id) => record.option_id = Some(*id),
        }
        record
    }
}

/// A stored value formatted for display against the current schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayValue {
    pub attribute_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub display: String,
}

/// All display values of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDisplayValues {
    pub product_id: i64,
    pub category_id: i64,
    pub values: Vec<DisplayValue>,
}
