//! Attribute Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared data type of an attribute
///
/// Selects which value slot a product value uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Bool,
    Enum,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Bool => "bool",
            DataType::Enum => "enum",
        }
    }

    /// Only enum attributes own options
    pub fn has_options(&self) -> bool {
        matches!(self, DataType::Enum)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "number" => Ok(DataType::Number),
            "bool" | "boolean" => Ok(DataType::Bool),
            "enum" => Ok(DataType::Enum),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}

/// Attribute option (owned by an enum attribute)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AttributeOption {
    pub id: i64,
    pub attribute_id: i64,
    pub value: String,
}

/// Attribute definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    /// Options (only non-empty for enum attributes)
    #[serde(default)]
    pub options: Vec<AttributeOption>,
}

impl AttributeDefinition {
    /// Find an option owned by this attribute
    pub fn option(&self, option_id: i64) -> Option<&AttributeOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn owns_option(&self, option_id: i64) -> bool {
        self.option(option_id).is_some()
    }
}

/// Option item in a create/update payload
///
/// No id → create; id → update that option's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOptionInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub value: String,
}

/// Create attribute payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCreate {
    pub name: String,
    pub slug: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub options: Option<Vec<AttributeOptionInput>>,
}

/// Update attribute payload (full definition, options use per-item semantics)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpdate {
    pub name: String,
    pub slug: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub options: Option<Vec<AttributeOptionInput>>,
}

/// Normalized attribute write, shared by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDraft {
    pub name: String,
    pub slug: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    /// Empty unless `data_type` is enum
    pub options: Vec<AttributeOptionInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse() {
        assert_eq!("Enum".parse::<DataType>().unwrap(), DataType::Enum);
        assert_eq!("boolean".parse::<DataType>().unwrap(), DataType::Bool);
        assert!("date".parse::<DataType>().is_err());
    }

    #[test]
    fn test_data_type_serde() {
        let json = serde_json::to_string(&DataType::Number).unwrap();
        assert_eq!(json, "\"number\"");
    }

    #[test]
    fn test_create_payload_camel_case() {
        let payload: AttributeCreate = serde_json::from_str(
            r#"{"name":"Колір","dataType":"enum","options":[{"value":"Чорний"},{"id":2,"value":"Білий"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.data_type, DataType::Enum);
        let options = payload.options.unwrap();
        assert_eq!(options[0].id, None);
        assert_eq!(options[1].id, Some(2));
    }
}
