//! Unified error codes for the attribute catalog
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (attributes, categories, products)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Operation conflicts with a business rule
    InvalidOperation = 9,

    // ==================== 60xx: Product ====================
    /// Product not found (or soft-deleted)
    ProductNotFound = 6001,

    // ==================== 61xx: Category ====================
    /// Category not found (or soft-deleted)
    CategoryNotFound = 6101,

    // ==================== 62xx: Attribute value ====================
    /// Attribute is not part of the category's effective schema
    AttributeNotAllowed = 6201,
    /// Enum option does not belong to the attribute
    AttributeOptionNotOwned = 6202,
    /// Value slot does not match the attribute's data type
    AttributeValueMismatch = 6203,

    // ==================== 63xx: Attribute ====================
    /// Attribute not found
    AttributeNotFound = 6301,
    /// Same attribute listed twice in one set
    AttributeDuplicateBinding = 6304,
    /// Enum option not found under the attribute
    AttributeOptionNotFound = 6305,
    /// Duplicate option value under one attribute
    AttributeOptionDuplicate = 6306,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

/// Coarse error kind surfaced to callers of the catalog components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Entity absent or soft-deleted
    NotFound,
    /// Input rejected before any change was applied
    Validation,
    /// Business-rule conflict raised during a set operation
    InvalidOperation,
    /// Infrastructure failure
    System,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Map the code onto the caller-facing error kind
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::NotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::AttributeNotFound => ErrorKind::NotFound,

            ErrorCode::InvalidOperation | ErrorCode::AttributeNotAllowed => {
                ErrorKind::InvalidOperation
            }

            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::ConfigError => ErrorKind::System,

            _ => ErrorKind::Validation,
        }
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidOperation => "Operation is not allowed",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::AttributeNotAllowed => "Attribute is not allowed for this category",
            ErrorCode::AttributeOptionNotOwned => "Option does not belong to the attribute",
            ErrorCode::AttributeValueMismatch => "Value does not match the attribute data type",
            ErrorCode::AttributeNotFound => "Attribute not found",
            ErrorCode::AttributeDuplicateBinding => "Attribute listed more than once",
            ErrorCode::AttributeOptionNotFound => "Attribute option not found",
            ErrorCode::AttributeOptionDuplicate => "Attribute option value already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::InvalidOperation),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::AttributeNotAllowed),
            6202 => Ok(ErrorCode::AttributeOptionNotOwned),
            6203 => Ok(ErrorCode::AttributeValueMismatch),
            6301 => Ok(ErrorCode::AttributeNotFound),
            6304 => Ok(ErrorCode::AttributeDuplicateBinding),
            6305 => Ok(ErrorCode::AttributeOptionNotFound),
            6306 => Ok(ErrorCode::AttributeOptionDuplicate),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
