//! Unified error system for the attribute catalog
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorKind`]: Caller-facing kind (NotFound / Validation / InvalidOperation)
//! - [`ErrorCategory`]: Classification of errors by code range
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind, ApiResponse};
//!
//! let err = AppError::attribute_not_found(10);
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = AppError::with_message(ErrorCode::AttributeOptionNotOwned, "Option 3 is not owned")
//!     .with_detail("option_id", 3);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(6202));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, ErrorKind, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
