//! Shared types for the attribute catalog
//!
//! Domain models, the unified error system and query/pagination types used
//! by the server and its API clients.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode, ErrorKind};
pub use query::{AttributeQuery, PaginatedResponse};
