//! Data models for the attribute catalog
//!
//! Shared between the server, its storage layer and API clients.

pub mod attribute;
pub mod binding;
pub mod category;
pub mod compare;
pub mod product;
pub mod schema;

// Re-exports
pub use attribute::*;
pub use binding::*;
pub use category::*;
pub use compare::*;
pub use product::*;
pub use schema::*;
