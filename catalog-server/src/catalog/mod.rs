//! 属性目录核心
//!
//! # 模块结构
//!
//! - [`AttributeCatalog`] - 属性定义与选项的增删改查
//! - [`CategoryBindingResolver`] - 分类路径与绑定继承 (closest-wins)
//! - [`AttributeSchemaProjector`] - 分类的有效属性 schema
//! - [`ProductAttributeValueStore`] - 商品属性值校验与全量替换
//! - [`CompareEngine`] - 商品对比表
//! - [`CatalogStore`] - 存储接口 (SQLite；测试用内存实现需 `test-utils` feature)

pub mod attributes;
pub mod compare;
pub mod diff;
pub mod format;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod values;

pub use attributes::AttributeCatalog;
pub use compare::{CompareEngine, CompareService};
pub use format::DisplayLabels;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryCatalogStore;
pub use resolver::{CategoryBindingResolver, ResolvedBinding};
pub use schema::AttributeSchemaProjector;
pub use store::CatalogStore;
pub use values::ProductAttributeValueStore;
