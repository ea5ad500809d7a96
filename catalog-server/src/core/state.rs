//! 服务器状态
//!
//! 所有组件共享同一个 [`CatalogStore`]，克隆开销仅为 `Arc` 计数。

use std::sync::Arc;

use crate::catalog::{
    AttributeCatalog, AttributeSchemaProjector, CatalogStore, CategoryBindingResolver,
    CompareEngine, CompareService, ProductAttributeValueStore,
};
use crate::core::Config;
use crate::db::{DbService, SqliteCatalogStore};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// SQLite 连接 (内存 store 时为 None)
    pub db: Option<DbService>,
    pub attributes: AttributeCatalog,
    pub bindings: CategoryBindingResolver,
    pub schema: AttributeSchemaProjector,
    pub values: ProductAttributeValueStore,
    pub compare: CompareService,
}

impl ServerState {
    /// 打开数据库并组装组件
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = if config.database_url.contains(":memory:") {
            DbService::in_memory().await?
        } else {
            DbService::new(&config.database_url, config.db_max_connections).await?
        };
        let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(db.pool.clone()));
        Ok(Self::with_store(config.clone(), store, Some(db)))
    }

    /// 基于任意 store 组装 (测试中使用内存实现)
    pub fn with_store(config: Config, store: Arc<dyn CatalogStore>, db: Option<DbService>) -> Self {
        let values = ProductAttributeValueStore::new(store.clone(), config.display.clone());
        let compare = CompareService::new(
            values.clone(),
            CompareEngine::new(config.display.missing.clone()),
            config.compare_max_products,
        );
        Self {
            attributes: AttributeCatalog::new(store.clone()),
            bindings: CategoryBindingResolver::new(store.clone()),
            schema: AttributeSchemaProjector::new(store),
            values,
            compare,
            db,
            config,
        }
    }
}
