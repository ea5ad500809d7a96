//! SQLite-backed [`CatalogStore`]
//!
//! Reads go straight to the pool. Writes open one transaction each; an early
//! return or a dropped future rolls it back.

use std::collections::HashSet;

use async_trait::async_trait;
use shared::AttributeQuery;
use shared::models::{
    AttributeDefinition, AttributeDraft, CategoryAttributeBinding, CategoryNode,
    ProductAttributeValue, ProductRef, ReplaceSummary,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::repository::{RepoError, RepoResult, attribute, binding, category, product};
use crate::catalog::diff::plan_replace;
use crate::catalog::store::CatalogStore;

#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn find_attribute(&self, id: i64) -> RepoResult<Option<AttributeDefinition>> {
        attribute::find_by_id(&self.pool, id).await
    }

    async fn find_attributes(&self, ids: &[i64]) -> RepoResult<Vec<AttributeDefinition>> {
        attribute::find_by_ids(&self.pool, ids).await
    }

    async fn search_attributes(
        &self,
        query: &AttributeQuery,
    ) -> RepoResult<(Vec<AttributeDefinition>, u64)> {
        attribute::search(&self.pool, query).await
    }

    async fn insert_attribute(&self, draft: &AttributeDraft) -> RepoResult<AttributeDefinition> {
        let mut tx = self.pool.begin().await?;
        let id = attribute::insert(&mut *tx, draft, now_millis()).await?;
        if draft.data_type.has_options() {
            for option in &draft.options {
                attribute::insert_option(&mut *tx, id, &option.value).await?;
            }
        }
        tx.commit().await?;

        attribute::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Failed to create attribute {id}")))
    }

    async fn update_attribute(
        &self,
        id: i64,
        draft: &AttributeDraft,
    ) -> RepoResult<Option<AttributeDefinition>> {
        let mut tx = self.pool.begin().await?;

        let Some(old_type) = attribute::find_data_type(&mut *tx, id).await? else {
            return Ok(None);
        };
        attribute::update(&mut *tx, id, draft, now_millis()).await?;

        if old_type != draft.data_type {
            let dropped = product::delete_by_attribute(&mut *tx, id).await?;
            tracing::info!(
                attribute_id = id,
                from = %old_type,
                to = %draft.data_type,
                dropped,
                "Attribute data type changed, stored values dropped"
            );
        }

        let existing = attribute::find_options(&mut *tx, id).await?;
        let mut removed: Vec<i64> = existing.iter().map(|o| o.id).collect();

        if draft.data_type.has_options() {
            for input in &draft.options {
                match input.id {
                    Some(option_id) => {
                        let Some(current) = existing.iter().find(|o| o.id == option_id) else {
                            return Err(RepoError::Validation(format!(
                                "Option {option_id} does not belong to attribute {id}"
                            )));
                        };
                        if current.value != input.value {
                            attribute::update_option(&mut *tx, option_id, &input.value).await?;
                        }
                    }
                    None => {
                        attribute::insert_option(&mut *tx, id, &input.value).await?;
                    }
                }
            }
            let kept: HashSet<i64> = draft.options.iter().filter_map(|o| o.id).collect();
            removed.retain(|option_id| !kept.contains(option_id));
        }

        if !removed.is_empty() {
            let dropped = product::delete_by_options(&mut *tx, &removed).await?;
            attribute::delete_options(&mut *tx, &removed).await?;
            tracing::debug!(attribute_id = id, options = ?removed, dropped, "Attribute options removed");
        }

        tx.commit().await?;
        attribute::find_by_id(&self.pool, id).await
    }

    async fn delete_attribute(&self, id: i64) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;
        product::delete_by_attribute(&mut *tx, id).await?;
        binding::delete_by_attribute(&mut *tx, id).await?;
        let options: Vec<i64> = attribute::find_options(&mut *tx, id)
            .await?
            .into_iter()
            .map(|o| o.id)
            .collect();
        attribute::delete_options(&mut *tx, &options).await?;
        let deleted = attribute::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn find_category(&self, id: i64) -> RepoResult<Option<CategoryNode>> {
        category::find_by_id(&self.pool, id).await
    }

    async fn find_category_bindings(
        &self,
        category_id: i64,
    ) -> RepoResult<Vec<CategoryAttributeBinding>> {
        binding::find_by_category(&self.pool, category_id).await
    }

    async fn replace_category_bindings(
        &self,
        category_id: i64,
        bindings: &[CategoryAttributeBinding],
    ) -> RepoResult<ReplaceSummary> {
        let mut tx = self.pool.begin().await?;
        let current = binding::find_by_category(&mut *tx, category_id).await?;
        let plan = plan_replace(&current, bindings);
        if plan.is_noop() {
            return Ok(plan.summary());
        }

        for attribute_id in &plan.delete {
            binding::delete(&mut *tx, category_id, *attribute_id).await?;
        }
        for row in &plan.update {
            binding::update(&mut *tx, row).await?;
        }
        for row in &plan.insert {
            binding::insert(&mut *tx, row).await?;
        }

        tx.commit().await?;
        Ok(plan.summary())
    }

    async fn find_product(&self, id: i64) -> RepoResult<Option<ProductRef>> {
        product::find_by_id(&self.pool, id).await
    }

    async fn find_product_values(
        &self,
        product_id: i64,
    ) -> RepoResult<Vec<ProductAttributeValue>> {
        product::find_values(&self.pool, product_id).await
    }

    async fn replace_product_values(
        &self,
        product_id: i64,
        values: &[ProductAttributeValue],
    ) -> RepoResult<ReplaceSummary> {
        let mut tx = self.pool.begin().await?;

        // 定义可能在调用方校验之后被修改，按事务内读到的定义复核
        for row in values {
            let data_type = attribute::find_data_type(&mut *tx, row.attribute_id).await?;
            let options = match row.value.option_id() {
                Some(_) => attribute::find_options(&mut *tx, row.attribute_id).await?,
                None => Vec::new(),
            };
            product::ensure_fits(row, data_type, |id| options.iter().any(|o| o.id == id))?;
        }

        let current = product::find_values(&mut *tx, product_id).await?;
        let plan = plan_replace(&current, values);
        if plan.is_noop() {
            return Ok(plan.summary());
        }

        for attribute_id in &plan.delete {
            product::delete_value(&mut *tx, product_id, *attribute_id).await?;
        }
        for row in &plan.update {
            product::update_value(&mut *tx, row).await?;
        }
        for row in &plan.insert {
            product::insert_value(&mut *tx, row).await?;
        }

        tx.commit().await?;
        Ok(plan.summary())
    }
}
