//! Catalog persistence seam
//!
//! Services talk to storage only through [`CatalogStore`]. Every `replace_*`
//! and attribute write is atomic: either all rows change or none do.

use async_trait::async_trait;
use shared::AttributeQuery;
use shared::models::{
    AttributeDefinition, AttributeDraft, CategoryAttributeBinding, CategoryNode,
    ProductAttributeValue, ProductRef, ReplaceSummary,
};

use crate::db::repository::RepoResult;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ── Attributes ──────────────────────────────────────────────────

    async fn find_attribute(&self, id: i64) -> RepoResult<Option<AttributeDefinition>>;

    /// Attributes by id, ordered by id; unknown ids are skipped
    async fn find_attributes(&self, ids: &[i64]) -> RepoResult<Vec<AttributeDefinition>>;

    /// One page ordered by name, plus the total match count
    async fn search_attributes(
        &self,
        query: &AttributeQuery,
    ) -> RepoResult<(Vec<AttributeDefinition>, u64)>;

    async fn insert_attribute(&self, draft: &AttributeDraft) -> RepoResult<AttributeDefinition>;

    /// Overwrite an attribute and reconcile its options.
    ///
    /// Options with an id are renamed, without an id are created, and stored
    /// options missing from the draft are removed together with the product
    /// values pointing at them. A data type change drops the attribute's
    /// stored values. `None` when the attribute does not exist.
    async fn update_attribute(
        &self,
        id: i64,
        draft: &AttributeDraft,
    ) -> RepoResult<Option<AttributeDefinition>>;

    /// Remove the attribute with its options, bindings and values
    async fn delete_attribute(&self, id: i64) -> RepoResult<bool>;

    // ── Categories ──────────────────────────────────────────────────

    async fn find_category(&self, id: i64) -> RepoResult<Option<CategoryNode>>;

    async fn find_category_bindings(
        &self,
        category_id: i64,
    ) -> RepoResult<Vec<CategoryAttributeBinding>>;

    async fn replace_category_bindings(
        &self,
        category_id: i64,
        bindings: &[CategoryAttributeBinding],
    ) -> RepoResult<ReplaceSummary>;

    // ── Products ────────────────────────────────────────────────────

    async fn find_product(&self, id: i64) -> RepoResult<Option<ProductRef>>;

    /// Stored values ordered by attribute id
    async fn find_product_values(&self, product_id: i64)
    -> RepoResult<Vec<ProductAttributeValue>>;

    async fn replace_product_values(
        &self,
        product_id: i64,
        values: &[ProductAttributeValue],
    ) -> RepoResult<ReplaceSummary>;
}
