//! In-memory [`CatalogStore`]
//!
//! Same observable behaviour as the SQLite store: ids are assigned
//! sequentially, every write happens under one lock so it is atomic.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::AttributeQuery;
use shared::models::{
    AttributeDefinition, AttributeDraft, AttributeOption, CategoryAttributeBinding, CategoryNode,
    ProductAttributeValue, ProductRef, ReplaceSummary,
};

use super::diff::plan_replace;
use super::store::CatalogStore;
use crate::db::repository::{RepoError, RepoResult, attribute::search_text, product::ensure_fits};

#[derive(Debug, Default)]
struct MemoryState {
    attributes: BTreeMap<i64, AttributeDefinition>,
    categories: HashMap<i64, CategoryNode>,
    products: HashMap<i64, ProductRef>,
    /// (category_id, attribute_id)
    bindings: BTreeMap<(i64, i64), CategoryAttributeBinding>,
    /// (product_id, attribute_id)
    values: BTreeMap<(i64, i64), ProductAttributeValue>,
    last_attribute_id: i64,
    last_option_id: i64,
}

impl MemoryState {
    fn next_attribute_id(&mut self) -> i64 {
        self.last_attribute_id += 1;
        self.last_attribute_id
    }

    fn next_option_id(&mut self) -> i64 {
        self.last_option_id += 1;
        self.last_option_id
    }

    fn drop_values_of_options(&mut self, option_ids: &HashSet<i64>) {
        self.values
            .retain(|_, v| v.value.option_id().is_none_or(|id| !option_ids.contains(&id)));
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    state: RwLock<MemoryState>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding (categories and products are owned elsewhere) ─────────

    pub fn put_category(&self, id: i64, name: &str, parent_id: Option<i64>) {
        self.state.write().categories.insert(
            id,
            CategoryNode {
                id,
                name: name.to_string(),
                parent_id,
                is_deleted: false,
            },
        );
    }

    pub fn soft_delete_category(&self, id: i64) {
        if let Some(node) = self.state.write().categories.get_mut(&id) {
            node.is_deleted = true;
        }
    }

    pub fn put_product(&self, id: i64, category_id: i64) {
        self.state.write().products.insert(
            id,
            ProductRef {
                id,
                category_id,
                is_deleted: false,
            },
        );
    }

    pub fn soft_delete_product(&self, id: i64) {
        if let Some(product) = self.state.write().products.get_mut(&id) {
            product.is_deleted = true;
        }
    }

    /// Insert an attribute with explicit ids; later generated ids continue after them
    pub fn put_attribute(&self, definition: AttributeDefinition) {
        let mut state = self.state.write();
        state.last_attribute_id = state.last_attribute_id.max(definition.id);
        if let Some(max_option) = definition.options.iter().map(|o| o.id).max() {
            state.last_option_id = state.last_option_id.max(max_option);
        }
        state.attributes.insert(definition.id, definition);
    }

    /// Number of stored values across all products
    pub fn value_count(&self) -> usize {
        self.state.read().values.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_attribute(&self, id: i64) -> RepoResult<Option<AttributeDefinition>> {
        Ok(self.state.read().attributes.get(&id).cloned())
    }

    async fn find_attributes(&self, ids: &[i64]) -> RepoResult<Vec<AttributeDefinition>> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        let state = self.state.read();
        Ok(state
            .attributes
            .values()
            .filter(|a| wanted.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn search_attributes(
        &self,
        query: &AttributeQuery,
    ) -> RepoResult<(Vec<AttributeDefinition>, u64)> {
        let term = query.search_term();
        let state = self.state.read();
        let mut matched: Vec<&AttributeDefinition> = state
            .attributes
            .values()
            .filter(|a| {
                term.as_deref()
                    .is_none_or(|t| search_text(&a.name, a.slug.as_deref()).contains(t))
            })
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn insert_attribute(&self, draft: &AttributeDraft) -> RepoResult<AttributeDefinition> {
        let mut state = self.state.write();
        let id = state.next_attribute_id();
        let mut options = Vec::new();
        if draft.data_type.has_options() {
            for input in &draft.options {
                options.push(AttributeOption {
                    id: state.next_option_id(),
                    attribute_id: id,
                    value: input.value.clone(),
                });
            }
        }
        let definition = AttributeDefinition {
            id,
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            data_type: draft.data_type,
            unit: draft.unit.clone(),
            options,
        };
        state.attributes.insert(id, definition.clone());
        Ok(definition)
    }

    async fn update_attribute(
        &self,
        id: i64,
        draft: &AttributeDraft,
    ) -> RepoResult<Option<AttributeDefinition>> {
        let mut state = self.state.write();
        let Some(current) = state.attributes.get(&id).cloned() else {
            return Ok(None);
        };

        // Validate before touching anything
        if draft.data_type.has_options() {
            for option_id in draft.options.iter().filter_map(|o| o.id) {
                if !current.owns_option(option_id) {
                    return Err(RepoError::Validation(format!(
                        "Option {option_id} does not belong to attribute {id}"
                    )));
                }
            }
        }

        if current.data_type != draft.data_type {
            state.values.retain(|_, v| v.attribute_id != id);
        }

        let mut options = Vec::new();
        if draft.data_type.has_options() {
            for input in &draft.options {
                let option_id = match input.id {
                    Some(option_id) => option_id,
                    None => state.next_option_id(),
                };
                options.push(AttributeOption {
                    id: option_id,
                    attribute_id: id,
                    value: input.value.clone(),
                });
            }
        }
        // sqlite returns options by id
        options.sort_by_key(|o| o.id);

        let kept: HashSet<i64> = options.iter().map(|o| o.id).collect();
        let removed: HashSet<i64> = current
            .options
            .iter()
            .map(|o| o.id)
            .filter(|option_id| !kept.contains(option_id))
            .collect();
        state.drop_values_of_options(&removed);

        let definition = AttributeDefinition {
            id,
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            data_type: draft.data_type,
            unit: draft.unit.clone(),
            options,
        };
        state.attributes.insert(id, definition.clone());
        Ok(Some(definition))
    }

    async fn delete_attribute(&self, id: i64) -> RepoResult<bool> {
        let mut state = self.state.write();
        if state.attributes.remove(&id).is_none() {
            return Ok(false);
        }
        state.bindings.retain(|(_, attribute_id), _| *attribute_id != id);
        state.values.retain(|(_, attribute_id), _| *attribute_id != id);
        Ok(true)
    }

    async fn find_category(&self, id: i64) -> RepoResult<Option<CategoryNode>> {
        Ok(self.state.read().categories.get(&id).cloned())
    }

    async fn find_category_bindings(
        &self,
        category_id: i64,
    ) -> RepoResult<Vec<CategoryAttributeBinding>> {
        let state = self.state.read();
        Ok(state
            .bindings
            .range((category_id, i64::MIN)..=(category_id, i64::MAX))
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn replace_category_bindings(
        &self,
        category_id: i64,
        bindings: &[CategoryAttributeBinding],
    ) -> RepoResult<ReplaceSummary> {
        let mut state = self.state.write();
        if let Some(missing) = bindings
            .iter()
            .find(|b| !state.attributes.contains_key(&b.attribute_id))
        {
            return Err(RepoError::Validation(format!(
                "Attribute {} does not exist",
                missing.attribute_id
            )));
        }

        let current: Vec<CategoryAttributeBinding> = state
            .bindings
            .range((category_id, i64::MIN)..=(category_id, i64::MAX))
            .map(|(_, b)| b.clone())
            .collect();
        let plan = plan_replace(&current, bindings);

        for attribute_id in &plan.delete {
            state.bindings.remove(&(category_id, *attribute_id));
        }
        for row in plan.update.iter().chain(plan.insert.iter()) {
            state
                .bindings
                .insert((category_id, row.attribute_id), row.clone());
        }
        Ok(plan.summary())
    }

    async fn find_product(&self, id: i64) -> RepoResult<Option<ProductRef>> {
        Ok(self.state.read().products.get(&id).cloned())
    }

    async fn find_product_values(
        &self,
        product_id: i64,
    ) -> RepoResult<Vec<ProductAttributeValue>> {
        let state = self.state.read();
        Ok(state
            .values
            .range((product_id, i64::MIN)..=(product_id, i64::MAX))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn replace_product_values(
        &self,
        product_id: i64,
        values: &[ProductAttributeValue],
    ) -> RepoResult<ReplaceSummary> {
        let mut state = self.state.write();
        for row in values {
            let attribute = state.attributes.get(&row.attribute_id);
            ensure_fits(row, attribute.map(|a| a.data_type), |id| {
                attribute.is_some_and(|a| a.owns_option(id))
            })?;
        }

        let current: Vec<ProductAttributeValue> = state
            .values
            .range((product_id, i64::MIN)..=(product_id, i64::MAX))
            .map(|(_, v)| v.clone())
            .collect();
        let plan = plan_replace(&current, values);

        for attribute_id in &plan.delete {
            state.values.remove(&(product_id, *attribute_id));
        }
        for row in plan.update.iter().chain(plan.insert.iter()) {
            state.values.insert((product_id, row.attribute_id), row.clone());
        }
        Ok(plan.summary())
    }
}
