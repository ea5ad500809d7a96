//! Attribute Schema Projector
//!
//! Joins the winning bindings of a category with the attribute definitions.
//! The result drives both form rendering and write validation, so it is
//! recomputed on every call.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{EffectiveAttribute, EffectiveSchema};

use super::resolver::CategoryBindingResolver;
use super::store::CatalogStore;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct AttributeSchemaProjector {
    store: Arc<dyn CatalogStore>,
    resolver: CategoryBindingResolver,
}

impl AttributeSchemaProjector {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            resolver: CategoryBindingResolver::new(store.clone()),
            store,
        }
    }

    /// 有效属性 schema，按 sortOrder、名称排序
    pub async fn get_effective_attribute_schema(
        &self,
        category_id: i64,
    ) -> AppResult<EffectiveSchema> {
        let winners = self.resolver.winning_bindings(category_id).await?;
        let ids: Vec<i64> = winners.iter().map(|w| w.binding.attribute_id).collect();
        let mut definitions: HashMap<_, _> = self
            .store
            .find_attributes(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut attributes: Vec<EffectiveAttribute> = winners
            .into_iter()
            .filter_map(|winner| {
                let definition = definitions.remove(&winner.binding.attribute_id)?;
                Some(EffectiveAttribute {
                    attribute_id: definition.id,
                    name: definition.name,
                    slug: definition.slug,
                    data_type: definition.data_type,
                    unit: definition.unit,
                    is_required: winner.binding.is_required,
                    sort_order: winner.binding.sort_order,
                    is_filterable: winner.binding.is_filterable,
                    options: definition.options,
                    source_category_id: winner.source.id,
                })
            })
            .collect();
        attributes.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.attribute_id.cmp(&b.attribute_id))
        });

        tracing::debug!(category_id, attributes = attributes.len(), "Effective schema resolved");
        Ok(EffectiveSchema {
            category_id,
            attributes,
        })
    }

    /// 店面筛选面板：仅 isFilterable 的属性
    pub async fn get_filterable_attributes(&self, category_id: i64) -> AppResult<EffectiveSchema> {
        let mut schema = self.get_effective_attribute_schema(category_id).await?;
        schema.attributes.retain(|a| a.is_filterable);
        Ok(schema)
    }
}
