//! Category Binding Resolver
//!
//! Walks the category tree upwards and merges bindings closest-wins.
//! Nothing is cached: every call re-reads the tree and the bindings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared::models::{
    BindingInput, BindingView, CategoryAttributeBinding, CategoryNode, CategoryPathEntry,
    EffectiveBindings, InheritedBinding, ReplaceSummary,
};

use super::store::CatalogStore;
use crate::utils::{AppError, AppResult};

/// A binding that won the closest-wins merge, with the category that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub binding: CategoryAttributeBinding,
    pub source: CategoryPathEntry,
}

#[derive(Clone)]
pub struct CategoryBindingResolver {
    store: Arc<dyn CatalogStore>,
}

impl CategoryBindingResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    async fn active_category(&self, category_id: i64) -> AppResult<CategoryNode> {
        self.store
            .find_category(category_id)
            .await?
            .filter(CategoryNode::is_active)
            .ok_or_else(|| AppError::category_not_found(category_id))
    }

    /// 祖先路径 [self, parent, grandparent, ...]
    ///
    /// 遇到已访问的 id 即停止 (环保护)。父节点缺失时在此截断；
    /// 已软删除的祖先不出现在路径中，但继续沿其父节点向上。
    pub async fn get_path(&self, category_id: i64) -> AppResult<Vec<CategoryPathEntry>> {
        let start = self.active_category(category_id).await?;

        let mut path = vec![CategoryPathEntry {
            id: start.id,
            name: start.name,
            distance: 0,
        }];
        let mut visited = HashSet::from([start.id]);
        let mut next = start.parent_id;
        let mut distance = 0u32;

        while let Some(parent_id) = next {
            distance += 1;
            if !visited.insert(parent_id) {
                tracing::warn!(category_id, parent_id, "Category cycle detected, path truncated");
                break;
            }
            let Some(node) = self.store.find_category(parent_id).await? else {
                tracing::warn!(category_id, parent_id, "Dangling parent reference, path truncated");
                break;
            };
            next = node.parent_id;
            if node.is_deleted {
                continue;
            }
            path.push(CategoryPathEntry {
                id: node.id,
                name: node.name,
                distance,
            });
        }

        Ok(path)
    }

    /// 分类自身的绑定，按 sortOrder、属性名排序
    pub async fn get_direct_bindings(&self, category_id: i64) -> AppResult<Vec<BindingView>> {
        self.active_category(category_id).await?;
        let bindings = self.store.find_category_bindings(category_id).await?;
        let names = self.attribute_names(&bindings).await?;

        let mut views: Vec<BindingView> = bindings
            .iter()
            .filter_map(|b| view(b, &names))
            .collect();
        sort_views(&mut views, |v| v);
        Ok(views)
    }

    /// Closest-wins merge over the ancestor path, closest first
    pub async fn winning_bindings(&self, category_id: i64) -> AppResult<Vec<ResolvedBinding>> {
        let path = self.get_path(category_id).await?;

        let mut seen = HashSet::new();
        let mut winners = Vec::new();
        for entry in path {
            for binding in self.store.find_category_bindings(entry.id).await? {
                if seen.insert(binding.attribute_id) {
                    winners.push(ResolvedBinding {
                        binding,
                        source: entry.clone(),
                    });
                }
            }
        }
        Ok(winners)
    }

    /// 直接绑定 + 继承绑定 (标注来源分类)
    pub async fn get_effective_bindings(&self, category_id: i64) -> AppResult<EffectiveBindings> {
        let winners = self.winning_bindings(category_id).await?;
        let bindings: Vec<CategoryAttributeBinding> =
            winners.iter().map(|w| w.binding.clone()).collect();
        let names = self.attribute_names(&bindings).await?;

        let mut direct = Vec::new();
        let mut inherited = Vec::new();
        for winner in &winners {
            let Some(binding) = view(&winner.binding, &names) else {
                continue;
            };
            if winner.source.id == category_id {
                direct.push(binding);
            } else {
                inherited.push(InheritedBinding {
                    binding,
                    source_category_id: winner.source.id,
                    source_category_name: winner.source.name.clone(),
                });
            }
        }
        sort_views(&mut direct, |v| v);
        sort_views(&mut inherited, |i| &i.binding);

        Ok(EffectiveBindings {
            category_id,
            direct,
            inherited,
        })
    }

    /// 全量替换分类的直接绑定
    pub async fn set_bindings(
        &self,
        category_id: i64,
        inputs: Vec<BindingInput>,
    ) -> AppResult<ReplaceSummary> {
        self.active_category(category_id).await?;

        let mut ids = HashSet::new();
        for input in &inputs {
            if !ids.insert(input.attribute_id) {
                return Err(AppError::duplicate_attribute(input.attribute_id)
                    .with_detail("category_id", category_id));
            }
        }

        let wanted: Vec<i64> = inputs.iter().map(|b| b.attribute_id).collect();
        let known: HashSet<i64> = self
            .store
            .find_attributes(&wanted)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
            return Err(AppError::attribute_not_found(*missing).with_detail("category_id", category_id));
        }

        let bindings: Vec<CategoryAttributeBinding> = inputs
            .into_iter()
            .map(|b| b.into_binding(category_id))
            .collect();
        let summary = self
            .store
            .replace_category_bindings(category_id, &bindings)
            .await?;

        tracing::info!(
            category_id,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            unchanged = summary.unchanged,
            "Category bindings replaced"
        );
        Ok(summary)
    }

    async fn attribute_names(
        &self,
        bindings: &[CategoryAttributeBinding],
    ) -> AppResult<HashMap<i64, String>> {
        let ids: Vec<i64> = bindings.iter().map(|b| b.attribute_id).collect();
        Ok(self
            .store
            .find_attributes(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect())
    }
}

fn view(binding: &CategoryAttributeBinding, names: &HashMap<i64, String>) -> Option<BindingView> {
    // Attribute deleted between the two reads
    let name = names.get(&binding.attribute_id)?;
    Some(BindingView {
        attribute_id: binding.attribute_id,
        attribute_name: name.clone(),
        is_required: binding.is_required,
        sort_order: binding.sort_order,
        is_filterable: binding.is_filterable,
    })
}

fn sort_views<T>(items: &mut [T], key: impl Fn(&T) -> &BindingView) {
    items.sort_by(|a, b| {
        let (a, b) = (key(a), key(b));
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.attribute_name.cmp(&b.attribute_name))
            .then_with(|| a.attribute_id.cmp(&b.attribute_id))
    });
}
