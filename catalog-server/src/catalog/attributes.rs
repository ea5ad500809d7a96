//! Attribute Catalog
//!
//! Admin CRUD over attribute definitions and their enum options.

use std::collections::HashSet;
use std::sync::Arc;

use shared::models::{
    AttributeCreate, AttributeDefinition, AttributeDraft, AttributeOptionInput, AttributeUpdate,
    DataType,
};
use shared::util::{normalize_optional, normalize_slug};
use shared::{AttributeQuery, PaginatedResponse};

use super::store::CatalogStore;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_OPTION_LEN, MAX_UNIT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct AttributeCatalog {
    store: Arc<dyn CatalogStore>,
}

impl AttributeCatalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// 分页列表，按名称排序，可按 name/slug 搜索
    pub async fn list(
        &self,
        query: &AttributeQuery,
    ) -> AppResult<PaginatedResponse<AttributeDefinition>> {
        let (data, total) = self.store.search_attributes(query).await?;
        Ok(PaginatedResponse::new(
            data,
            total,
            query.page(),
            query.limit(),
        ))
    }

    pub async fn get(&self, id: i64) -> AppResult<AttributeDefinition> {
        self.store
            .find_attribute(id)
            .await?
            .ok_or_else(|| AppError::attribute_not_found(id))
    }

    /// 创建属性；仅 enum 类型保存选项
    pub async fn create(&self, payload: AttributeCreate) -> AppResult<AttributeDefinition> {
        let draft = build_draft(
            &payload.name,
            payload.slug.as_deref(),
            payload.data_type,
            payload.unit.as_deref(),
            payload.options.unwrap_or_default(),
        )?;
        if let Some(id) = draft.options.iter().find_map(|o| o.id) {
            return Err(AppError::with_message(
                ErrorCode::AttributeOptionNotFound,
                format!("Option {id} cannot be referenced by a new attribute"),
            )
            .with_detail("option_id", id));
        }

        let attribute = self.store.insert_attribute(&draft).await?;
        tracing::info!(
            attribute_id = attribute.id,
            name = %attribute.name,
            data_type = %attribute.data_type,
            options = attribute.options.len(),
            "Attribute created"
        );
        Ok(attribute)
    }

    /// 全量更新属性
    ///
    /// 选项按条目处理：无 id 新建，有 id 改值，遗漏的已有选项删除。
    /// 切换为非 enum 类型时删除全部选项。
    pub async fn update(&self, id: i64, payload: AttributeUpdate) -> AppResult<AttributeDefinition> {
        let draft = build_draft(
            &payload.name,
            payload.slug.as_deref(),
            payload.data_type,
            payload.unit.as_deref(),
            payload.options.unwrap_or_default(),
        )?;

        let current = self.get(id).await?;
        if let Some(option_id) = draft
            .options
            .iter()
            .filter_map(|o| o.id)
            .find(|option_id| !current.owns_option(*option_id))
        {
            return Err(AppError::with_message(
                ErrorCode::AttributeOptionNotFound,
                format!("Option {option_id} does not belong to attribute {id}"),
            )
            .with_detail("attribute_id", id)
            .with_detail("option_id", option_id));
        }

        let attribute = self
            .store
            .update_attribute(id, &draft)
            .await?
            .ok_or_else(|| AppError::attribute_not_found(id))?;
        tracing::info!(
            attribute_id = id,
            data_type = %attribute.data_type,
            options = attribute.options.len(),
            "Attribute updated"
        );
        Ok(attribute)
    }

    /// 硬删除：选项、分类绑定与商品属性值一并删除
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete_attribute(id).await? {
            return Err(AppError::attribute_not_found(id));
        }
        tracing::info!(attribute_id = id, "Attribute deleted");
        Ok(())
    }
}

/// Validate and normalize a create/update payload
fn build_draft(
    name: &str,
    slug: Option<&str>,
    data_type: DataType,
    unit: Option<&str>,
    options: Vec<AttributeOptionInput>,
) -> AppResult<AttributeDraft> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    let slug = normalize_slug(slug);
    validate_optional_text(&slug, "slug", MAX_NAME_LEN)?;
    let unit = normalize_optional(unit);
    validate_optional_text(&unit, "unit", MAX_UNIT_LEN)?;

    let options = if data_type.has_options() {
        normalize_options(options)?
    } else {
        Vec::new()
    };

    Ok(AttributeDraft {
        name: name.trim().to_string(),
        slug,
        data_type,
        unit,
        options,
    })
}

fn normalize_options(options: Vec<AttributeOptionInput>) -> AppResult<Vec<AttributeOptionInput>> {
    let mut seen_values = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut normalized = Vec::with_capacity(options.len());

    for option in options {
        validate_required_text(&option.value, "option", MAX_OPTION_LEN)?;
        let value = option.value.trim().to_string();

        if !seen_values.insert(value.to_lowercase()) {
            return Err(AppError::with_message(
                ErrorCode::AttributeOptionDuplicate,
                format!("Option \"{value}\" is listed more than once"),
            )
            .with_detail("value", value));
        }
        if let Some(id) = option.id
            && !seen_ids.insert(id)
        {
            return Err(AppError::validation(format!("Option {id} is listed more than once"))
                .with_detail("option_id", id));
        }

        normalized.push(AttributeOptionInput { id: option.id, value });
    }
    Ok(normalized)
}
