//! Product Attribute Value Store
//!
//! Validated full-replace of a product's attribute values against the
//! effective schema of the product's category.

use std::collections::HashSet;
use std::sync::Arc;

use shared::models::{
    AttributeValue, AttributeValueRecord, DisplayValue, ProductAttributeValue, ProductDisplayValues,
    ProductRef, ReplaceSummary, SlotError,
};

use super::format::{DisplayLabels, format_value};
use super::schema::AttributeSchemaProjector;
use super::store::CatalogStore;
use crate::utils::validation::MAX_VALUE_LEN;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct ProductAttributeValueStore {
    store: Arc<dyn CatalogStore>,
    projector: AttributeSchemaProjector,
    labels: DisplayLabels,
}

impl ProductAttributeValueStore {
    pub fn new(store: Arc<dyn CatalogStore>, labels: DisplayLabels) -> Self {
        Self {
            projector: AttributeSchemaProjector::new(store.clone()),
            store,
            labels,
        }
    }

    async fn active_product(&self, product_id: i64) -> AppResult<ProductRef> {
        self.store
            .find_product(product_id)
            .await?
            .filter(ProductRef::is_active)
            .ok_or_else(|| AppError::product_not_found(product_id))
    }

    /// 商品已存储的属性值 (按 attributeId 排序)
    pub async fn get_values(&self, product_id: i64) -> AppResult<Vec<AttributeValueRecord>> {
        self.active_product(product_id).await?;
        let values = self.store.find_product_values(product_id).await?;
        Ok(values.iter().map(AttributeValueRecord::from).collect())
    }

    /// 全量替换商品属性值
    ///
    /// 全部校验通过后才写入；任何一项失败都不会修改已存储的值。
    /// isRequired 不在此处强制。
    pub async fn set_values(
        &self,
        product_id: i64,
        items: Vec<AttributeValueRecord>,
    ) -> AppResult<ReplaceSummary> {
        let product = self.active_product(product_id).await?;
        let schema = self
            .projector
            .get_effective_attribute_schema(product.category_id)
            .await?;

        let mut ids = HashSet::new();
        for item in &items {
            if !ids.insert(item.attribute_id) {
                return Err(AppError::duplicate_attribute(item.attribute_id)
                    .with_detail("product_id", product_id));
            }
        }

        if let Some(item) = items.iter().find(|i| !schema.contains(i.attribute_id)) {
            return Err(AppError::with_message(
                ErrorCode::AttributeNotAllowed,
                format!(
                    "Attribute {} is not part of category {} schema",
                    item.attribute_id, product.category_id
                ),
            )
            .with_detail("attribute_id", item.attribute_id)
            .with_detail("category_id", product.category_id)
            .with_detail("product_id", product_id));
        }

        let mut values = Vec::with_capacity(items.len());
        for item in &items {
            let Some(attribute) = schema.get(item.attribute_id) else {
                continue;
            };
            let value = item
                .to_value(attribute.data_type)
                .map_err(|e| slot_error(item.attribute_id, e))?;

            match &value {
                AttributeValue::Option(option_id) if !attribute.owns_option(*option_id) => {
                    return Err(AppError::with_message(
                        ErrorCode::AttributeOptionNotOwned,
                        format!(
                            "Option {option_id} does not belong to attribute {}",
                            item.attribute_id
                        ),
                    )
                    .with_detail("attribute_id", item.attribute_id)
                    .with_detail("option_id", *option_id));
                }
                AttributeValue::String(s) if s.chars().count() > MAX_VALUE_LEN => {
                    return Err(AppError::validation(format!(
                        "Value of attribute {} is too long (max {MAX_VALUE_LEN})",
                        item.attribute_id
                    ))
                    .with_detail("attribute_id", item.attribute_id));
                }
                _ => {}
            }

            values.push(ProductAttributeValue {
                product_id,
                attribute_id: item.attribute_id,
                value,
            });
        }
        values.sort_by_key(|v| v.attribute_id);

        let summary = self.store.replace_product_values(product_id, &values).await?;
        tracing::info!(
            product_id,
            category_id = product.category_id,
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            unchanged = summary.unchanged,
            "Product attribute values replaced"
        );
        Ok(summary)
    }

    /// 按当前 schema 格式化商品属性值；已不在 schema 中的值被忽略
    pub async fn get_display_values(&self, product_id: i64) -> AppResult<ProductDisplayValues> {
        let product = self.active_product(product_id).await?;
        let schema = self
            .projector
            .get_effective_attribute_schema(product.category_id)
            .await?;
        let stored = self.store.find_product_values(product_id).await?;

        let mut values: Vec<DisplayValue> = stored
            .iter()
            .filter_map(|row| {
                let attribute = schema.get(row.attribute_id)?;
                Some(DisplayValue {
                    attribute_id: row.attribute_id,
                    name: attribute.name.clone(),
                    sort_order: attribute.sort_order,
                    display: format_value(&row.value, attribute, &self.labels),
                })
            })
            .collect();
        values.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.attribute_id.cmp(&b.attribute_id))
        });

        Ok(ProductDisplayValues {
            product_id,
            category_id: product.category_id,
            values,
        })
    }
}

fn slot_error(attribute_id: i64, err: SlotError) -> AppError {
    let (message, slot) = match err {
        SlotError::Missing(slot) => (format!("Attribute {attribute_id} requires {slot}"), slot),
        SlotError::Unexpected(slot) => (
            format!("Attribute {attribute_id} does not accept {slot}"),
            slot,
        ),
    };
    AppError::with_message(ErrorCode::AttributeValueMismatch, message)
        .with_detail("attribute_id", attribute_id)
        .with_detail("slot", slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolver::CategoryBindingResolver;
    use crate::catalog::memory::MemoryCatalogStore;
    use crate::utils::ErrorKind;
    use crate::db::repository::RepoResult;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::AttributeQuery;
    use shared::models::{
        AttributeDefinition, AttributeDraft, AttributeOption, AttributeOptionInput, BindingInput,
        CategoryAttributeBinding, CategoryNode, DataType,
    };
    use std::str::FromStr;

    struct Fixture {
        store: Arc<MemoryCatalogStore>,
        values: ProductAttributeValueStore,
    }

    /// Колір (10, enum), Розмір (20, enum), Діагональ (30, number ")
    /// bound on category 7; product 55 lives in category 7.
    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryCatalogStore::new());
        store.put_category(7, "Смартфони", None);
        store.put_category(8, "Ноутбуки", None);
        store.put_product(55, 7);
        store.put_product(56, 8);
        store.put_attribute(AttributeDefinition {
            id: 10,
            name: "Колір".into(),
            slug: None,
            data_type: DataType::Enum,
            unit: None,
            options: vec![
                AttributeOption {
                    id: 1,
                    attribute_id: 10,
                    value: "Чорний".into(),
                },
                AttributeOption {
                    id: 2,
                    attribute_id: 10,
                    value: "Білий".into(),
                },
            ],
        });
        store.put_attribute(AttributeDefinition {
            id: 20,
            name: "Розмір".into(),
            slug: None,
            data_type: DataType::Enum,
            unit: None,
            options: vec![AttributeOption {
                id: 3,
                attribute_id: 20,
                value: "XL".into(),
            }],
        });
        store.put_attribute(AttributeDefinition {
            id: 30,
            name: "Діагональ".into(),
            slug: None,
            data_type: DataType::Number,
            unit: Some("\"".into()),
            options: vec![],
        });

        CategoryBindingResolver::new(store.clone())
            .set_bindings(
                7,
                vec![
                    BindingInput {
                        attribute_id: 10,
                        is_required: true,
                        sort_order: 1,
                        is_filterable: true,
                    },
                    BindingInput {
                        attribute_id: 20,
                        is_required: false,
                        sort_order: 2,
                        is_filterable: false,
                    },
                    BindingInput {
                        attribute_id: 30,
                        is_required: false,
                        sort_order: 0,
                        is_filterable: false,
                    },
                ],
            )
            .await
            .unwrap();

        Fixture {
            values: ProductAttributeValueStore::new(store.clone(), DisplayLabels::default()),
            store,
        }
    }

    #[tokio::test]
    async fn test_scenario_color_black() {
        let f = fixture().await;
        f.values
            .set_values(55, vec![AttributeValueRecord::option(10, 1)])
            .await
            .unwrap();

        let stored = f.values.get_values(55).await.unwrap();
        assert_eq!(stored, vec![AttributeValueRecord::option(10, 1)]);

        let display = f.values.get_display_values(55).await.unwrap();
        assert_eq!(display.values.len(), 1);
        assert_eq!(display.values[0].display, "Чорний");
    }

    #[tokio::test]
    async fn test_round_trip_and_idempotence() {
        let f = fixture().await;
        let input = vec![
            AttributeValueRecord::option(10, 2),
            AttributeValueRecord::number(30, Decimal::from_str("6.1").unwrap()),
        ];
        let first = f.values.set_values(55, input.clone()).await.unwrap();
        assert_eq!(first.inserted, 2);

        let second = f.values.set_values(55, input.clone()).await.unwrap();
        assert_eq!(
            second,
            ReplaceSummary {
                unchanged: 2,
                ..Default::default()
            }
        );

        let mut expected = input;
        expected.sort_by_key(|r| r.attribute_id);
        assert_eq!(f.values.get_values(55).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_full_replace_deletes_omitted() {
        let f = fixture().await;
        f.values
            .set_values(
                55,
                vec![
                    AttributeValueRecord::option(10, 1),
                    AttributeValueRecord::option(20, 3),
                ],
            )
            .await
            .unwrap();
        let summary = f
            .values
            .set_values(55, vec![AttributeValueRecord::option(10, 2)])
            .await
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(
            f.values.get_values(55).await.unwrap(),
            vec![AttributeValueRecord::option(10, 2)]
        );
    }

    #[tokio::test]
    async fn test_foreign_option_rejected_without_changes() {
        let f = fixture().await;
        f.values
            .set_values(55, vec![AttributeValueRecord::option(10, 1)])
            .await
            .unwrap();

        // option 3 belongs to attribute 20
        let err = f
            .values
            .set_values(55, vec![AttributeValueRecord::option(10, 3)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code, ErrorCode::AttributeOptionNotOwned);
        assert_eq!(err.detail("option_id").unwrap(), 3);

        assert_eq!(
            f.values.get_values(55).await.unwrap(),
            vec![AttributeValueRecord::option(10, 1)]
        );
    }

    #[tokio::test]
    async fn test_disallowed_attribute_rejected_without_changes() {
        let f = fixture().await;
        f.values
            .set_values(55, vec![AttributeValueRecord::option(10, 1)])
            .await
            .unwrap();

        f.store.put_attribute(AttributeDefinition {
            id: 40,
            name: "RAM".into(),
            slug: None,
            data_type: DataType::Number,
            unit: Some("GB".into()),
            options: vec![],
        });
        let err = f
            .values
            .set_values(
                55,
                vec![
                    AttributeValueRecord::option(10, 2),
                    AttributeValueRecord::number(40, Decimal::from(8)),
                ],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(err.detail("attribute_id").unwrap(), 40);

        assert_eq!(
            f.values.get_values(55).await.unwrap(),
            vec![AttributeValueRecord::option(10, 1)]
        );
    }

    #[tokio::test]
    async fn test_wrong_slot_rejected() {
        let f = fixture().await;
        let err = f
            .values
            .set_values(55, vec![AttributeValueRecord::string(30, "six")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AttributeValueMismatch);
        assert_eq!(err.detail("slot").unwrap(), "valueString");

        let err = f
            .values
            .set_values(
                55,
                vec![AttributeValueRecord {
                    attribute_id: 10,
                    ..Default::default()
                }],
            )
            .await
            .unwrap_err();
        assert_eq!(err.detail("slot").unwrap(), "optionId");
    }

    #[tokio::test]
    async fn test_duplicate_attribute_rejected() {
        let f = fixture().await;
        let err = f
            .values
            .set_values(
                55,
                vec![
                    AttributeValueRecord::option(10, 1),
                    AttributeValueRecord::option(10, 2),
                ],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AttributeDuplicateBinding);
    }

    #[tokio::test]
    async fn test_deleted_product_not_found() {
        let f = fixture().await;
        f.store.soft_delete_product(55);
        let err = f.values.get_values(55).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.detail("product_id").unwrap(), 55);

        let err = f.values.get_values(12345).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_display_values_follow_schema() {
        let f = fixture().await;
        f.values
            .set_values(
                55,
                vec![
                    AttributeValueRecord::option(10, 1),
                    AttributeValueRecord::number(30, Decimal::from_str("6.50").unwrap()),
                ],
            )
            .await
            .unwrap();

        let display = f.values.get_display_values(55).await.unwrap();
        let rendered: Vec<_> = display
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.display.as_str()))
            .collect();
        assert_eq!(rendered, vec![("Діагональ", "6.5\""), ("Колір", "Чорний")]);

        // unbinding hides stored values without deleting them
        CategoryBindingResolver::new(f.store.clone())
            .set_bindings(7, vec![])
            .await
            .unwrap();
        assert!(f.values.get_display_values(55).await.unwrap().values.is_empty());
        assert_eq!(f.values.get_values(55).await.unwrap().len(), 2);
    }

    /// Commits an attribute edit right before the value write, the way a
    /// concurrent admin request would.
    struct EditBeforeWrite {
        inner: Arc<MemoryCatalogStore>,
        attribute_id: i64,
        draft: AttributeDraft,
    }

    #[async_trait]
    impl CatalogStore for EditBeforeWrite {
        async fn find_attribute(&self, id: i64) -> RepoResult<Option<AttributeDefinition>> {
            self.inner.find_attribute(id).await
        }

        async fn find_attributes(&self, ids: &[i64]) -> RepoResult<Vec<AttributeDefinition>> {
            self.inner.find_attributes(ids).await
        }

        async fn search_attributes(
            &self,
            query: &AttributeQuery,
        ) -> RepoResult<(Vec<AttributeDefinition>, u64)> {
            self.inner.search_attributes(query).await
        }

        async fn insert_attribute(&self, draft: &AttributeDraft) -> RepoResult<AttributeDefinition> {
            self.inner.insert_attribute(draft).await
        }

        async fn update_attribute(
            &self,
            id: i64,
            draft: &AttributeDraft,
        ) -> RepoResult<Option<AttributeDefinition>> {
            self.inner.update_attribute(id, draft).await
        }

        async fn delete_attribute(&self, id: i64) -> RepoResult<bool> {
            self.inner.delete_attribute(id).await
        }

        async fn find_category(&self, id: i64) -> RepoResult<Option<CategoryNode>> {
            self.inner.find_category(id).await
        }

        async fn find_category_bindings(
            &self,
            category_id: i64,
        ) -> RepoResult<Vec<CategoryAttributeBinding>> {
            self.inner.find_category_bindings(category_id).await
        }

        async fn replace_category_bindings(
            &self,
            category_id: i64,
            bindings: &[CategoryAttributeBinding],
        ) -> RepoResult<ReplaceSummary> {
            self.inner.replace_category_bindings(category_id, bindings).await
        }

        async fn find_product(&self, id: i64) -> RepoResult<Option<ProductRef>> {
            self.inner.find_product(id).await
        }

        async fn find_product_values(
            &self,
            product_id: i64,
        ) -> RepoResult<Vec<ProductAttributeValue>> {
            self.inner.find_product_values(product_id).await
        }

        async fn replace_product_values(
            &self,
            product_id: i64,
            values: &[ProductAttributeValue],
        ) -> RepoResult<ReplaceSummary> {
            self.inner
                .update_attribute(self.attribute_id, &self.draft)
                .await?;
            self.inner.replace_product_values(product_id, values).await
        }
    }

    fn racing_values(
        f: &Fixture,
        attribute_id: i64,
        draft: AttributeDraft,
    ) -> ProductAttributeValueStore {
        let store = Arc::new(EditBeforeWrite {
            inner: f.store.clone(),
            attribute_id,
            draft,
        });
        ProductAttributeValueStore::new(store, DisplayLabels::default())
    }

    #[tokio::test]
    async fn test_type_change_during_write_is_rejected() {
        let f = fixture().await;
        let values = racing_values(
            &f,
            30,
            AttributeDraft {
                name: "Діагональ".into(),
                slug: None,
                data_type: DataType::String,
                unit: None,
                options: vec![],
            },
        );

        let err = values
            .set_values(55, vec![AttributeValueRecord::number(30, Decimal::from(6))])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let attribute = f.store.find_attribute(30).await.unwrap().unwrap();
        assert_eq!(attribute.data_type, DataType::String);
        assert_eq!(f.store.value_count(), 0);
    }

    #[tokio::test]
    async fn test_option_removed_during_write_is_rejected() {
        let f = fixture().await;
        // keep only "Білий" (id 2)
        let values = racing_values(
            &f,
            10,
            AttributeDraft {
                name: "Колір".into(),
                slug: None,
                data_type: DataType::Enum,
                unit: None,
                options: vec![AttributeOptionInput {
                    id: Some(2),
                    value: "Білий".into(),
                }],
            },
        );

        let err = values
            .set_values(55, vec![AttributeValueRecord::option(10, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(f.store.value_count(), 0);
    }
}
