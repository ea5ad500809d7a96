//! Catalog components against a migrated in-memory SQLite database

use std::str::FromStr;
use std::sync::Arc;

use catalog_server::catalog::{
    AttributeCatalog, AttributeSchemaProjector, CatalogStore, CategoryBindingResolver,
    CompareEngine, CompareService, DisplayLabels, ProductAttributeValueStore,
};
use catalog_server::db::repository::RepoError;
use catalog_server::db::{DbService, SqliteCatalogStore};
use catalog_server::utils::{ErrorCode, ErrorKind};
use rust_decimal::Decimal;
use shared::AttributeQuery;
use shared::models::{
    AttributeOptionInput, AttributeUpdate, AttributeValue, AttributeValueRecord, BindingInput,
    DataType, ProductAttributeValue, ReplaceSummary,
};
use sqlx::SqlitePool;

struct Harness {
    pool: SqlitePool,
    store: Arc<dyn CatalogStore>,
    attributes: AttributeCatalog,
    bindings: CategoryBindingResolver,
    schema: AttributeSchemaProjector,
    values: ProductAttributeValueStore,
}

/// Категорії 1 ← 2 ← 7, товари 55 і 56 у категорії 7,
/// атрибут 10 "Колір" (enum: 1 Чорний, 2 Білий), 11 "Розмір" (enum: 3 XL)
async fn harness() -> Harness {
    let db = DbService::in_memory().await.unwrap();
    let pool = db.pool.clone();

    for sql in [
        "INSERT INTO category (id, name, parent_id) VALUES (1, 'Електроніка', NULL), (2, 'Телефони', 1), (7, 'Смартфони', 2)",
        "INSERT INTO product (id, category_id) VALUES (55, 7), (56, 7)",
        "INSERT INTO attribute (id, name, data_type, search_text) VALUES (10, 'Колір', 'enum', 'колір'), (11, 'Розмір', 'enum', 'розмір')",
        "INSERT INTO attribute_option (id, attribute_id, value) VALUES (1, 10, 'Чорний'), (2, 10, 'Білий'), (3, 11, 'XL')",
    ] {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }

    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool.clone()));
    Harness {
        pool,
        attributes: AttributeCatalog::new(store.clone()),
        bindings: CategoryBindingResolver::new(store.clone()),
        schema: AttributeSchemaProjector::new(store.clone()),
        values: ProductAttributeValueStore::new(store.clone(), DisplayLabels::default()),
        store,
    }
}

fn bind(attribute_id: i64, sort_order: i32) -> BindingInput {
    BindingInput {
        attribute_id,
        is_required: true,
        sort_order,
        is_filterable: false,
    }
}

async fn value_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM product_attribute_value")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_color_scenario() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();

    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let stored = h.values.get_values(55).await.unwrap();
    assert_eq!(
        serde_json::to_value(&stored).unwrap(),
        serde_json::json!([{
            "attributeId": 10,
            "optionId": 1,
            "valueString": null,
            "valueNumber": null,
            "valueBool": null
        }])
    );

    let display = h.values.get_display_values(55).await.unwrap();
    assert_eq!(display.values[0].display, "Чорний");
}

#[tokio::test]
async fn test_round_trip_idempotent_with_numbers() {
    let h = harness().await;
    let weight = h
        .attributes
        .create(shared::models::AttributeCreate {
            name: "Вага".into(),
            slug: Some("weight".into()),
            data_type: DataType::Number,
            unit: Some("г".into()),
            options: None,
        })
        .await
        .unwrap();
    let nfc = h
        .attributes
        .create(shared::models::AttributeCreate {
            name: "NFC".into(),
            slug: None,
            data_type: DataType::Bool,
            unit: None,
            options: None,
        })
        .await
        .unwrap();
    h.bindings
        .set_bindings(2, vec![bind(weight.id, 2), bind(nfc.id, 3)])
        .await
        .unwrap();
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();

    let mut input = vec![
        AttributeValueRecord::option(10, 2),
        AttributeValueRecord::number(weight.id, Decimal::from_str("187.50").unwrap()),
        AttributeValueRecord::boolean(nfc.id, true),
    ];
    input.sort_by_key(|r| r.attribute_id);

    let first = h.values.set_values(55, input.clone()).await.unwrap();
    assert_eq!(first.inserted, 3);
    let second = h.values.set_values(55, input.clone()).await.unwrap();
    assert_eq!(
        second,
        ReplaceSummary {
            unchanged: 3,
            ..Default::default()
        }
    );

    assert_eq!(h.values.get_values(55).await.unwrap(), input);
    assert_eq!(value_rows(&h.pool).await, 3);

    let display = h.values.get_display_values(55).await.unwrap();
    let rendered: Vec<_> = display.values.iter().map(|v| v.display.as_str()).collect();
    assert_eq!(rendered, vec!["Білий", "187.5г", "Так"]);
}

#[tokio::test]
async fn test_closest_wins() {
    let h = harness().await;
    h.bindings.set_bindings(1, vec![bind(10, 5)]).await.unwrap();
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();

    let schema = h.schema.get_effective_attribute_schema(7).await.unwrap();
    assert_eq!(schema.len(), 1);
    assert_eq!(schema.get(10).unwrap().sort_order, 1);

    let effective = h.bindings.get_effective_bindings(7).await.unwrap();
    assert_eq!(effective.direct.len(), 1);
    assert!(effective.inherited.is_empty());

    let path: Vec<_> = h
        .bindings
        .get_path(7)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(path, vec![7, 2, 1]);
}

#[tokio::test]
async fn test_enum_cross_reference_changes_nothing() {
    let h = harness().await;
    h.bindings
        .set_bindings(7, vec![bind(10, 1), bind(11, 2)])
        .await
        .unwrap();
    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let err = h
        .values
        .set_values(
            55,
            vec![
                AttributeValueRecord::option(11, 3),
                AttributeValueRecord::option(10, 3),
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.code, ErrorCode::AttributeOptionNotOwned);

    assert_eq!(
        h.values.get_values(55).await.unwrap(),
        vec![AttributeValueRecord::option(10, 1)]
    );
}

/// Values validated against a schema that changed before the write commits
#[tokio::test]
async fn test_value_write_rechecks_definitions_in_transaction() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();
    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let stale = |value| ProductAttributeValue {
        product_id: 55,
        attribute_id: 10,
        value,
    };

    // attribute 10 is enum, a text value no longer fits
    let err = h
        .store
        .replace_product_values(55, &[stale(AttributeValue::String("heavy".into()))])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // option 3 belongs to attribute 11
    let err = h
        .store
        .replace_product_values(55, &[stale(AttributeValue::Option(3))])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    assert_eq!(
        h.values.get_values(55).await.unwrap(),
        vec![AttributeValueRecord::option(10, 1)]
    );
}

#[tokio::test]
async fn test_disallowed_attribute_changes_nothing() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();
    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let err = h
        .values
        .set_values(
            55,
            vec![
                AttributeValueRecord::option(10, 2),
                AttributeValueRecord::option(11, 3),
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    assert_eq!(err.detail("attribute_id").unwrap(), 11);

    assert_eq!(
        h.values.get_values(55).await.unwrap(),
        vec![AttributeValueRecord::option(10, 1)]
    );
}

#[tokio::test]
async fn test_delete_attribute_cascades() {
    let h = harness().await;
    h.bindings.set_bindings(1, vec![bind(10, 1)]).await.unwrap();
    h.bindings.set_bindings(7, vec![bind(11, 2)]).await.unwrap();
    h.values
        .set_values(
            55,
            vec![
                AttributeValueRecord::option(10, 1),
                AttributeValueRecord::option(11, 3),
            ],
        )
        .await
        .unwrap();

    h.attributes.delete(10).await.unwrap();

    let schema = h.schema.get_effective_attribute_schema(7).await.unwrap();
    assert!(!schema.contains(10));
    assert!(h.store.find_category_bindings(1).await.unwrap().is_empty());
    assert_eq!(
        h.values.get_values(55).await.unwrap(),
        vec![AttributeValueRecord::option(11, 3)]
    );

    let options: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attribute_option WHERE attribute_id = 10")
            .fetch_one(&h.pool)
            .await
            .unwrap();
    assert_eq!(options, 0);

    let err = h.attributes.get(10).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AttributeNotFound);
}

#[tokio::test]
async fn test_update_reconciles_options_and_values() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();
    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();
    h.values
        .set_values(56, vec![AttributeValueRecord::option(10, 2)])
        .await
        .unwrap();

    // drop "Чорний", rename "Білий", add "Синій"
    let updated = h
        .attributes
        .update(
            10,
            AttributeUpdate {
                name: "Колір".into(),
                slug: Some("color".into()),
                data_type: DataType::Enum,
                unit: None,
                options: Some(vec![
                    AttributeOptionInput {
                        id: Some(2),
                        value: "Білосніжний".into(),
                    },
                    AttributeOptionInput {
                        id: None,
                        value: "Синій".into(),
                    },
                ]),
            },
        )
        .await
        .unwrap();
    let labels: Vec<_> = updated.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(labels, vec!["Білосніжний", "Синій"]);

    assert!(h.values.get_values(55).await.unwrap().is_empty());
    let display = h.values.get_display_values(56).await.unwrap();
    assert_eq!(display.values[0].display, "Білосніжний");
}

#[tokio::test]
async fn test_type_change_drops_values_and_options() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();
    h.values
        .set_values(55, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let updated = h
        .attributes
        .update(
            10,
            AttributeUpdate {
                name: "Колір".into(),
                slug: None,
                data_type: DataType::String,
                unit: None,
                options: None,
            },
        )
        .await
        .unwrap();
    assert!(updated.options.is_empty());
    assert_eq!(value_rows(&h.pool).await, 0);

    h.values
        .set_values(55, vec![AttributeValueRecord::string(10, "графітовий")])
        .await
        .unwrap();
    let display = h.values.get_display_values(55).await.unwrap();
    assert_eq!(display.values[0].display, "графітовий");
}

#[tokio::test]
async fn test_search_cyrillic_case_insensitive() {
    let h = harness().await;
    let (page, total) = h
        .store
        .search_attributes(&AttributeQuery::search("КОЛ"))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(page[0].id, 10);
    assert_eq!(page[0].options.len(), 2);

    let all = h.attributes.list(&AttributeQuery::default()).await.unwrap();
    assert_eq!(all.total, 2);
}

#[tokio::test]
async fn test_set_bindings_rollback_on_unknown_attribute() {
    let h = harness().await;
    h.bindings.set_bindings(7, vec![bind(10, 1)]).await.unwrap();

    let err = h
        .bindings
        .set_bindings(7, vec![bind(11, 0), bind(404, 0)])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AttributeNotFound);

    let stored = h.store.find_category_bindings(7).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].attribute_id, 10);
}

#[tokio::test]
async fn test_compare_products() {
    let h = harness().await;
    h.bindings
        .set_bindings(7, vec![bind(10, 1), bind(11, 2)])
        .await
        .unwrap();
    h.values
        .set_values(
            55,
            vec![
                AttributeValueRecord::option(10, 1),
                AttributeValueRecord::option(11, 3),
            ],
        )
        .await
        .unwrap();
    h.values
        .set_values(56, vec![AttributeValueRecord::option(10, 1)])
        .await
        .unwrap();

    let compare = CompareService::new(h.values.clone(), CompareEngine::new("—"), 4);
    let table = compare.compare(&[55, 56]).await.unwrap();

    let color = table.row(10).unwrap();
    assert!(color.cells.iter().all(|c| !c.differs));

    let size = table.row(11).unwrap();
    assert_eq!(size.cell(55).unwrap().display, "XL");
    assert_eq!(size.cell(56).unwrap().display, "—");
    assert!(size.cells.iter().all(|c| c.differs));

    let err = compare.compare(&[55, 999]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
    let err = compare.compare(&[55, 55]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
