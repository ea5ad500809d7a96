//! Product Repository
//!
//! Products are read only here; `product_attribute_value` rows are written
//! by the value store inside its transaction.

use std::str::FromStr;

use super::{RepoError, RepoResult, placeholders};
use rust_decimal::Decimal;
use shared::models::{AttributeValue, DataType, ProductAttributeValue, ProductRef};
use sqlx::SqliteConnection;

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<ProductRef>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let product = sqlx::query_as::<_, ProductRef>(
        "SELECT id, category_id, is_deleted FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(product)
}

#[derive(Debug, sqlx::FromRow)]
struct ValueRow {
    product_id: i64,
    attribute_id: i64,
    value_string: Option<String>,
    value_number: Option<String>,
    value_bool: Option<bool>,
    option_id: Option<i64>,
}

impl TryFrom<ValueRow> for ProductAttributeValue {
    type Error = RepoError;

    fn try_from(row: ValueRow) -> Result<Self, Self::Error> {
        let value = if let Some(s) = row.value_string {
            AttributeValue::String(s)
        } else if let Some(n) = row.value_number {
            let number = Decimal::from_str(&n).map_err(|e| {
                RepoError::Database(format!(
                    "product {} attribute {}: bad number {n:?}: {e}",
                    row.product_id, row.attribute_id
                ))
            })?;
            AttributeValue::Number(number)
        } else if let Some(b) = row.value_bool {
            AttributeValue::Bool(b)
        } else if let Some(id) = row.option_id {
            AttributeValue::Option(id)
        } else {
            return Err(RepoError::Database(format!(
                "product {} attribute {}: value row has no slot",
                row.product_id, row.attribute_id
            )));
        };
        Ok(ProductAttributeValue {
            product_id: row.product_id,
            attribute_id: row.attribute_id,
            value,
        })
    }
}

/// Column values for the four slots
struct Slots {
    string: Option<String>,
    number: Option<String>,
    boolean: Option<bool>,
    option_id: Option<i64>,
}

impl From<&AttributeValue> for Slots {
    fn from(value: &AttributeValue) -> Self {
        let mut slots = Slots {
            string: None,
            number: None,
            boolean: None,
            option_id: None,
        };
        match value {
            AttributeValue::String(s) => slots.string = Some(s.clone()),
            AttributeValue::Number(n) => slots.number = Some(n.to_string()),
            AttributeValue::Bool(b) => slots.boolean = Some(*b),
            AttributeValue::Option(id) => slots.option_id = Some(*id),
        }
        slots
    }
}

/// 写入前按当前存储的定义复核一条值
///
/// `data_type` 为 `None` 表示属性已不存在。
pub fn ensure_fits(
    value: &ProductAttributeValue,
    data_type: Option<DataType>,
    owns_option: impl Fn(i64) -> bool,
) -> RepoResult<()> {
    let Some(data_type) = data_type else {
        return Err(RepoError::NotFound(format!("Attribute {}", value.attribute_id)));
    };
    if value.value.data_type() != data_type {
        return Err(RepoError::Conflict(format!(
            "Attribute {} is now {data_type}, value is {}",
            value.attribute_id,
            value.value.data_type()
        )));
    }
    if let Some(option_id) = value.value.option_id()
        && !owns_option(option_id)
    {
        return Err(RepoError::Conflict(format!(
            "Option {option_id} no longer belongs to attribute {}",
            value.attribute_id
        )));
    }
    Ok(())
}

pub async fn find_values<'e, E>(executor: E, product_id: i64) -> RepoResult<Vec<ProductAttributeValue>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, ValueRow>(
        "SELECT product_id, attribute_id, value_string, value_number, value_bool, option_id \
         FROM product_attribute_value WHERE product_id = ? ORDER BY attribute_id",
    )
    .bind(product_id)
    .fetch_all(executor)
    .await?;
    rows.into_iter().map(ProductAttributeValue::try_from).collect()
}

pub async fn insert_value(conn: &mut SqliteConnection, value: &ProductAttributeValue) -> RepoResult<()> {
    let slots = Slots::from(&value.value);
    sqlx::query(
        "INSERT INTO product_attribute_value \
         (product_id, attribute_id, value_string, value_number, value_bool, option_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(value.product_id)
    .bind(value.attribute_id)
    .bind(slots.string)
    .bind(slots.number)
    .bind(slots.boolean)
    .bind(slots.option_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Rewrites all four slots so a previously populated slot is cleared
pub async fn update_value(conn: &mut SqliteConnection, value: &ProductAttributeValue) -> RepoResult<()> {
    let slots = Slots::from(&value.value);
    sqlx::query(
        "UPDATE product_attribute_value \
         SET value_string = ?1, value_number = ?2, value_bool = ?3, option_id = ?4 \
         WHERE product_id = ?5 AND attribute_id = ?6",
    )
    .bind(slots.string)
    .bind(slots.number)
    .bind(slots.boolean)
    .bind(slots.option_id)
    .bind(value.product_id)
    .bind(value.attribute_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete_value(conn: &mut SqliteConnection, product_id: i64, attribute_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM product_attribute_value WHERE product_id = ? AND attribute_id = ?")
        .bind(product_id)
        .bind(attribute_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Drop every stored value of one attribute
pub async fn delete_by_attribute(conn: &mut SqliteConnection, attribute_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM product_attribute_value WHERE attribute_id = ?")
        .bind(attribute_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

/// Drop values that reference any of the given options
pub async fn delete_by_options(conn: &mut SqliteConnection, option_ids: &[i64]) -> RepoResult<u64> {
    if option_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM product_attribute_value WHERE option_id IN ({})",
        placeholders(option_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for &id in option_ids {
        query = query.bind(id);
    }
    Ok(query.execute(conn).await?.rows_affected())
}
