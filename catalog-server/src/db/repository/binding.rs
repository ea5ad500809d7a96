//! Category Attribute Binding Repository

use super::RepoResult;
use shared::models::CategoryAttributeBinding;
use sqlx::SqliteConnection;

pub async fn find_by_category<'e, E>(
    executor: E,
    category_id: i64,
) -> RepoResult<Vec<CategoryAttributeBinding>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let bindings = sqlx::query_as::<_, CategoryAttributeBinding>(
        "SELECT category_id, attribute_id, is_required, sort_order, is_filterable \
         FROM category_attribute WHERE category_id = ? ORDER BY attribute_id",
    )
    .bind(category_id)
    .fetch_all(executor)
    .await?;
    Ok(bindings)
}

pub async fn insert(conn: &mut SqliteConnection, binding: &CategoryAttributeBinding) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO category_attribute (category_id, attribute_id, is_required, sort_order, is_filterable) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(binding.category_id)
    .bind(binding.attribute_id)
    .bind(binding.is_required)
    .bind(binding.sort_order)
    .bind(binding.is_filterable)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, binding: &CategoryAttributeBinding) -> RepoResult<()> {
    sqlx::query(
        "UPDATE category_attribute SET is_required = ?1, sort_order = ?2, is_filterable = ?3 \
         WHERE category_id = ?4 AND attribute_id = ?5",
    )
    .bind(binding.is_required)
    .bind(binding.sort_order)
    .bind(binding.is_filterable)
    .bind(binding.category_id)
    .bind(binding.attribute_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, category_id: i64, attribute_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM category_attribute WHERE category_id = ? AND attribute_id = ?")
        .bind(category_id)
        .bind(attribute_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Unbind an attribute from every category
pub async fn delete_by_attribute(conn: &mut SqliteConnection, attribute_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM category_attribute WHERE attribute_id = ?")
        .bind(attribute_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
