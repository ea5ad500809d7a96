//! Attribute Repository
//!
//! `attribute` + `attribute_option` tables. Options are loaded with their
//! attribute and ordered by id.

use std::collections::HashMap;

use super::{RepoError, RepoResult, placeholders};
use shared::AttributeQuery;
use shared::models::{AttributeDefinition, AttributeDraft, AttributeOption, DataType};
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_ATTRIBUTE: &str = "SELECT id, name, slug, data_type, unit FROM attribute";

#[derive(Debug, sqlx::FromRow)]
struct AttributeRow {
    id: i64,
    name: String,
    slug: Option<String>,
    data_type: String,
    unit: Option<String>,
}

impl AttributeRow {
    fn into_definition(self, options: Vec<AttributeOption>) -> RepoResult<AttributeDefinition> {
        let data_type = self
            .data_type
            .parse::<DataType>()
            .map_err(|e| RepoError::Database(format!("attribute {}: {e}", self.id)))?;
        Ok(AttributeDefinition {
            id: self.id,
            name: self.name,
            slug: self.slug,
            data_type,
            unit: self.unit,
            options,
        })
    }
}

/// Lower-cased search key: name and slug joined by a newline
pub fn search_text(name: &str, slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!("{}\n{}", name.to_lowercase(), slug.to_lowercase()),
        None => name.to_lowercase(),
    }
}

pub async fn find_data_type<'e, E>(executor: E, id: i64) -> RepoResult<Option<DataType>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let raw: Option<String> = sqlx::query_scalar("SELECT data_type FROM attribute WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    raw.map(|s| s.parse::<DataType>().map_err(RepoError::Database))
        .transpose()
}

pub async fn find_options<'e, E>(executor: E, attribute_id: i64) -> RepoResult<Vec<AttributeOption>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let options = sqlx::query_as::<_, AttributeOption>(
        "SELECT id, attribute_id, value FROM attribute_option WHERE attribute_id = ? ORDER BY id",
    )
    .bind(attribute_id)
    .fetch_all(executor)
    .await?;
    Ok(options)
}

/// Options of several attributes, grouped by attribute id
async fn find_options_for(
    pool: &SqlitePool,
    attribute_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<AttributeOption>>> {
    let mut grouped: HashMap<i64, Vec<AttributeOption>> = HashMap::new();
    if attribute_ids.is_empty() {
        return Ok(grouped);
    }
    let sql = format!(
        "SELECT id, attribute_id, value FROM attribute_option WHERE attribute_id IN ({}) ORDER BY id",
        placeholders(attribute_ids.len())
    );
    let mut query = sqlx::query_as::<_, AttributeOption>(&sql);
    for &id in attribute_ids {
        query = query.bind(id);
    }
    for option in query.fetch_all(pool).await? {
        grouped.entry(option.attribute_id).or_default().push(option);
    }
    Ok(grouped)
}

async fn attach_options(
    pool: &SqlitePool,
    rows: Vec<AttributeRow>,
) -> RepoResult<Vec<AttributeDefinition>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut options = find_options_for(pool, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let opts = options.remove(&row.id).unwrap_or_default();
            row.into_definition(opts)
        })
        .collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttributeDefinition>> {
    let row = sqlx::query_as::<_, AttributeRow>(&format!("{SELECT_ATTRIBUTE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => {
            let options = find_options(pool, id).await?;
            row.into_definition(options).map(Some)
        }
        None => Ok(None),
    }
}

/// Attributes by id, ordered by id; unknown ids are skipped
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<AttributeDefinition>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "{SELECT_ATTRIBUTE} WHERE id IN ({}) ORDER BY id",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, AttributeRow>(&sql);
    for &id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    attach_options(pool, rows).await
}

/// One page of attributes ordered by name, plus the total match count
pub async fn search(
    pool: &SqlitePool,
    query: &AttributeQuery,
) -> RepoResult<(Vec<AttributeDefinition>, u64)> {
    let term = query.search_term();

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attribute WHERE (?1 IS NULL OR instr(search_text, ?1) > 0)",
    )
    .bind(term.as_deref())
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, AttributeRow>(&format!(
        "{SELECT_ATTRIBUTE} WHERE (?1 IS NULL OR instr(search_text, ?1) > 0) \
         ORDER BY name, id LIMIT ?2 OFFSET ?3"
    ))
    .bind(term.as_deref())
    .bind(i64::from(query.limit()))
    .bind(query.offset() as i64)
    .fetch_all(pool)
    .await?;

    let attributes = attach_options(pool, rows).await?;
    Ok((attributes, total.max(0) as u64))
}

pub async fn insert(conn: &mut SqliteConnection, draft: &AttributeDraft, now: i64) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attribute (name, slug, data_type, unit, search_text, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(&draft.name)
    .bind(&draft.slug)
    .bind(draft.data_type.as_str())
    .bind(&draft.unit)
    .bind(search_text(&draft.name, draft.slug.as_deref()))
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Overwrite the scalar fields; `false` when the row does not exist
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    draft: &AttributeDraft,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE attribute SET name = ?1, slug = ?2, data_type = ?3, unit = ?4, search_text = ?5, \
         updated_at = ?6 WHERE id = ?7",
    )
    .bind(&draft.name)
    .bind(&draft.slug)
    .bind(draft.data_type.as_str())
    .bind(&draft.unit)
    .bind(search_text(&draft.name, draft.slug.as_deref()))
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM attribute WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Options ─────────────────────────────────────────────────────────

pub async fn insert_option(conn: &mut SqliteConnection, attribute_id: i64, value: &str) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attribute_option (attribute_id, value) VALUES (?1, ?2) RETURNING id",
    )
    .bind(attribute_id)
    .bind(value)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn update_option(conn: &mut SqliteConnection, option_id: i64, value: &str) -> RepoResult<()> {
    sqlx::query("UPDATE attribute_option SET value = ? WHERE id = ?")
        .bind(value)
        .bind(option_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete_options(conn: &mut SqliteConnection, option_ids: &[i64]) -> RepoResult<u64> {
    if option_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM attribute_option WHERE id IN ({})",
        placeholders(option_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for &id in option_ids {
        query = query.bind(id);
    }
    Ok(query.execute(conn).await?.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text() {
        assert_eq!(search_text("Колір", Some("color")), "колір\ncolor");
        assert_eq!(search_text("Діагональ", None), "діагональ");
    }
}
