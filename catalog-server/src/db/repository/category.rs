//! Category Repository (read only)

use super::RepoResult;
use shared::models::CategoryNode;

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<CategoryNode>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let node = sqlx::query_as::<_, CategoryNode>(
        "SELECT id, name, parent_id, is_deleted FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(node)
}
