use std::collections::HashMap;

use crate::{ChosenConnection, ChosenDB, error::Result, placeholders};

/// Owner ids bound per query, well below SQLite's host parameter limit.
pub(crate) const IDS_PER_QUERY: usize = 500;

/// Side of the movie <-> character link the owner ids belong to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinkOwner {
    Movie,
    Character,
}

impl LinkOwner {
    fn columns(&self) -> (&'static str, &'static str) {
        match self {
            LinkOwner::Movie => ("movie_id", "character_id"),
            LinkOwner::Character => ("character_id", "movie_id"),
        }
    }
}

/// Loads linked ids for all given owners, targets sorted ascending.
/// Owners are queried in chunks of [`IDS_PER_QUERY`].
pub(crate) async fn linked_ids<'c, E>(
    owner: LinkOwner,
    owner_ids: &[i64],
    executor: E,
) -> Result<HashMap<i64, Vec<i64>>>
where
    E: sqlx::Executor<'c, Database = ChosenDB> + Copy,
{
    let (owner_col, target_col) = owner.columns();
    let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
    for chunk in owner_ids.chunks(IDS_PER_QUERY) {
        let sql = format!(
            "SELECT {owner_col}, {target_col} FROM movie_characters WHERE {owner_col} IN ({}) ORDER BY {owner_col}, {target_col}",
            placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
        for id in chunk {
            query = query.bind(*id);
        }
        for (owner_id, target_id) in query.fetch_all(executor).await? {
            links.entry(owner_id).or_default().push(target_id);
        }
    }
    Ok(links)
}

/// Drops every link of the owner and inserts the given targets.
/// Targets must be validated and de-duplicated by the caller, inside the same transaction.
pub(crate) async fn replace_links(
    owner: LinkOwner,
    owner_id: i64,
    target_ids: &[i64],
    conn: &mut ChosenConnection,
) -> Result<()> {
    let (owner_col, target_col) = owner.columns();
    let res = sqlx::query(&format!(
        "DELETE FROM movie_characters WHERE {owner_col} = ?"
    ))
    .bind(owner_id)
    .execute(&mut *conn)
    .await?;
    tracing::debug!(
        "Cleared {} links of {owner:?} {owner_id}",
        res.rows_affected()
    );

    let insert = format!("INSERT INTO movie_characters ({owner_col}, {target_col}) VALUES (?, ?)");
    for target_id in target_ids {
        sqlx::query(&insert)
            .bind(owner_id)
            .bind(*target_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub(crate) async fn clear_links(
    owner: LinkOwner,
    owner_id: i64,
    conn: &mut ChosenConnection,
) -> Result<()> {
    replace_links(owner, owner_id, &[], conn).await
}
