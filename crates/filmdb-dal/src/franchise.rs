use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool};
use tracing::debug;

use crate::{
    ChosenDB, EntityKind, Error,
    character::{self, Character},
    dedup_ids, ensure_exists,
    error::Result,
    movie::{self, Movie},
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateFranchise {
    #[garde(length(min = 1, max = 50))]
    pub name: String,
    #[garde(length(max = 500))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct UpdateFranchise {
    #[garde(range(min = 0))]
    pub id: i64,
    #[garde(length(min = 1, max = 50))]
    pub name: String,
    #[garde(length(max = 500))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Franchise {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Ids of movies belonging to the franchise, ascending.
    #[sqlx(skip)]
    #[serde(default)]
    pub movies: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FranchiseShort {
    pub id: i64,
    pub name: String,
}

async fn attach_movies<'c, E>(franchises: &mut [Franchise], executor: E) -> Result<()>
where
    E: Executor<'c, Database = ChosenDB>,
{
    if franchises.is_empty() {
        return Ok(());
    }
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT franchise_id, id FROM movie WHERE franchise_id IS NOT NULL ORDER BY franchise_id, id",
    )
    .fetch(executor)
    .try_collect::<Vec<_>>()
    .await?;
    for franchise in franchises.iter_mut() {
        franchise.movies = rows
            .iter()
            .filter(|(franchise_id, _)| *franchise_id == franchise.id)
            .map(|(_, movie_id)| *movie_id)
            .collect();
    }
    Ok(())
}

pub type FranchiseRepository = FranchiseRepositoryImpl<Pool<ChosenDB>>;

pub struct FranchiseRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> FranchiseRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateFranchise) -> Result<Franchise> {
        let result = sqlx::query("INSERT INTO franchise (name, description) VALUES (?, ?)")
            .bind(&payload.name)
            .bind(&payload.description)
            .execute(&self.executor)
            .await?;

        let id = result.last_insert_rowid();
        debug!("Created franchise {id}");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Franchise> {
        let mut record = sqlx::query_as::<_, Franchise>(
            "SELECT id, name, description FROM franchise WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: EntityKind::Franchise,
            id,
        })?;
        record.movies = sqlx::query_scalar("SELECT id FROM movie WHERE franchise_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<Franchise>> {
        let mut records = sqlx::query_as::<_, Franchise>(
            "SELECT id, name, description FROM franchise ORDER BY id",
        )
        .fetch_all(&self.executor)
        .await?;
        attach_movies(&mut records, &self.executor).await?;
        Ok(records)
    }

    pub async fn update(&self, payload: UpdateFranchise) -> Result<Franchise> {
        let result = sqlx::query("UPDATE franchise SET name = ?, description = ? WHERE id = ?")
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(payload.id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound {
                kind: EntityKind::Franchise,
                id: payload.id,
            })
        } else {
            self.get(payload.id).await
        }
    }

    /// Detaches the franchise's movies, then removes the franchise. Movies are kept.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Franchise, id, &mut *tx).await?;
        let detached = sqlx::query("UPDATE movie SET franchise_id = NULL WHERE franchise_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM franchise WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(
            "Deleted franchise {id}, detached {} movies",
            detached.rows_affected()
        );
        Ok(())
    }

    pub async fn list_movies(&self, id: i64) -> Result<Vec<Movie>> {
        ensure_exists(EntityKind::Franchise, id, &self.executor).await?;
        let mut movies =
            movie::fetch_movies("WHERE m.franchise_id = ?", Some(id), &self.executor).await?;
        movie::attach_characters(&mut movies, &self.executor).await?;
        Ok(movies)
    }

    /// Distinct characters appearing in any movie of the franchise.
    pub async fn list_characters(&self, id: i64) -> Result<Vec<Character>> {
        ensure_exists(EntityKind::Franchise, id, &self.executor).await?;
        let mut characters = sqlx::query_as::<_, Character>(
            r#"
            SELECT DISTINCT c.id, c.full_name, c.alias, c.gender, c.picture
            FROM character c
            JOIN movie_characters mc ON mc.character_id = c.id
            JOIN movie m ON mc.movie_id = m.id
            WHERE m.franchise_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.executor)
        .await?;
        character::attach_movies(&mut characters, &self.executor).await?;
        Ok(characters)
    }

    /// Makes `movie_ids` exactly the franchise's movies. Movies dropped from the
    /// franchise lose their reference, listed movies are moved here from any other franchise.
    /// Nothing is changed if the franchise or any of the movies does not exist.
    pub async fn replace_movies(&self, id: i64, movie_ids: &[i64]) -> Result<Vec<i64>> {
        let movie_ids = dedup_ids(movie_ids);
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Franchise, id, &mut *tx).await?;
        for movie_id in &movie_ids {
            ensure_exists(EntityKind::Movie, *movie_id, &mut *tx).await?;
        }
        sqlx::query("UPDATE movie SET franchise_id = NULL WHERE franchise_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for movie_id in &movie_ids {
            sqlx::query("UPDATE movie SET franchise_id = ? WHERE id = ?")
                .bind(id)
                .bind(*movie_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!("Franchise {id} now owns movies {movie_ids:?}");
        Ok(movie_ids)
    }
}
