use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, Row};
use tracing::debug;

use crate::{
    ChosenDB, ChosenRow, EntityKind, Error, dedup_ids, ensure_exists,
    error::Result,
    franchise::FranchiseShort,
    relation::{self, LinkOwner},
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateMovie {
    #[garde(length(min = 1, max = 100))]
    pub title: String,
    #[garde(length(max = 150))]
    pub genre: String,
    #[garde(range(min = 1800, max = 9999))]
    pub release_year: i32,
    #[garde(length(max = 50))]
    pub director: String,
    #[garde(length(max = 2048))]
    pub picture: String,
    #[garde(length(max = 2048))]
    pub trailer: String,
    #[garde(range(min = 0))]
    pub franchise_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct UpdateMovie {
    #[garde(range(min = 0))]
    pub id: i64,
    #[garde(length(min = 1, max = 100))]
    pub title: String,
    #[garde(length(max = 150))]
    pub genre: String,
    #[garde(range(min = 1800, max = 9999))]
    pub release_year: i32,
    #[garde(length(max = 50))]
    pub director: String,
    #[garde(length(max = 2048))]
    pub picture: String,
    #[garde(length(max = 2048))]
    pub trailer: String,
    #[garde(range(min = 0))]
    pub franchise_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub director: String,
    pub picture: String,
    pub trailer: String,
    pub franchise: Option<FranchiseShort>,
    /// Ids of characters appearing in the movie, ascending.
    pub characters: Vec<i64>,
}

impl Movie {
    pub fn franchise_id(&self) -> Option<i64> {
        self.franchise.as_ref().map(|f| f.id)
    }
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let franchise = match row.try_get::<Option<i64>, _>("franchise_id")? {
            Some(id) => Some(FranchiseShort {
                id,
                name: row.try_get("franchise_name")?,
            }),
            None => None,
        };
        Ok(Movie {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            genre: row.try_get("genre")?,
            release_year: row.try_get("release_year")?,
            director: row.try_get("director")?,
            picture: row.try_get("picture")?,
            trailer: row.try_get("trailer")?,
            franchise,
            characters: Vec::new(),
        })
    }
}

const SELECT_MOVIE: &str = r#"
SELECT m.id, m.title, m.genre, m.release_year, m.director, m.picture, m.trailer, m.franchise_id,
f.name AS franchise_name
FROM movie m
LEFT JOIN franchise f ON m.franchise_id = f.id
"#;

/// Movies with their franchise joined, characters not loaded.
pub(crate) async fn fetch_movies<'c, E>(
    filter: &str,
    param: Option<i64>,
    executor: E,
) -> Result<Vec<Movie>>
where
    E: Executor<'c, Database = ChosenDB>,
{
    let sql = format!("{SELECT_MOVIE} {filter} ORDER BY m.id");
    let mut query = sqlx::query_as::<_, Movie>(&sql);
    if let Some(param) = param {
        query = query.bind(param);
    }
    let records = query.fetch_all(executor).await?;
    Ok(records)
}

pub(crate) async fn attach_characters<'c, E>(movies: &mut [Movie], executor: E) -> Result<()>
where
    E: Executor<'c, Database = ChosenDB> + Copy,
{
    let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
    let mut links = relation::linked_ids(LinkOwner::Movie, &ids, executor).await?;
    for movie in movies.iter_mut() {
        movie.characters = links.remove(&movie.id).unwrap_or_default();
    }
    Ok(())
}

pub type MovieRepository = MovieRepositoryImpl<Pool<ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Fails with franchise not found if `franchise_id` points nowhere.
    pub async fn create(&self, payload: CreateMovie) -> Result<Movie> {
        let mut tx = self.executor.begin().await?;
        if let Some(franchise_id) = payload.franchise_id {
            ensure_exists(EntityKind::Franchise, franchise_id, &mut *tx).await?;
        }
        let result = sqlx::query(
            "INSERT INTO movie (title, genre, release_year, director, picture, trailer, franchise_id) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.genre)
        .bind(payload.release_year)
        .bind(&payload.director)
        .bind(&payload.picture)
        .bind(&payload.trailer)
        .bind(payload.franchise_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!("Created movie {id}");
        self.get(id).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        crate::exists(EntityKind::Movie, id, &self.executor).await
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        let mut records = fetch_movies("WHERE m.id = ?", Some(id), &self.executor).await?;
        if records.is_empty() {
            return Err(Error::RecordNotFound {
                kind: EntityKind::Movie,
                id,
            });
        }
        attach_characters(&mut records, &self.executor).await?;
        Ok(records.swap_remove(0))
    }

    pub async fn list(&self) -> Result<Vec<Movie>> {
        let mut records = fetch_movies("", None, &self.executor).await?;
        attach_characters(&mut records, &self.executor).await?;
        Ok(records)
    }

    /// Overwrites all scalar fields including the franchise reference.
    pub async fn update(&self, payload: UpdateMovie) -> Result<Movie> {
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Movie, payload.id, &mut *tx).await?;
        if let Some(franchise_id) = payload.franchise_id {
            ensure_exists(EntityKind::Franchise, franchise_id, &mut *tx).await?;
        }
        sqlx::query(
            "UPDATE movie SET title = ?, genre = ?, release_year = ?, director = ?, picture = ?, trailer = ?, franchise_id = ? WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.genre)
        .bind(payload.release_year)
        .bind(&payload.director)
        .bind(&payload.picture)
        .bind(&payload.trailer)
        .bind(payload.franchise_id)
        .bind(payload.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get(payload.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Movie, id, &mut *tx).await?;
        relation::clear_links(LinkOwner::Movie, id, &mut tx).await?;
        sqlx::query("DELETE FROM movie WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn character_ids(&self, id: i64) -> Result<Vec<i64>> {
        ensure_exists(EntityKind::Movie, id, &self.executor).await?;
        let mut links = relation::linked_ids(LinkOwner::Movie, &[id], &self.executor).await?;
        Ok(links.remove(&id).unwrap_or_default())
    }

    /// Sets the movie's characters to exactly `character_ids`.
    /// Nothing is changed if the movie or any of the characters does not exist.
    pub async fn replace_characters(&self, id: i64, character_ids: &[i64]) -> Result<Vec<i64>> {
        let character_ids = dedup_ids(character_ids);
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Movie, id, &mut *tx).await?;
        for character_id in &character_ids {
            ensure_exists(EntityKind::Character, *character_id, &mut *tx).await?;
        }
        relation::replace_links(LinkOwner::Movie, id, &character_ids, &mut tx).await?;
        tx.commit().await?;
        debug!("Movie {id} now linked to characters {character_ids:?}");
        Ok(character_ids)
    }
}
