use futures::{TryStreamExt as _, future};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool};
use tracing::debug;

use crate::{
    ChosenDB, EntityKind, Error, dedup_ids, ensure_exists,
    error::Result,
    movie::{self, Movie},
    relation::{self, LinkOwner},
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateCharacter {
    #[garde(length(min = 1, max = 100))]
    pub full_name: String,
    #[garde(length(max = 50))]
    pub alias: Option<String>,
    #[garde(length(max = 10))]
    pub gender: String,
    #[garde(length(max = 2048))]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct UpdateCharacter {
    #[garde(range(min = 0))]
    pub id: i64,
    #[garde(length(min = 1, max = 100))]
    pub full_name: String,
    #[garde(length(max = 50))]
    pub alias: Option<String>,
    #[garde(length(max = 10))]
    pub gender: String,
    #[garde(length(max = 2048))]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Character {
    pub id: i64,
    pub full_name: String,
    pub alias: Option<String>,
    pub gender: String,
    pub picture: Option<String>,
    /// Ids of movies the character appears in, ascending.
    #[sqlx(skip)]
    #[serde(default)]
    pub movies: Vec<i64>,
}

const SELECT_CHARACTER: &str = "SELECT id, full_name, alias, gender, picture FROM character";

pub(crate) async fn attach_movies<'c, E>(characters: &mut [Character], executor: E) -> Result<()>
where
    E: Executor<'c, Database = ChosenDB> + Copy,
{
    let ids: Vec<i64> = characters.iter().map(|c| c.id).collect();
    let mut links = relation::linked_ids(LinkOwner::Character, &ids, executor).await?;
    for character in characters.iter_mut() {
        character.movies = links.remove(&character.id).unwrap_or_default();
    }
    Ok(())
}

pub type CharacterRepository = CharacterRepositoryImpl<Pool<ChosenDB>>;

pub struct CharacterRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> CharacterRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateCharacter) -> Result<Character> {
        let result = sqlx::query(
            "INSERT INTO character (full_name, alias, gender, picture) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.full_name)
        .bind(&payload.alias)
        .bind(&payload.gender)
        .bind(&payload.picture)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created character {id}");
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Character> {
        let mut record = sqlx::query_as::<_, Character>(&format!("{SELECT_CHARACTER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or(Error::RecordNotFound {
                kind: EntityKind::Character,
                id,
            })?;
        attach_movies(std::slice::from_mut(&mut record), &self.executor).await?;
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<Character>> {
        let mut records = sqlx::query_as::<_, Character>(&format!("{SELECT_CHARACTER} ORDER BY id"))
            .fetch_all(&self.executor)
            .await?;
        attach_movies(&mut records, &self.executor).await?;
        Ok(records)
    }

    /// Substring match on the full name, case folded with Unicode lowercasing.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Character>> {
        let needle = name.to_lowercase();
        let mut records: Vec<Character> =
            sqlx::query_as::<_, Character>(&format!("{SELECT_CHARACTER} ORDER BY id"))
                .fetch(&self.executor)
                .try_filter(|c| future::ready(c.full_name.to_lowercase().contains(&needle)))
                .try_collect()
                .await?;
        attach_movies(&mut records, &self.executor).await?;
        Ok(records)
    }

    pub async fn update(&self, payload: UpdateCharacter) -> Result<Character> {
        let result = sqlx::query(
            "UPDATE character SET full_name = ?, alias = ?, gender = ?, picture = ? WHERE id = ?",
        )
        .bind(&payload.full_name)
        .bind(&payload.alias)
        .bind(&payload.gender)
        .bind(&payload.picture)
        .bind(payload.id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound {
                kind: EntityKind::Character,
                id: payload.id,
            })
        } else {
            self.get(payload.id).await
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Character, id, &mut *tx).await?;
        relation::clear_links(LinkOwner::Character, id, &mut tx).await?;
        sqlx::query("DELETE FROM character WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_movies(&self, id: i64) -> Result<Vec<Movie>> {
        ensure_exists(EntityKind::Character, id, &self.executor).await?;
        let mut movies = movie::fetch_movies(
            "WHERE m.id IN (SELECT movie_id FROM movie_characters WHERE character_id = ?)",
            Some(id),
            &self.executor,
        )
        .await?;
        movie::attach_characters(&mut movies, &self.executor).await?;
        Ok(movies)
    }

    /// Sets the character's movies to exactly `movie_ids`.
    /// Nothing is changed if the character or any of the movies does not exist.
    pub async fn replace_movies(&self, id: i64, movie_ids: &[i64]) -> Result<Vec<i64>> {
        let movie_ids = dedup_ids(movie_ids);
        let mut tx = self.executor.begin().await?;
        ensure_exists(EntityKind::Character, id, &mut *tx).await?;
        for movie_id in &movie_ids {
            ensure_exists(EntityKind::Movie, *movie_id, &mut *tx).await?;
        }
        relation::replace_links(LinkOwner::Character, id, &movie_ids, &mut tx).await?;
        tx.commit().await?;
        debug!("Character {id} now linked to movies {movie_ids:?}");
        Ok(movie_ids)
    }
}
