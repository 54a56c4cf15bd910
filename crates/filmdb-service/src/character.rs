pub use filmdb_dal::character::{Character, CreateCharacter, UpdateCharacter};
use filmdb_dal::{EntityKind, Pool, character::CharacterRepository, movie::Movie};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

#[derive(Clone)]
pub struct CharacterService {
    pool: Pool,
}

impl CharacterService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> CharacterRepository {
        CharacterRepository::new(self.pool.clone())
    }

    /// All characters with their movie ids.
    pub async fn get_all(&self) -> Result<Vec<Character>> {
        let characters = self.repository().list().await?;
        debug!("Loaded {} characters", characters.len());
        Ok(characters)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Character> {
        Ok(self.repository().get(id).await?)
    }

    /// Characters whose full name contains `name`, ignoring case, non-ASCII letters included.
    /// An empty result is reported as not found for the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Vec<Character>> {
        let characters = self.repository().find_by_name(name).await?;
        if characters.is_empty() {
            debug!("No character name matches {name:?}");
            return Err(Error::not_found(EntityKind::Character, name));
        }
        Ok(characters)
    }

    /// Stores a new character. It starts without movies.
    pub async fn add(&self, character: CreateCharacter) -> Result<Character> {
        let created = self.repository().create(character).await?;
        info!("Added character {} ({})", created.id, created.full_name);
        Ok(created)
    }

    /// Replaces every scalar field, movie links stay as they are.
    pub async fn update(&self, character: UpdateCharacter) -> Result<Character> {
        let updated = self.repository().update(character).await?;
        info!("Updated character {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repository().delete(id).await?;
        info!("Deleted character {id}");
        Ok(())
    }

    pub async fn get_movies(&self, id: i64) -> Result<Vec<Movie>> {
        Ok(self.repository().list_movies(id).await?)
    }

    /// Makes `movie_ids` exactly the character's movies, all or nothing.
    pub async fn update_movies(&self, id: i64, movie_ids: &[i64]) -> Result<()> {
        let linked = self
            .repository()
            .replace_movies(id, movie_ids)
            .await
            .inspect_err(|e| warn!("Movies of character {id} left unchanged: {e}"))?;
        info!("Character {id} linked to {} movies", linked.len());
        Ok(())
    }
}
