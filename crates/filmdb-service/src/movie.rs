pub use filmdb_dal::movie::{CreateMovie, Movie, UpdateMovie};
use filmdb_dal::{EntityKind, Pool, dedup_ids, movie::MovieRepository};
use tracing::{debug, info, warn};

use crate::{
    character::CharacterService,
    error::{Error, Result},
};

#[derive(Clone)]
pub struct MovieService {
    pool: Pool,
    characters: CharacterService,
}

impl MovieService {
    pub fn new(pool: Pool, characters: CharacterService) -> Self {
        Self { pool, characters }
    }

    fn repository(&self) -> MovieRepository {
        MovieRepository::new(self.pool.clone())
    }

    /// All movies with franchise and character ids.
    pub async fn get_all(&self) -> Result<Vec<Movie>> {
        let movies = self.repository().list().await?;
        debug!("Loaded {} movies", movies.len());
        Ok(movies)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Movie> {
        Ok(self.repository().get(id).await?)
    }

    /// Stores a new movie without characters. A set franchise id must exist.
    pub async fn add(&self, movie: CreateMovie) -> Result<Movie> {
        let created = self
            .repository()
            .create(movie)
            .await
            .inspect_err(|e| warn!("Movie not added: {e}"))?;
        info!("Added movie {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Replaces every scalar field including the franchise reference.
    pub async fn update(&self, movie: UpdateMovie) -> Result<Movie> {
        let updated = self.repository().update(movie).await?;
        info!("Updated movie {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repository().delete(id).await?;
        info!("Deleted movie {id}");
        Ok(())
    }

    pub async fn get_character_ids(&self, id: i64) -> Result<Vec<i64>> {
        Ok(self.repository().character_ids(id).await?)
    }

    /// Makes `character_ids` exactly the movie's characters, all or nothing.
    pub async fn update_characters(&self, id: i64, character_ids: &[i64]) -> Result<()> {
        let repository = self.repository();
        if !repository.exists(id).await? {
            return Err(Error::not_found(EntityKind::Movie, id));
        }
        let character_ids = dedup_ids(character_ids);
        for character_id in &character_ids {
            self.characters
                .get_by_id(*character_id)
                .await
                .inspect_err(|e| warn!("Characters of movie {id} left unchanged: {e}"))?;
        }
        let linked = repository.replace_characters(id, &character_ids).await?;
        info!("Movie {id} linked to {} characters", linked.len());
        Ok(())
    }
}
