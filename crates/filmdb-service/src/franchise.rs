pub use filmdb_dal::franchise::{CreateFranchise, Franchise, UpdateFranchise};
use filmdb_dal::{Pool, character::Character, franchise::FranchiseRepository, movie::Movie};
use tracing::{debug, info, warn};

use crate::error::Result;

#[derive(Clone)]
pub struct FranchiseService {
    pool: Pool,
}

impl FranchiseService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> FranchiseRepository {
        FranchiseRepository::new(self.pool.clone())
    }

    /// All franchises with their movie ids.
    pub async fn get_all(&self) -> Result<Vec<Franchise>> {
        let franchises = self.repository().list().await?;
        debug!("Loaded {} franchises", franchises.len());
        Ok(franchises)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Franchise> {
        Ok(self.repository().get(id).await?)
    }

    pub async fn add(&self, franchise: CreateFranchise) -> Result<Franchise> {
        let created = self.repository().create(franchise).await?;
        info!("Added franchise {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update(&self, franchise: UpdateFranchise) -> Result<Franchise> {
        let updated = self.repository().update(franchise).await?;
        info!("Updated franchise {}", updated.id);
        Ok(updated)
    }

    /// Removes the franchise, its movies stay with no franchise.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repository().delete(id).await?;
        info!("Deleted franchise {id}");
        Ok(())
    }

    pub async fn get_movies(&self, id: i64) -> Result<Vec<Movie>> {
        Ok(self.repository().list_movies(id).await?)
    }

    /// Every character of every movie in the franchise, each once.
    pub async fn get_characters(&self, id: i64) -> Result<Vec<Character>> {
        Ok(self.repository().list_characters(id).await?)
    }

    /// Makes `movie_ids` exactly the franchise's movies, all or nothing.
    pub async fn update_movies(&self, id: i64, movie_ids: &[i64]) -> Result<()> {
        let owned = self
            .repository()
            .replace_movies(id, movie_ids)
            .await
            .inspect_err(|e| warn!("Movies of franchise {id} left unchanged: {e}"))?;
        info!("Franchise {id} owns {} movies", owned.len());
        Ok(())
    }
}
