//! Consistency layer over the film store.
//!
//! Each service is a stateless facade: it owns a pool handle and opens a
//! repository per call. Every failure to resolve an entity surfaces as
//! [`Error::EntityNotFound`], anything else comes back as [`Error::Store`].

pub mod character;
pub mod error;
pub mod franchise;
pub mod movie;

pub use character::CharacterService;
pub use error::{Error, Identifier, Result};
pub use filmdb_dal::{EntityKind, Pool};
pub use franchise::FranchiseService;
pub use movie::MovieService;

/// All services wired to one store.
#[derive(Clone)]
pub struct Services {
    pool: Pool,
    pub characters: CharacterService,
    pub movies: MovieService,
    pub franchises: FranchiseService,
}

impl Services {
    pub fn new(pool: Pool) -> Self {
        let characters = CharacterService::new(pool.clone());
        let movies = MovieService::new(pool.clone(), characters.clone());
        let franchises = FranchiseService::new(pool.clone());
        Services {
            pool,
            characters,
            movies,
            franchises,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}
