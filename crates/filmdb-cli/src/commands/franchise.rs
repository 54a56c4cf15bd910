use clap::{Args, Subcommand};
use filmdb_service::{
    Services,
    franchise::{CreateFranchise, UpdateFranchise},
};
use garde::Validate as _;

use crate::commands::{Executor, print_json};

#[derive(Args, Debug)]
pub struct FranchiseFields {
    #[arg(long, help = "Franchise name")]
    name: String,
    #[arg(long, default_value = "", help = "Short description")]
    description: String,
}

#[derive(Subcommand, Debug)]
pub enum FranchiseCmd {
    /// List all franchises
    List,
    /// Show one franchise with its movie ids
    Get {
        #[arg(help = "Franchise id")]
        id: i64,
    },
    /// Add a new franchise
    Add(FranchiseFields),
    /// Replace the name and description of a franchise
    Update {
        #[arg(help = "Franchise id")]
        id: i64,
        #[command(flatten)]
        fields: FranchiseFields,
    },
    /// Delete a franchise, its movies are kept
    Delete {
        #[arg(help = "Franchise id")]
        id: i64,
    },
    /// Movies belonging to the franchise
    Movies {
        #[arg(help = "Franchise id")]
        id: i64,
    },
    /// Characters across all movies of the franchise
    Characters {
        #[arg(help = "Franchise id")]
        id: i64,
    },
    /// Set the franchise's movies to exactly the given ids
    SetMovies {
        #[arg(help = "Franchise id")]
        id: i64,
        #[arg(num_args = 0.., value_delimiter = ',', help = "Movie ids, comma separated")]
        movies: Vec<i64>,
    },
}

impl Executor for FranchiseCmd {
    async fn run(self, services: &Services) -> anyhow::Result<()> {
        let service = &services.franchises;
        match self {
            FranchiseCmd::List => print_json(&service.get_all().await?),
            FranchiseCmd::Get { id } => print_json(&service.get_by_id(id).await?),
            FranchiseCmd::Add(fields) => {
                let payload = CreateFranchise {
                    name: fields.name,
                    description: fields.description,
                };
                payload.validate()?;
                print_json(&service.add(payload).await?)
            }
            FranchiseCmd::Update { id, fields } => {
                let payload = UpdateFranchise {
                    id,
                    name: fields.name,
                    description: fields.description,
                };
                payload.validate()?;
                print_json(&service.update(payload).await?)
            }
            FranchiseCmd::Delete { id } => Ok(service.delete(id).await?),
            FranchiseCmd::Movies { id } => print_json(&service.get_movies(id).await?),
            FranchiseCmd::Characters { id } => print_json(&service.get_characters(id).await?),
            FranchiseCmd::SetMovies { id, movies } => {
                service.update_movies(id, &movies).await?;
                print_json(&service.get_by_id(id).await?)
            }
        }
    }
}
