use clap::{Args, Subcommand};
use filmdb_service::{
    Services,
    movie::{CreateMovie, UpdateMovie},
};
use garde::Validate as _;

use crate::commands::{Executor, print_json};

#[derive(Args, Debug)]
pub struct MovieFields {
    #[arg(long, help = "Movie title")]
    title: String,
    #[arg(long, default_value = "", help = "Genres, comma separated")]
    genre: String,
    #[arg(long, help = "Year of release")]
    release_year: i32,
    #[arg(long, default_value = "", help = "Director name")]
    director: String,
    #[arg(long, default_value = "", help = "Poster URL")]
    picture: String,
    #[arg(long, default_value = "", help = "Trailer URL")]
    trailer: String,
    #[arg(long, help = "Franchise the movie belongs to, none if omitted")]
    franchise_id: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum MovieCmd {
    /// List all movies
    List,
    /// Show one movie with its franchise and character ids
    Get {
        #[arg(help = "Movie id")]
        id: i64,
    },
    /// Add a new movie, it starts without characters
    Add(MovieFields),
    /// Replace all fields of a movie, including its franchise
    Update {
        #[arg(help = "Movie id")]
        id: i64,
        #[command(flatten)]
        fields: MovieFields,
    },
    /// Delete a movie and its character links
    Delete {
        #[arg(help = "Movie id")]
        id: i64,
    },
    /// Ids of characters in the movie
    Characters {
        #[arg(help = "Movie id")]
        id: i64,
    },
    /// Set the movie's characters to exactly the given ids
    SetCharacters {
        #[arg(help = "Movie id")]
        id: i64,
        #[arg(num_args = 0.., value_delimiter = ',', help = "Character ids, comma separated")]
        characters: Vec<i64>,
    },
}

impl Executor for MovieCmd {
    async fn run(self, services: &Services) -> anyhow::Result<()> {
        let service = &services.movies;
        match self {
            MovieCmd::List => print_json(&service.get_all().await?),
            MovieCmd::Get { id } => print_json(&service.get_by_id(id).await?),
            MovieCmd::Add(fields) => {
                let payload = CreateMovie {
                    title: fields.title,
                    genre: fields.genre,
                    release_year: fields.release_year,
                    director: fields.director,
                    picture: fields.picture,
                    trailer: fields.trailer,
                    franchise_id: fields.franchise_id,
                };
                payload.validate()?;
                print_json(&service.add(payload).await?)
            }
            MovieCmd::Update { id, fields } => {
                let payload = UpdateMovie {
                    id,
                    title: fields.title,
                    genre: fields.genre,
                    release_year: fields.release_year,
                    director: fields.director,
                    picture: fields.picture,
                    trailer: fields.trailer,
                    franchise_id: fields.franchise_id,
                };
                payload.validate()?;
                print_json(&service.update(payload).await?)
            }
            MovieCmd::Delete { id } => Ok(service.delete(id).await?),
            MovieCmd::Characters { id } => print_json(&service.get_character_ids(id).await?),
            MovieCmd::SetCharacters { id, characters } => {
                service.update_characters(id, &characters).await?;
                print_json(&service.get_character_ids(id).await?)
            }
        }
    }
}
