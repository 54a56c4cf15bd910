use clap::{Args, Subcommand};
use filmdb_service::{
    Services,
    character::{CreateCharacter, UpdateCharacter},
};
use garde::Validate as _;

use crate::commands::{Executor, print_json};

#[derive(Args, Debug)]
pub struct CharacterFields {
    #[arg(long, help = "Full name of the character")]
    full_name: String,
    #[arg(long, help = "Alias or nickname")]
    alias: Option<String>,
    #[arg(long, default_value = "", help = "Gender")]
    gender: String,
    #[arg(long, help = "Picture URL")]
    picture: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CharacterCmd {
    /// List all characters
    List,
    /// Show one character with its movie ids
    Get {
        #[arg(help = "Character id")]
        id: i64,
    },
    /// Find characters by part of their name
    Find {
        name: String,
    },
    /// Add a new character, it starts without movies
    Add(CharacterFields),
    /// Replace all fields of a character
    Update {
        #[arg(help = "Character id")]
        id: i64,
        #[command(flatten)]
        fields: CharacterFields,
    },
    /// Delete a character and its movie links
    Delete {
        #[arg(help = "Character id")]
        id: i64,
    },
    /// Movies the character appears in
    Movies {
        #[arg(help = "Character id")]
        id: i64,
    },
    /// Set the character's movies to exactly the given ids
    SetMovies {
        #[arg(help = "Character id")]
        id: i64,
        #[arg(num_args = 0.., value_delimiter = ',', help = "Movie ids, comma separated")]
        movies: Vec<i64>,
    },
}

impl Executor for CharacterCmd {
    async fn run(self, services: &Services) -> anyhow::Result<()> {
        let service = &services.characters;
        match self {
            CharacterCmd::List => print_json(&service.get_all().await?),
            CharacterCmd::Get { id } => print_json(&service.get_by_id(id).await?),
            CharacterCmd::Find { name } => print_json(&service.get_by_name(&name).await?),
            CharacterCmd::Add(fields) => {
                let payload = CreateCharacter {
                    full_name: fields.full_name,
                    alias: fields.alias,
                    gender: fields.gender,
                    picture: fields.picture,
                };
                payload.validate()?;
                print_json(&service.add(payload).await?)
            }
            CharacterCmd::Update { id, fields } => {
                let payload = UpdateCharacter {
                    id,
                    full_name: fields.full_name,
                    alias: fields.alias,
                    gender: fields.gender,
                    picture: fields.picture,
                };
                payload.validate()?;
                print_json(&service.update(payload).await?)
            }
            CharacterCmd::Delete { id } => Ok(service.delete(id).await?),
            CharacterCmd::Movies { id } => print_json(&service.get_movies(id).await?),
            CharacterCmd::SetMovies { id, movies } => {
                service.update_movies(id, &movies).await?;
                print_json(&service.get_by_id(id).await?)
            }
        }
    }
}
