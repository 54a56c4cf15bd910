use crate::{Pool, error::Result};

const SAMPLE_DATA: &str = r#"
INSERT OR IGNORE INTO franchise (id, name, description)
VALUES (1, 'The Hunger Games film series', 'Science fiction dystopian adventure films, based on The Hunger Games trilogy novels by Suzanne Collins.');
INSERT OR IGNORE INTO franchise (id, name, description)
VALUES (2, 'Skywalker Saga', 'A Star Wars trilogy of subtrilogies; the original trilogy, the prequel trilogy, and the sequel trilogy.');

INSERT OR IGNORE INTO movie (id, title, genre, release_year, director, picture, trailer, franchise_id)
VALUES (1, 'The Hunger Games', 'Action, Adventure, Sci-Fi, Thriller', 2012, 'Gary Ross',
'https://m.media-amazon.com/images/M/MV5BMjA4NDg3NzYxMF5BMl5BanBnXkFtZTcwNTgyNzkyNw@@._V1_.jpg',
'https://www.youtube.com/watch?v=PbA63a7H0bo', 1);
INSERT OR IGNORE INTO movie (id, title, genre, release_year, director, picture, trailer, franchise_id)
VALUES (2, 'Episode 2 - Attack of the Clones', 'Action, Adventure, Fantasy, Sci-Fi', 2002, 'George Lucas',
'https://m.media-amazon.com/images/M/MV5BMDAzM2M0Y2UtZjRmZi00MzVlLTg4MjEtOTE3NzU5ZDVlMTU5XkEyXkFqcGdeQXVyNDUyOTg3Njg@._V1_.jpg',
'https://www.youtube.com/watch?v=gYbW1F_c9eM', 2);
INSERT OR IGNORE INTO movie (id, title, genre, release_year, director, picture, trailer, franchise_id)
VALUES (3, 'Episode 3 - Revenge of the Sith', 'Action, Adventure, Fantasy, Sci-Fi', 2005, 'George Lucas',
'https://m.media-amazon.com/images/M/MV5BNTc4MTc3NTQ5OF5BMl5BanBnXkFtZTcwOTg0NjI4NA@@._V1_.jpg',
'https://www.youtube.com/watch?v=5UnjrG_N8hU', 2);

INSERT OR IGNORE INTO character (id, full_name, alias, gender, picture)
VALUES (1, 'Katniss Everdeen', 'The Girl on Fire', 'Female', NULL);
INSERT OR IGNORE INTO character (id, full_name, alias, gender, picture)
VALUES (2, 'Peeta Mellark', NULL, 'Male', NULL);
INSERT OR IGNORE INTO character (id, full_name, alias, gender, picture)
VALUES (3, 'Anakin Skywalker', 'The Chosen One', 'Male', NULL);

INSERT OR IGNORE INTO movie_characters (movie_id, character_id) VALUES (1, 1);
INSERT OR IGNORE INTO movie_characters (movie_id, character_id) VALUES (1, 2);
INSERT OR IGNORE INTO movie_characters (movie_id, character_id) VALUES (2, 3);
INSERT OR IGNORE INTO movie_characters (movie_id, character_id) VALUES (3, 3);
"#;

/// Loads a small demo catalogue, rows that already exist are left alone.
pub async fn load_sample_data(pool: &Pool) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(SAMPLE_DATA).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("Sample data loaded");
    Ok(())
}
