use filmdb_service::{
    EntityKind, Error, Identifier, Result, Services,
    character::{CreateCharacter, UpdateCharacter},
    franchise::{CreateFranchise, UpdateFranchise},
    movie::{CreateMovie, UpdateMovie},
};
use sqlx::Executor;
use tracing_test::traced_test;

async fn init_services() -> Services {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    filmdb_dal::migrate(&conn).await.unwrap();
    filmdb_dal::sample::load_sample_data(&conn).await.unwrap();

    Services::new(conn)
}

fn assert_not_found<T: std::fmt::Debug>(
    res: Result<T>,
    kind: EntityKind,
    identifier: impl Into<Identifier>,
) {
    let expected = identifier.into();
    match res {
        Err(Error::EntityNotFound {
            kind: k,
            identifier: i,
        }) => {
            assert_eq!(k, kind);
            assert_eq!(i, expected);
        }
        other => panic!("Expected {kind} '{expected}' not found, got {other:?}"),
    }
}

fn new_character(name: &str) -> CreateCharacter {
    CreateCharacter {
        full_name: name.to_string(),
        alias: None,
        gender: "Female".to_string(),
        picture: None,
    }
}

fn new_movie(title: &str, franchise_id: Option<i64>) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        genre: "Drama".to_string(),
        release_year: 2015,
        director: "Someone".to_string(),
        picture: "https://example.com/p.jpg".to_string(),
        trailer: "https://example.com/t".to_string(),
        franchise_id,
    }
}

#[tokio::test]
#[traced_test]
async fn test_character_add_get_delete() {
    let services = init_services().await;
    let characters = &services.characters;

    let payload = CreateCharacter {
        alias: Some("Mockingjay".to_string()),
        picture: Some("https://example.com/k.jpg".to_string()),
        ..new_character("Primrose Everdeen")
    };
    let created = characters.add(payload.clone()).await.unwrap();
    let fetched = characters.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.full_name, payload.full_name);
    assert_eq!(fetched.alias, payload.alias);
    assert_eq!(fetched.gender, payload.gender);
    assert_eq!(fetched.picture, payload.picture);
    assert!(fetched.movies.is_empty());
    assert_eq!(characters.get_all().await.unwrap().len(), 4);

    characters.delete(created.id).await.unwrap();
    assert_not_found(
        characters.get_by_id(created.id).await,
        EntityKind::Character,
        created.id,
    );
    assert_not_found(
        characters.delete(created.id).await,
        EntityKind::Character,
        created.id,
    );
    assert!(logs_contain("Deleted character"));
}

#[tokio::test]
async fn test_character_update_overwrites_scalars_only() {
    let services = init_services().await;
    let characters = &services.characters;

    let updated = characters
        .update(UpdateCharacter {
            id: 1,
            full_name: "Katniss".to_string(),
            alias: None,
            gender: "Female".to_string(),
            picture: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Katniss");
    assert_eq!(updated.alias, None);
    assert_eq!(updated.movies, vec![1]);

    assert_not_found(
        characters
            .update(UpdateCharacter {
                id: 77,
                full_name: "Nobody".to_string(),
                alias: None,
                gender: String::new(),
                picture: None,
            })
            .await,
        EntityKind::Character,
        77,
    );
}

#[tokio::test]
async fn test_character_by_name() {
    let services = init_services().await;

    let found = services.characters.get_by_name("Anakin").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "Anakin Skywalker");

    assert_not_found(
        services.characters.get_by_name("Nonexistent").await,
        EntityKind::Character,
        "Nonexistent",
    );
}

#[tokio::test]
async fn test_character_by_name_folds_non_ascii_case() {
    let services = init_services().await;
    let added = services
        .characters
        .add(CreateCharacter {
            full_name: "Élodie Ørsted".to_string(),
            alias: None,
            gender: "Female".to_string(),
            picture: None,
        })
        .await
        .unwrap();

    let found = services.characters.get_by_name("élodie").await.unwrap();
    assert_eq!(found, vec![added.clone()]);
    let found = services.characters.get_by_name("ØRSTED").await.unwrap();
    assert_eq!(found, vec![added]);
}

#[tokio::test]
async fn test_get_all_with_many_characters() {
    let services = init_services().await;
    sqlx::query(
        r#"
        WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 33000)
        INSERT INTO character (full_name, gender) SELECT 'Extra ' || n, '' FROM seq
        "#,
    )
    .execute(services.pool())
    .await
    .unwrap();

    let all = services.characters.get_all().await.unwrap();
    assert_eq!(all.len(), 33_003);
    assert_eq!(all[2].movies, vec![2, 3]);
    assert!(all[3..].iter().all(|c| c.movies.is_empty()));
}

#[tokio::test]
#[traced_test]
async fn test_character_update_movies() {
    let services = init_services().await;
    let characters = &services.characters;

    characters.update_movies(1, &[2, 3]).await.unwrap();
    let first = characters.get_by_id(1).await.unwrap().movies;
    characters.update_movies(1, &[3, 2, 2]).await.unwrap();
    let second = characters.get_by_id(1).await.unwrap().movies;
    assert_eq!(first, vec![2, 3]);
    assert_eq!(first, second);

    let titles: Vec<String> = characters
        .get_movies(1)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Episode 2 - Attack of the Clones",
            "Episode 3 - Revenge of the Sith"
        ]
    );

    // ids are checked against movies, an existing character id does not count
    let extra = characters.add(new_character("Gale Hawthorne")).await.unwrap();
    assert_not_found(
        characters.update_movies(1, &[1, extra.id]).await,
        EntityKind::Movie,
        extra.id,
    );
    assert_eq!(characters.get_by_id(1).await.unwrap().movies, vec![2, 3]);
    assert!(logs_contain("left unchanged"));

    assert_not_found(
        characters.update_movies(99, &[1]).await,
        EntityKind::Character,
        99,
    );
    assert_not_found(characters.get_movies(99).await, EntityKind::Character, 99);
}

#[tokio::test]
async fn test_character_delete_unlinks_movies() {
    let services = init_services().await;

    services.characters.delete(3).await.unwrap();
    for movie_id in [2, 3] {
        let ids = services.movies.get_character_ids(movie_id).await.unwrap();
        assert!(ids.is_empty());
    }
    assert_eq!(
        services.movies.get_character_ids(1).await.unwrap(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn test_movie_add_and_franchise_validation() {
    let services = init_services().await;
    let movies = &services.movies;

    let payload = new_movie("Mockingjay", Some(1));
    let created = movies.add(payload.clone()).await.unwrap();
    let fetched = movies.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.title, payload.title);
    assert_eq!(fetched.release_year, payload.release_year);
    assert_eq!(fetched.trailer, payload.trailer);
    assert_eq!(fetched.franchise_id(), Some(1));
    assert!(fetched.characters.is_empty());

    let standalone = movies.add(new_movie("Standalone", None)).await.unwrap();
    assert_eq!(standalone.franchise, None);

    assert_not_found(
        movies.add(new_movie("Lost", Some(42))).await,
        EntityKind::Franchise,
        42,
    );
    assert_eq!(movies.get_all().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_movie_update() {
    let services = init_services().await;
    let movies = &services.movies;

    let update = UpdateMovie {
        id: 2,
        title: "Attack of the Clones".to_string(),
        genre: "Sci-Fi".to_string(),
        release_year: 2002,
        director: "George Lucas".to_string(),
        picture: String::new(),
        trailer: String::new(),
        franchise_id: None,
    };
    let updated = movies.update(update.clone()).await.unwrap();
    assert_eq!(updated.title, "Attack of the Clones");
    assert_eq!(updated.franchise, None);
    assert_eq!(updated.characters, vec![3]);

    assert_not_found(
        movies
            .update(UpdateMovie {
                franchise_id: Some(5),
                ..update.clone()
            })
            .await,
        EntityKind::Franchise,
        5,
    );
    assert_eq!(movies.get_by_id(2).await.unwrap().title, "Attack of the Clones");

    assert_not_found(
        movies
            .update(UpdateMovie {
                id: 50,
                ..update
            })
            .await,
        EntityKind::Movie,
        50,
    );
}

#[tokio::test]
async fn test_movie_update_characters() {
    let services = init_services().await;
    let movies = &services.movies;

    movies.update_characters(2, &[1, 3]).await.unwrap();
    assert_eq!(movies.get_character_ids(2).await.unwrap(), vec![1, 3]);

    assert_not_found(
        movies.update_characters(2, &[2, 8, 9]).await,
        EntityKind::Character,
        8,
    );
    assert_eq!(movies.get_character_ids(2).await.unwrap(), vec![1, 3]);

    assert_not_found(
        movies.update_characters(8, &[8]).await,
        EntityKind::Movie,
        8,
    );
    assert_not_found(movies.get_character_ids(8).await, EntityKind::Movie, 8);

    movies.update_characters(2, &[]).await.unwrap();
    assert!(movies.get_character_ids(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_movie_delete() {
    let services = init_services().await;

    services.movies.delete(1).await.unwrap();
    assert_not_found(services.movies.get_by_id(1).await, EntityKind::Movie, 1);
    assert!(services.characters.get_by_id(1).await.unwrap().movies.is_empty());
    assert!(services.franchises.get_by_id(1).await.unwrap().movies.is_empty());
    assert_not_found(services.movies.delete(1).await, EntityKind::Movie, 1);
}

#[tokio::test]
async fn test_franchise_crud() {
    let services = init_services().await;
    let franchises = &services.franchises;

    let created = franchises
        .add(CreateFranchise {
            name: "Dune".to_string(),
            description: "Arrakis".to_string(),
        })
        .await
        .unwrap();
    let fetched = franchises.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.name, "Dune");
    assert_eq!(fetched.description, "Arrakis");
    assert!(fetched.movies.is_empty());

    let updated = franchises
        .update(UpdateFranchise {
            id: created.id,
            name: "Dune saga".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Dune saga");
    assert_eq!(franchises.get_all().await.unwrap().len(), 3);

    assert_not_found(
        franchises
            .update(UpdateFranchise {
                id: 30,
                name: "Nothing".to_string(),
                description: String::new(),
            })
            .await,
        EntityKind::Franchise,
        30,
    );

    franchises.delete(created.id).await.unwrap();
    assert_not_found(
        franchises.get_by_id(created.id).await,
        EntityKind::Franchise,
        created.id,
    );
}

#[tokio::test]
async fn test_franchise_delete_keeps_movies() {
    let services = init_services().await;

    services.franchises.delete(2).await.unwrap();
    for movie_id in [2, 3] {
        let movie = services.movies.get_by_id(movie_id).await.unwrap();
        assert_eq!(movie.franchise_id(), None);
    }
    assert_not_found(
        services.franchises.get_movies(2).await,
        EntityKind::Franchise,
        2,
    );
    assert_not_found(services.franchises.delete(2).await, EntityKind::Franchise, 2);
}

#[tokio::test]
#[traced_test]
async fn test_franchise_characters_and_movie_replace() {
    let services = init_services().await;
    let franchises = &services.franchises;

    let ids: Vec<i64> = franchises
        .get_characters(1)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);

    // Anakin is in both saga movies but listed once
    let saga = franchises.get_characters(2).await.unwrap();
    assert_eq!(saga.len(), 1);

    services.movies.delete(3).await.unwrap();
    assert_not_found(
        franchises.update_movies(1, &[1, 3]).await,
        EntityKind::Movie,
        3,
    );
    assert_eq!(franchises.get_by_id(1).await.unwrap().movies, vec![1]);

    franchises.update_movies(1, &[2]).await.unwrap();
    franchises.update_movies(1, &[2]).await.unwrap();
    assert_eq!(franchises.get_by_id(1).await.unwrap().movies, vec![2]);
    assert_eq!(services.movies.get_by_id(1).await.unwrap().franchise, None);
    assert!(franchises.get_by_id(2).await.unwrap().movies.is_empty());

    let movie_titles: Vec<String> = franchises
        .get_movies(1)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(movie_titles, vec!["Episode 2 - Attack of the Clones"]);

    assert_not_found(
        franchises.update_movies(9, &[1]).await,
        EntityKind::Franchise,
        9,
    );
    assert_not_found(
        franchises.get_characters(9).await,
        EntityKind::Franchise,
        9,
    );
}
