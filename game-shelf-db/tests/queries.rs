use game_shelf_core::{GameMetadata, MetadataSource};
use game_shelf_db::*;

fn seed() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    for (name, title, source) in [
        ("Stardew Valley", "Stardew Valley", MetadataSource::Steam),
        ("Fallout 2", "Fallout 2: A Post Nuclear RPG", MetadataSource::Gog),
        ("Hades", "Hades", MetadataSource::Rawg),
    ] {
        upsert_game(&conn, name, &GameMetadata::new(title, source)).unwrap();
    }
    conn
}

#[test]
fn list_is_sorted_by_name() {
    let conn = seed();
    let names: Vec<String> = list_games(&conn)
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["Fallout 2", "Hades", "Stardew Valley"]);
}

#[test]
fn search_matches_name_or_title() {
    let conn = seed();

    let by_title = search_games(&conn, "nuclear").unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].name, "Fallout 2");
    assert_eq!(by_title[0].metadata.source, Some(MetadataSource::Gog));

    let by_name = search_games(&conn, "a").unwrap();
    assert_eq!(by_name.len(), 3);

    assert!(search_games(&conn, "zelda").unwrap().is_empty());
}

#[test]
fn count_matches_rows() {
    let conn = seed();
    assert_eq!(count_games(&conn).unwrap(), 3);
}

#[test]
fn corrupt_list_column_is_an_error() {
    let conn = seed();
    conn.execute("UPDATE games SET genres = 'not json' WHERE name = 'Hades'", [])
        .unwrap();
    assert!(find_game(&conn, "Hades").is_err());
    assert!(find_game(&conn, "Fallout 2").unwrap().is_some());
}
