use super::*;

fn store() -> (tempfile::TempDir, CustomRatings) {
    let dir = tempfile::tempdir().unwrap();
    let ratings = CustomRatings::open(dir.path().join("custom_ratings.json")).unwrap();
    (dir, ratings)
}

#[test]
fn custom_rating_overrides_downloaded() {
    let (_dir, mut ratings) = store();
    assert_eq!(ratings.get_final_rating("Hades", Some(7.0)), Some(7.0));

    ratings.set_custom_rating("Hades", 8.5).unwrap();
    assert_eq!(ratings.get_final_rating("Hades", Some(7.0)), Some(8.5));
    assert_eq!(ratings.get_final_rating("Celeste", Some(7.0)), Some(7.0));
    assert_eq!(ratings.get_final_rating("Celeste", None), None);
}

#[test]
fn out_of_range_rating_leaves_state_unchanged() {
    let (dir, mut ratings) = store();
    ratings.set_custom_rating("Hades", 8.5).unwrap();

    for bad in [10.5, -0.1, f64::NAN] {
        assert!(matches!(
            ratings.set_custom_rating("Hades", bad),
            Err(LibError::InvalidRating { .. })
        ));
    }
    assert!(ratings.set_custom_rating("Celeste", 11.0).is_err());

    assert_eq!(ratings.get_custom_rating("Hades"), Some(8.5));
    assert!(!ratings.has_custom_rating("Celeste"));

    let reopened = CustomRatings::open(dir.path().join("custom_ratings.json")).unwrap();
    assert_eq!(reopened.get_custom_rating("Hades"), Some(8.5));
    assert!(reopened.all_custom_ratings().len() == 1);
}

#[test]
fn range_bounds_are_inclusive() {
    let (_dir, mut ratings) = store();
    ratings.set_custom_rating("Low", 0.0).unwrap();
    ratings.set_custom_rating("High", 10.0).unwrap();
    assert_eq!(ratings.all_custom_ratings().len(), 2);
}

#[test]
fn legacy_file_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom_ratings.json");
    std::fs::write(
        &path,
        r#"{"Hades": 9.0, "Celeste": {"rating": null, "tags": ["platformer"]}}"#,
    )
    .unwrap();

    let ratings = CustomRatings::open(&path).unwrap();
    assert_eq!(ratings.get_custom_rating("Hades"), Some(9.0));
    assert_eq!(ratings.get_custom_tags("Celeste"), ["platformer"]);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["Hades"]["rating"], 9.0);
    assert_eq!(raw["Hades"]["tags"], serde_json::json!([]));
}

#[test]
fn remove_rating_keeps_tagged_entries() {
    let (_dir, mut ratings) = store();
    ratings.set_custom_rating("Hades", 9.0).unwrap();
    ratings.add_custom_tag("Hades", "roguelike").unwrap();
    ratings.set_custom_rating("Celeste", 8.0).unwrap();

    assert!(ratings.remove_custom_rating("Hades").unwrap());
    assert!(ratings.remove_custom_rating("Celeste").unwrap());
    assert!(!ratings.remove_custom_rating("Celeste").unwrap());

    assert_eq!(ratings.get_custom_tags("Hades"), ["roguelike"]);
    assert!(ratings.all_custom_tags().contains_key("Hades"));
    assert!(ratings.all_custom_ratings().is_empty());
}

#[test]
fn tag_operations() {
    let (_dir, mut ratings) = store();
    ratings.set_custom_tags_str("Hades", " roguelike, action ,, action").unwrap();
    assert_eq!(ratings.get_custom_tags("Hades"), ["roguelike", "action"]);

    assert!(!ratings.add_custom_tag("Hades", "action").unwrap());
    assert!(ratings.add_custom_tag("Hades", "greek").unwrap());
    ratings.set_custom_tags("Celeste", vec!["platformer".into(), "action".into()]).unwrap();

    assert_eq!(
        ratings.all_unique_tags(),
        vec!["action", "greek", "platformer", "roguelike"]
    );

    assert!(ratings.remove_custom_tag("Celeste", "platformer").unwrap());
    assert!(ratings.remove_custom_tag("Celeste", "action").unwrap());
    assert!(!ratings.remove_custom_tag("Celeste", "action").unwrap());
    assert!(!ratings.all_custom_tags().contains_key("Celeste"));
}

#[test]
fn final_tags_prefer_custom() {
    let (_dir, mut ratings) = store();
    let downloaded = vec!["Action".to_string()];
    assert_eq!(ratings.get_final_tags("Hades", &downloaded), downloaded);

    ratings.add_custom_tag("Hades", "roguelike").unwrap();
    assert_eq!(ratings.get_final_tags("Hades", &downloaded), vec!["roguelike"]);
}

#[test]
fn parse_tags_splits_and_trims() {
    assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
    assert!(parse_tags(" , ").is_empty());
}
