//! Search-name cleanup and the offline rating heuristic.

use game_shelf_core::GameMetadata;
use game_shelf_lib::genre_hint;

/// Launcher decorations and punctuation removed before querying a catalog.
pub const SEARCH_NOISE: &[&str] = &[
    " (ModEngine)",
    " (Protected)",
    " (MCC Launcher)",
    " (Startup)",
    " (Pre-Launcher)",
    " (Mod - Armoredcore6)",
    " (Mod - Darksouls3)",
    " (Mod - Eldenring)",
    " (PS2)",
    " (PSX)",
    " (N64)",
    " (GameCube)",
    " (Wii)",
    " (Dreamcast)",
    " (Genesis)",
    " (SNES)",
    " (NES)",
    " (GBA)",
    " (NDS)",
    " (PSP)",
    " (MAME)",
    " (C64)",
    " (Amiga)",
    " (Atari2600)",
    "Launch ",
    " - ",
    ":",
    ";",
    "!",
    "?",
];

const TRADEMARKS: &[char] = &['™', '®', '©'];

const EDITION_WORDS: &[&str] = &[
    "game of the year edition",
    "goty edition",
    "definitive edition",
    "complete edition",
    "deluxe edition",
    "enhanced edition",
    "special edition",
    "remastered",
];

/// Well-known franchises and the rating assumed for them, checked in order.
pub const KNOWN_FRANCHISE_RATINGS: &[(&str, f64)] = &[
    ("witcher", 9.5),
    ("skyrim", 9.5),
    ("fallout", 9.0),
    ("elder scrolls", 9.0),
    ("dark souls", 9.0),
    ("bloodborne", 9.5),
    ("sekiro", 9.0),
    ("zelda", 9.5),
    ("mario", 9.0),
    ("pokemon", 8.5),
    ("halo", 8.5),
    ("gears", 8.0),
    ("mass effect", 9.0),
    ("dragon age", 8.5),
    ("bioshock", 9.0),
    ("portal", 9.5),
    ("half-life", 9.5),
    ("counter-strike", 8.5),
    ("dota", 8.5),
    ("league of legends", 8.0),
    ("world of warcraft", 8.5),
    ("minecraft", 8.5),
    ("terraria", 8.5),
    ("stardew valley", 8.5),
    ("civilization", 8.5),
    ("total war", 8.0),
    ("xcom", 8.5),
    ("doom", 8.5),
    ("quake", 8.0),
    ("wolfenstein", 8.0),
    ("tomb raider", 8.0),
    ("uncharted", 8.5),
    ("god of war", 9.0),
    ("spider-man", 8.5),
    ("batman", 8.5),
    ("assassin", 8.0),
    ("call of duty", 7.5),
    ("battlefield", 7.5),
    ("fifa", 7.0),
    ("nba", 7.0),
    ("madden", 7.0),
    ("nhl", 7.0),
];

const GENRE_BONUSES: &[(&str, f64)] = &[
    ("rpg", 0.5),
    ("strategy", 0.3),
    ("indie", 0.2),
    ("action", 0.1),
];

const BASE_RATING: f64 = 7.0;
const MIN_RATING: f64 = 5.0;
const MAX_RATING: f64 = 10.0;

/// Strip launcher tags, platform tags, trademark symbols, bracketed tags
/// and edition words from a display name, collapsing whitespace.
pub fn clean_game_name_for_search(name: &str) -> String {
    let mut clean: String = name.chars().filter(|c| !TRADEMARKS.contains(c)).collect();
    for noise in SEARCH_NOISE {
        clean = clean.replace(noise, " ");
    }
    clean = strip_brackets(&clean);

    let lower = clean.to_lowercase();
    for word in EDITION_WORDS {
        if let Some(pos) = lower.find(word) {
            let end = pos + word.len();
            if clean.get(pos..end).is_some_and(|s| s.eq_ignore_ascii_case(word)) {
                clean.replace_range(pos..end, " ");
            }
            break;
        }
    }

    let clean = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        name.trim().to_string()
    } else {
        clean
    }
}

/// Remove `(...)` and `[...]` groups.
fn strip_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth > 0 => {
                depth -= 1;
                out.push(' ');
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Rating guessed from the name and genres when no catalog supplies one.
///
/// Starts at 7.0, or the rating of the first known franchise in the name,
/// adds a small bonus for each of RPG, strategy, indie and action found in
/// the genres, and clamps to 5.0..=10.0.
pub fn assign_basic_rating(name: &str, genres: &[String]) -> f64 {
    let lower = name.to_lowercase();
    let mut rating = KNOWN_FRANCHISE_RATINGS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, score)| *score)
        .unwrap_or(BASE_RATING);

    let genres: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();
    for (keyword, bonus) in GENRE_BONUSES {
        if genres.iter().any(|g| g.contains(keyword)) {
            rating += bonus;
        }
    }
    rating.clamp(MIN_RATING, MAX_RATING)
}

/// Placeholder metadata for a game no catalog had anything on.
pub fn basic_metadata(name: &str) -> GameMetadata {
    let genres: Vec<String> = genre_hint(name).map(str::to_string).into_iter().collect();
    let mut meta = GameMetadata::basic(name);
    meta.rating = Some(assign_basic_rating(name, &genres));
    meta.genres = genres;
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_game_name_for_search() {
        assert_eq!(clean_game_name_for_search("Elden Ring (ModEngine)"), "Elden Ring");
        assert_eq!(clean_game_name_for_search("Launch Doom"), "Doom");
        assert_eq!(
            clean_game_name_for_search("Halo: The Master Chief Collection (MCC Launcher)"),
            "Halo The Master Chief Collection"
        );
        assert_eq!(
            clean_game_name_for_search("The Witcher® 3 - Game of the Year Edition"),
            "The Witcher 3"
        );
        assert_eq!(clean_game_name_for_search("Okami [HD] (PS2)"), "Okami");
        assert_eq!(clean_game_name_for_search("(Startup)"), "(Startup)");
    }

    #[test]
    fn test_basic_rating_uses_franchise_then_genres() {
        assert_eq!(assign_basic_rating("Unknown Game", &[]), 7.0);
        assert_eq!(assign_basic_rating("The Witcher 3", &[]), 9.5);
        let genres = vec!["RPG".to_string(), "Action".to_string()];
        assert!((assign_basic_rating("Unknown Game", &genres) - 7.6).abs() < 1e-9);
        assert_eq!(assign_basic_rating("Skyrim", &genres), 10.0);
    }

    #[test]
    fn test_basic_metadata_is_placeholder() {
        let meta = basic_metadata("Some Racing Game");
        assert!(!meta.is_useful());
        assert!(meta.summary.starts_with("Game: Some Racing Game"));
        assert!(meta.rating.is_some());
    }
}
