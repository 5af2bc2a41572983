//! The game library: one entry per shortcut file in the shortcuts folder.

use std::path::{Path, PathBuf};

use game_shelf_core::{GameMetadata, GameType};

use crate::error::LibError;
use crate::favorites::Favorites;
use crate::names::NameResolver;
use crate::ratings::CustomRatings;

/// File types that count as library entries.
pub const SHORTCUT_EXTENSIONS: &[&str] = &["lnk", "url", "bat", "exe"];

/// Where an entry's rating came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOrigin {
    Custom,
    Downloaded,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    /// Resolved display name; also the key for ratings, tags and favorites.
    pub name: String,
    /// Shortcut file stem as found on disk.
    pub file_stem: String,
    pub path: PathBuf,
    pub game_type: GameType,
    pub rating: f64,
    pub rating_origin: RatingOrigin,
    pub tags: Vec<String>,
    pub favorite: bool,
}

/// Everything needed to turn shortcut files into library entries.
pub struct LibraryContext<'a> {
    pub resolver: &'a NameResolver,
    pub ratings: &'a CustomRatings,
    pub favorites: &'a Favorites,
    /// Rating used when there is neither a custom nor a downloaded one.
    pub default_rating: f64,
}

impl LibraryContext<'_> {
    /// Build one entry. `cached` is the stored metadata for the game, if any.
    pub fn entry(&self, path: &Path, cached: Option<&GameMetadata>) -> LibraryEntry {
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let name = self.resolver.resolve(&file_stem);
        let game_type = GameType::classify(&file_stem, Some(path));

        let downloaded = cached.and_then(|m| m.rating);
        let (rating, rating_origin) = match (self.ratings.get_custom_rating(&name), downloaded) {
            (Some(custom), _) => (custom, RatingOrigin::Custom),
            (None, Some(rating)) => (rating, RatingOrigin::Downloaded),
            (None, None) => (self.default_rating, RatingOrigin::Default),
        };

        let downloaded_tags = cached.map(|m| m.genres.as_slice()).unwrap_or(&[]);
        let tags = self.ratings.get_final_tags(&name, downloaded_tags);
        let favorite = self.favorites.contains(&name);

        LibraryEntry {
            name,
            file_stem,
            path: path.to_path_buf(),
            game_type,
            rating,
            rating_origin,
            tags,
            favorite,
        }
    }

    /// Load every shortcut directly inside `dir`, sorted by display name.
    /// `lookup` supplies cached metadata by display name.
    pub fn load<F>(&self, dir: &Path, lookup: F) -> Result<Vec<LibraryEntry>, LibError>
    where
        F: Fn(&str) -> Option<GameMetadata>,
    {
        if !dir.is_dir() {
            return Err(LibError::NotADirectory(dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(dir)?.flatten() {
            let path = dir_entry.path();
            if !path.is_file() || !is_shortcut(&path) {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            let cached = lookup(&self.resolver.resolve(stem));
            entries.push(self.entry(&path, cached.as_ref()));
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(entries)
    }
}

fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SHORTCUT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_library() {
        let dir = tempfile::tempdir().unwrap();
        let shortcuts = dir.path().join("shortcuts");
        std::fs::create_dir(&shortcuts).unwrap();
        for name in ["bf4.lnk", "Okami (PS2).lnk", "Launch Doom.bat", "readme.txt"] {
            std::fs::write(shortcuts.join(name), b"").unwrap();
        }

        let resolver = NameResolver::new();
        let mut ratings = CustomRatings::open(dir.path().join("ratings.json")).unwrap();
        ratings.set_custom_rating("Battlefield 4", 8.0).unwrap();
        let mut favorites = Favorites::open(dir.path().join("favorites.json")).unwrap();
        favorites.add("Okami").unwrap();

        let ctx = LibraryContext {
            resolver: &resolver,
            ratings: &ratings,
            favorites: &favorites,
            default_rating: 7.0,
        };
        let entries = ctx
            .load(&shortcuts, |name| {
                (name == "Doom").then(|| GameMetadata {
                    rating: Some(9.0),
                    genres: vec!["Shooter".into()],
                    ..GameMetadata::default()
                })
            })
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Battlefield 4", "Doom", "Okami"]);

        assert_eq!(entries[0].rating_origin, RatingOrigin::Custom);
        assert_eq!(entries[0].rating, 8.0);

        assert_eq!(entries[1].game_type, GameType::Dosbox);
        assert_eq!(entries[1].rating_origin, RatingOrigin::Downloaded);
        assert_eq!(entries[1].tags, vec!["Shooter"]);

        assert_eq!(entries[2].game_type, GameType::Rom);
        assert_eq!(entries[2].rating_origin, RatingOrigin::Default);
        assert_eq!(entries[2].rating, 7.0);
        assert!(entries[2].favorite);
    }
}
