//! User ratings and tags, kept in `custom_ratings.json`.
//!
//! The file maps a game name to `{ "rating": 8.5, "tags": ["coop"] }`. Older
//! files stored a bare number per game; those are converted on load and the
//! file is rewritten in the current shape. Every mutation is saved
//! immediately.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LibError;
use crate::settings::{RatingRange, write_atomic};

/// One game's custom data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RatingEntry {
    fn is_empty(&self) -> bool {
        self.rating.is_none() && self.tags.is_empty()
    }
}

/// On-disk entry: either the current object or a legacy bare rating.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Legacy(f64),
    Current(RatingEntry),
}

/// The custom ratings/tags store. Owned by whoever needs it; there is no
/// process-wide instance.
#[derive(Debug)]
pub struct CustomRatings {
    path: PathBuf,
    range: RatingRange,
    entries: BTreeMap<String, RatingEntry>,
}

impl CustomRatings {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet. Legacy files are migrated and saved.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LibError> {
        let path = path.into();
        let mut store = Self {
            path,
            range: RatingRange::default(),
            entries: BTreeMap::new(),
        };

        let contents = match std::fs::read_to_string(&store.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(store),
            Err(e) => return Err(e.into()),
        };

        let stored: BTreeMap<String, StoredEntry> = serde_json::from_str(&contents)?;
        let mut migrated = false;
        for (name, entry) in stored {
            let entry = match entry {
                StoredEntry::Legacy(rating) => {
                    migrated = true;
                    RatingEntry {
                        rating: Some(rating),
                        tags: Vec::new(),
                    }
                }
                StoredEntry::Current(entry) => entry,
            };
            store.entries.insert(name, entry);
        }

        if migrated {
            log::info!("Migrated {} to the ratings/tags format", store.path.display());
            store.save()?;
        }
        Ok(store)
    }

    /// Use a custom accepted range instead of 0-10.
    pub fn with_range(mut self, range: RatingRange) -> Self {
        self.range = range;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), LibError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, &json)
    }

    /// Set a rating. Values outside the accepted range are rejected and the
    /// store is left unchanged.
    pub fn set_custom_rating(&mut self, name: &str, rating: f64) -> Result<(), LibError> {
        if !(self.range.min..=self.range.max).contains(&rating) {
            return Err(LibError::InvalidRating {
                value: rating,
                min: self.range.min,
                max: self.range.max,
            });
        }
        self.entries.entry(name.to_string()).or_default().rating = Some(rating);
        self.save()
    }

    pub fn get_custom_rating(&self, name: &str) -> Option<f64> {
        self.entries.get(name).and_then(|e| e.rating)
    }

    pub fn has_custom_rating(&self, name: &str) -> bool {
        self.get_custom_rating(name).is_some()
    }

    /// Clear a rating. The entry disappears entirely if it has no tags.
    /// Returns whether a rating was removed.
    pub fn remove_custom_rating(&mut self, name: &str) -> Result<bool, LibError> {
        let Some(entry) = self.entries.get_mut(name) else {
            return Ok(false);
        };
        let had_rating = entry.rating.take().is_some();
        if entry.is_empty() {
            self.entries.remove(name);
        }
        if had_rating {
            self.save()?;
        }
        Ok(had_rating)
    }

    /// The custom rating if set, otherwise the downloaded one.
    pub fn get_final_rating(&self, name: &str, downloaded: Option<f64>) -> Option<f64> {
        self.get_custom_rating(name).or(downloaded)
    }

    /// Replace a game's tags. Duplicates and blank tags are dropped.
    pub fn set_custom_tags(&mut self, name: &str, tags: Vec<String>) -> Result<(), LibError> {
        let mut cleaned: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !cleaned.contains(&tag) {
                cleaned.push(tag);
            }
        }
        let entry = self.entries.entry(name.to_string()).or_default();
        entry.tags = cleaned;
        if entry.is_empty() {
            self.entries.remove(name);
        }
        self.save()
    }

    /// [`set_custom_tags`](Self::set_custom_tags) from a comma-separated
    /// string such as `"coop, roguelike"`.
    pub fn set_custom_tags_str(&mut self, name: &str, tags: &str) -> Result<(), LibError> {
        self.set_custom_tags(name, parse_tags(tags))
    }

    pub fn get_custom_tags(&self, name: &str) -> &[String] {
        self.entries.get(name).map(|e| e.tags.as_slice()).unwrap_or(&[])
    }

    /// Add one tag. Returns false if the game already had it.
    pub fn add_custom_tag(&mut self, name: &str, tag: &str) -> Result<bool, LibError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(false);
        }
        let entry = self.entries.entry(name.to_string()).or_default();
        if entry.tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        entry.tags.push(tag.to_string());
        self.save()?;
        Ok(true)
    }

    /// Remove one tag. Returns false if the game did not have it.
    pub fn remove_custom_tag(&mut self, name: &str, tag: &str) -> Result<bool, LibError> {
        let Some(entry) = self.entries.get_mut(name) else {
            return Ok(false);
        };
        let before = entry.tags.len();
        entry.tags.retain(|t| t != tag.trim());
        if entry.tags.len() == before {
            return Ok(false);
        }
        if entry.is_empty() {
            self.entries.remove(name);
        }
        self.save()?;
        Ok(true)
    }

    /// Custom tags when the game has any, otherwise the downloaded genres.
    pub fn get_final_tags(&self, name: &str, downloaded: &[String]) -> Vec<String> {
        let custom = self.get_custom_tags(name);
        if custom.is_empty() {
            downloaded.to_vec()
        } else {
            custom.to_vec()
        }
    }

    pub fn all_custom_ratings(&self) -> BTreeMap<&str, f64> {
        self.entries
            .iter()
            .filter_map(|(name, e)| e.rating.map(|r| (name.as_str(), r)))
            .collect()
    }

    pub fn all_custom_tags(&self) -> BTreeMap<&str, &[String]> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.tags.is_empty())
            .map(|(name, e)| (name.as_str(), e.tags.as_slice()))
            .collect()
    }

    /// Every tag in use, sorted and de-duplicated.
    pub fn all_unique_tags(&self) -> Vec<String> {
        let unique: BTreeSet<&String> = self.entries.values().flat_map(|e| &e.tags).collect();
        unique.into_iter().cloned().collect()
    }
}

/// Split a comma-separated tag string, trimming and dropping blanks.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/ratings_tests.rs"]
mod tests;
