//! Favorite games, stored as a JSON list of names in `favorites.json`.

use std::path::{Path, PathBuf};

use crate::error::LibError;
use crate::settings::write_atomic;

#[derive(Debug)]
pub struct Favorites {
    path: PathBuf,
    names: Vec<String>,
}

impl Favorites {
    /// Open the list at `path`; a missing file is an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LibError> {
        let path = path.into();
        let names = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, names })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in the order they were added.
    pub fn list(&self) -> &[String] {
        &self.names
    }

    /// Returns false if the name was already a favorite.
    pub fn add(&mut self, name: &str) -> Result<bool, LibError> {
        if self.contains(name) {
            return Ok(false);
        }
        self.names.push(name.to_string());
        self.save()?;
        Ok(true)
    }

    /// Returns false if the name was not a favorite.
    pub fn remove(&mut self, name: &str) -> Result<bool, LibError> {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        if self.names.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flip the favorite flag. Returns the new state.
    pub fn toggle(&mut self, name: &str) -> Result<bool, LibError> {
        if self.contains(name) {
            self.remove(name)?;
            Ok(false)
        } else {
            self.add(name)?;
            Ok(true)
        }
    }

    fn save(&self) -> Result<(), LibError> {
        let json = serde_json::to_string_pretty(&self.names)?;
        write_atomic(&self.path, &json)
    }
}
