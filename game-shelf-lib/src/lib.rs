//! Local collection logic: scanning install folders, resolving display
//! names, and the user's ratings, tags and favorites.

pub mod error;
pub mod favorites;
pub mod library;
pub mod names;
pub mod ratings;
pub mod scanner;
pub mod settings;

pub use error::LibError;
pub use favorites::Favorites;
pub use library::{LibraryContext, LibraryEntry, RatingOrigin};
pub use names::{NameResolver, genre_hint};
pub use ratings::{CustomRatings, RatingEntry};
pub use scanner::{ScanCandidate, ScanReport, ScanRules, scan_executables, scan_roms};
pub use settings::{AppConfig, DataPaths, Settings};
