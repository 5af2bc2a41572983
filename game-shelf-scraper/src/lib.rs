pub mod client;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod sources;
pub mod worker;

#[cfg(test)]
#[path = "tests/fake_json.rs"]
pub(crate) mod fake_json;

pub use client::{CatalogClient, JsonFetch};
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, config_path, credential_sources,
};
pub use error::ScrapeError;
pub use fetch::{FALLBACK_ORDER, FetchOutcome, MetadataFetcher, MetadataProgress, fetch_batch};
pub use naming::{assign_basic_rating, basic_metadata, clean_game_name_for_search};
pub use sources::search_source;
pub use worker::MetadataWorker;
