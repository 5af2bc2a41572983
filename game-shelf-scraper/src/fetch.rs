//! The catalog fallback chain and sequential batch fetching.

use game_shelf_core::{GameMetadata, MetadataSource};

use crate::client::JsonFetch;
use crate::credentials::Credentials;
use crate::naming::{basic_metadata, clean_game_name_for_search};
use crate::sources::search_source;

/// Catalogs in the order they are tried.
pub const FALLBACK_ORDER: &[MetadataSource] = &[
    MetadataSource::Steam,
    MetadataSource::Gog,
    MetadataSource::Rawg,
    MetadataSource::ScreenScraper,
];

/// Progress events emitted by [`fetch_batch`], consumed by the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataProgress {
    /// A batch of `total` names is starting.
    Started { total: usize },
    /// Querying catalogs for one name.
    Fetching { index: usize, name: String },
    /// A catalog had a useful record.
    Found {
        index: usize,
        name: String,
        metadata: Box<GameMetadata>,
    },
    /// No catalog had a useful record; `metadata` is the best partial result
    /// or a locally built placeholder.
    NotFound {
        index: usize,
        name: String,
        metadata: Box<GameMetadata>,
    },
    /// The batch could not run at all.
    Failed { message: String },
    Completed { found: usize, not_found: usize },
}

/// Result of running the fallback chain for one name.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub metadata: GameMetadata,
    /// True when a catalog supplied a real description.
    pub useful: bool,
}

/// Runs the fallback chain against a [`JsonFetch`] implementation.
pub struct MetadataFetcher<F> {
    http: F,
    credentials: Credentials,
    order: Vec<MetadataSource>,
}

impl<F: JsonFetch> MetadataFetcher<F> {
    pub fn new(http: F, credentials: Credentials) -> Self {
        Self {
            http,
            credentials,
            order: FALLBACK_ORDER.to_vec(),
        }
    }

    /// Query only these catalogs, in this order.
    pub fn with_sources(mut self, sources: &[MetadataSource]) -> Self {
        self.order = sources.to_vec();
        self
    }

    pub fn sources(&self) -> &[MetadataSource] {
        &self.order
    }

    /// Try each catalog in order and stop at the first useful record.
    ///
    /// Catalog errors are logged and the next catalog is tried. If nothing
    /// is useful, the first record any catalog returned is kept; failing
    /// that, a placeholder is built from the name alone.
    pub async fn fetch(&self, name: &str) -> FetchOutcome {
        let query = clean_game_name_for_search(name);
        let mut first_partial: Option<GameMetadata> = None;

        for &source in &self.order {
            log::debug!("Searching {source} for '{query}'");
            match search_source(&self.http, &self.credentials, source, &query).await {
                Ok(Some(metadata)) if metadata.is_useful() => {
                    log::debug!("{source} matched '{}'", metadata.name);
                    return FetchOutcome {
                        metadata,
                        useful: true,
                    };
                }
                Ok(Some(metadata)) => {
                    if first_partial.is_none() && !metadata.name.is_empty() {
                        first_partial = Some(metadata);
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{source} lookup for '{query}' failed: {e}"),
            }
        }

        FetchOutcome {
            metadata: first_partial.unwrap_or_else(|| basic_metadata(name)),
            useful: false,
        }
    }
}

/// Fetch metadata for each name in order, reporting progress. One slow or
/// failing name never stops the batch.
pub async fn fetch_batch<F: JsonFetch>(
    fetcher: &MetadataFetcher<F>,
    names: &[String],
    mut progress: impl FnMut(MetadataProgress),
) -> Vec<FetchOutcome> {
    progress(MetadataProgress::Started { total: names.len() });

    let mut outcomes = Vec::with_capacity(names.len());
    let (mut found, mut not_found) = (0, 0);
    for (index, name) in names.iter().enumerate() {
        progress(MetadataProgress::Fetching {
            index,
            name: name.clone(),
        });
        let outcome = fetcher.fetch(name).await;
        let metadata = Box::new(outcome.metadata.clone());
        if outcome.useful {
            found += 1;
            progress(MetadataProgress::Found {
                index,
                name: name.clone(),
                metadata,
            });
        } else {
            not_found += 1;
            progress(MetadataProgress::NotFound {
                index,
                name: name.clone(),
                metadata,
            });
        }
        outcomes.push(outcome);
    }

    progress(MetadataProgress::Completed { found, not_found });
    outcomes
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
