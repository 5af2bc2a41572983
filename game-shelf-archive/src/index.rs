//! Fetching and parsing autoindex directory listings.

use std::collections::HashSet;
use std::path::Path;

use scraper::{Html, Selector};
use url::Url;

use crate::error::ArchiveError;
use crate::filters::ExcludeFilters;
use crate::http::HttpFetch;

/// Substrings of site navigation links (not archive content) that appear on
/// the top-level listings.
pub const SITE_LINK_PATTERNS: &[&str] = &[
    "contact", "donate", "faq", "upload", "discord", "telegram", "hshop", "home",
];

/// File name the most recent index page is saved under.
pub const SAVED_INDEX_NAME: &str = "index.html";

/// One link from an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub display_name: String,
    /// The `href` exactly as it appeared on the page (after HTML entity
    /// decoding). Resolved against the page URL on selection.
    pub raw_href: String,
    pub is_directory: bool,
}

/// A parsed index page. Each list is sorted case-insensitively by display
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexListing {
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<DirectoryEntry>,
}

impl IndexListing {
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Directories first, then files.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.directories.iter().chain(self.files.iter())
    }

    /// Drop site navigation links such as "donate" or "discord".
    pub fn without_site_links(mut self) -> Self {
        let is_site_link = |entry: &DirectoryEntry| {
            let lower = entry.display_name.to_lowercase();
            SITE_LINK_PATTERNS.iter().any(|p| lower.contains(p))
        };
        self.directories.retain(|e| !is_site_link(e));
        self.files.retain(|e| !is_site_link(e));
        self
    }

    /// Hide files matched by the user's exclude filters. Directories are
    /// never hidden.
    pub fn apply_filters(mut self, filters: &ExcludeFilters) -> Self {
        if !filters.is_empty() {
            self.files.retain(|e| !filters.excludes(&e.display_name));
        }
        self
    }
}

/// Classify one `href`. Returns `None` for parent links, absolute links,
/// query-string links and empty values.
pub fn classify_href(href: &str) -> Option<DirectoryEntry> {
    let href = href.trim();
    if href.is_empty() || href == "../" || href == ".." {
        return None;
    }
    if href.starts_with("http") || href.contains('?') {
        return None;
    }

    let is_directory = href.ends_with('/');
    let name = if is_directory {
        href.trim_end_matches('/')
    } else {
        href
    };
    if name.is_empty() {
        return None;
    }

    Some(DirectoryEntry {
        display_name: decode_component(name),
        raw_href: href.to_string(),
        is_directory,
    })
}

/// Percent-decode for display, keeping the raw text if it isn't valid.
pub fn decode_component(s: &str) -> String {
    urlencoding::decode(s)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// Parse an index page into directories and files.
///
/// Malformed HTML yields whatever links could be recovered, possibly none.
/// A non-empty `title` attribute replaces the href as the display name.
pub fn parse_index(html: &str) -> IndexListing {
    let Ok(selector) = Selector::parse("a[href]") else {
        return IndexListing::default();
    };
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut listing = IndexListing::default();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(mut entry) = classify_href(href) else {
            continue;
        };
        if !seen.insert(entry.raw_href.clone()) {
            continue;
        }
        if let Some(title) = element.value().attr("title").map(str::trim)
            && !title.is_empty()
        {
            entry.display_name = title.to_string();
        }
        if entry.is_directory {
            listing.directories.push(entry);
        } else {
            listing.files.push(entry);
        }
    }

    sort_entries(&mut listing.directories);
    sort_entries(&mut listing.files);
    listing
}

fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.raw_href.cmp(&b.raw_href))
    });
}

/// Resolve an href from a listing against the listing's own URL.
pub fn resolve_href(page_url: &str, href: &str) -> Result<String, ArchiveError> {
    let base = Url::parse(page_url).map_err(|source| ArchiveError::Url {
        url: page_url.to_string(),
        source,
    })?;
    let joined = base.join(href).map_err(|source| ArchiveError::Url {
        url: href.to_string(),
        source,
    })?;
    Ok(joined.to_string())
}

/// URL of a platform directory below a dataset root.
pub fn platform_url(dataset_url: &str, directory: &str) -> String {
    let base = dataset_url.trim_end_matches('/');
    format!("{base}/{}/", urlencoding::encode(directory))
}

/// Fetch and parse the listing at `url`.
///
/// When `save_dir` is given, the raw HTML is written there as
/// [`SAVED_INDEX_NAME`]; failing to save is logged but not an error.
pub fn fetch_index(
    http: &dyn HttpFetch,
    url: &str,
    save_dir: Option<&Path>,
) -> Result<IndexListing, ArchiveError> {
    log::debug!("Fetching index {url}");
    let html = http.get_text(url)?;

    if let Some(dir) = save_dir {
        let saved = std::fs::create_dir_all(dir)
            .and_then(|_| std::fs::write(dir.join(SAVED_INDEX_NAME), &html));
        if let Err(e) = saved {
            log::warn!("Could not save index page to {}: {}", dir.display(), e);
        }
    }

    Ok(parse_index(&html))
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
