//! External collaborators: the trackback search backend and the page
//! fetcher used to name topics.
//!
//! This module defines the [`SearchClient`] and [`TitleFetcher`] traits and
//! the types that cross them.  Concrete HTTP implementations live in
//! sub-modules ([`topsy`] and [`title`]).
//!
//! ## For contributors — testing against the traits
//!
//! The loader and the aggregator only ever see these traits, so tests swap
//! in small in-memory fakes instead of talking to the network.  Both traits
//! are blocking: a call returns once the backend has answered or failed.

mod title;
mod topsy;

pub use title::HttpTitleFetcher;
pub use topsy::{parse_search_page, TopsyClient, DEFAULT_ENDPOINT};

use serde::Deserialize;

use crate::error::Result;

/// The only search window the loader asks for.
pub const REALTIME_WINDOW: &str = "realtime";

/// Parameters for one page of a trackback search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    /// Domain whose URLs we want trackbacks for (e.g. `github.com`).
    pub site: &'a str,
    /// Search window; always [`REALTIME_WINDOW`] for the loader.
    pub window: &'a str,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

/// A single trackback as returned by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchItem {
    /// Link to the tweet; ends in the tweet's numeric identifier.
    #[serde(rename = "trackback_permalink")]
    pub permalink: String,
    /// Twitter nickname of the author.
    #[serde(rename = "trackback_author_nick")]
    pub author_nick: String,
    /// The target URL being mentioned.
    pub url: String,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "trackback_date")]
    pub created_at: i64,
}

/// One page of search results plus the backend's paging metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchPage {
    /// Items in backend order (newest first).
    #[serde(rename = "list", default)]
    pub items: Vec<SearchItem>,
    /// Cumulative number of items seen up to and including this page.
    pub last_offset: u64,
    /// Total number of matching items.
    pub total: u64,
}

/// Issues paged trackback queries against the search backend.
pub trait SearchClient {
    fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage>;
}

/// Retrieves the raw HTML of an arbitrary page.
pub trait TitleFetcher {
    /// Fetch `url` and return the body as text.  Unreachable hosts and
    /// non-success statuses are errors.
    fn fetch(&self, url: &str) -> Result<String>;
}
