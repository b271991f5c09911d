//! Topsy search backend.
//!
//! Queries `search.json` for trackbacks of a site.  The HTTP round trip and
//! the JSON decoding are split so the decoding can be tested offline, the
//! same way any other source should be built.

use std::time::Duration;

use serde::Deserialize;

use super::{SearchClient, SearchPage, SearchQuery};
use crate::error::Result;

/// Base URL of the public Topsy API.
pub const DEFAULT_ENDPOINT: &str = "http://otter.topsy.com";

/// A blocking client for Topsy's trackback search.
pub struct TopsyClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl TopsyClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` — base URL of the API, without a trailing slash (usually
    ///   [`DEFAULT_ENDPOINT`]).
    /// * `timeout` — applied to every request made by this client.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Top-level shape of a `search.json` reply.  Only `response` matters.
#[derive(Deserialize)]
struct Envelope {
    response: SearchPage,
}

/// Decode a `search.json` body into a [`SearchPage`].
///
/// This is a pure function (no I/O) so that tests can exercise the decoding
/// without hitting the network.
pub fn parse_search_page(body: &str) -> Result<SearchPage> {
    let envelope: Envelope = serde_json::from_str(body)?;
    Ok(envelope.response)
}

impl SearchClient for TopsyClient {
    fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage> {
        let url = format!("{}/search.json", self.endpoint);
        let body = self
            .client
            .get(&url)
            .query(&[
                ("page", query.page.to_string()),
                ("perpage", query.per_page.to_string()),
                ("window", query.window.to_string()),
                ("q", query.site.to_string()),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        parse_search_page(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
