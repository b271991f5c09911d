use std::time::Duration;

use super::TitleFetcher;
use crate::error::Result;

/// Fetches topic pages over HTTP with a blocking client.
pub struct HttpTitleFetcher {
    client: reqwest::blocking::Client,
}

impl HttpTitleFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl TitleFetcher for HttpTitleFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        tracing::debug!(url, bytes = body.len(), "fetched topic page");
        Ok(body)
    }
}
