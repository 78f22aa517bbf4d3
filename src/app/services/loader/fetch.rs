//! Fetching published spreadsheet exports

use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Downloads the CSV export of a published spreadsheet
pub trait SheetFetcher {
    fn fetch(&self, export_url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::fetch("", "Failed to build HTTP client", Some(e)))?;
        Ok(Self { client })
    }
}

impl SheetFetcher for HttpFetcher {
    fn fetch(&self, export_url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {}", export_url);

        let response = self
            .client
            .get(export_url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::fetch(export_url, "Request failed", Some(e)))?;

        // Private sheets redirect to a sign-in page instead of failing
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("text/html"));
        if is_html {
            return Err(Error::fetch(
                export_url,
                "Received a web page instead of CSV; is the sheet shared publicly?",
                None,
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::fetch(export_url, "Failed to read response body", Some(e)))?;
        debug!("Fetched {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
