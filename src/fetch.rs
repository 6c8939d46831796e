//! Outbound HTTP access.
//!
//! Every network read in the application goes through the [`PageFetcher`]
//! trait, so discovery and extraction can be driven by canned pages in tests.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: Core trait returning a page body for a URL
//! - [`HttpFetcher`]: `reqwest`-backed implementation used by the binary
//!
//! No retry or timeout policy is applied here; a failed request
//! is returned to the caller as-is.

use reqwest::Client;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for fetching a page body.
pub trait PageFetcher {
    /// Fetch `url` with a plain GET and return the response body as text.
    ///
    /// Non-success HTTP statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher that sends `user_agent` with every request.
    pub fn new(user_agent: &str) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match res {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u128, error = %e, "GET failed");
                return Err(e.into());
            }
        };

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "GET succeeded"
        );
        Ok(body)
    }
}

/// The HTTP status of a failed fetch, if the server answered at all.
///
/// Transport failures (DNS, refused connections, broken bodies) return `None`.
pub fn error_status(err: &(dyn Error + 'static)) -> Option<u16> {
    err.downcast_ref::<reqwest::Error>()
        .and_then(reqwest::Error::status)
        .map(|s| s.as_u16())
}
