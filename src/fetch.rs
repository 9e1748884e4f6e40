//! Provider-agnostic HTTP plumbing.

use crate::config::NetworkConfig;
use failure::{Error, ResultExt};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

/// The network operations the pipeline needs. Split out as a trait so the
/// resolver and orchestrator can be exercised against stubs.
pub trait Transport {
    /// Fetch a small text body. Any transport failure or non-200 status
    /// yields `None` - callers treat the two identically.
    fn fetch_text(&self, url: &str) -> Option<String>;

    /// Stream `url` into the file at `dest`. Succeeds only when the
    /// transport completed and the status was exactly 200. A mid-body
    /// transport failure can leave a partial file behind; the caller is
    /// responsible for deleting it.
    fn download(&self, url: &str, dest: &Path) -> Result<(), Error>;
}

/// The real transport: a blocking `reqwest` client with redirects, a
/// bounded timeout and a fixed user agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn from_config(cfg: &NetworkConfig) -> Result<HttpClient, Error> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .redirect(Policy::limited(10))
            .build()
            .context("Unable to build the http client")?;

        Ok(HttpClient { client })
    }
}

impl Transport for HttpClient {
    fn fetch_text(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                debug!("request to {} failed, {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!("request to {} returned {}", url, status);
            return None;
        }

        response.text().ok()
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), Error> {
        let mut response = self
            .client
            .get(url)
            .send()
            .context("Unable to send the download request")?;

        let status = response.status();
        if status != StatusCode::OK {
            // Don't create the file at all for an error page.
            return Err(DownloadFailed {
                url: url.to_string(),
                status,
            }
            .into());
        }

        let mut file = File::create(dest).context("Unable to create the output file")?;
        io::copy(&mut response, &mut file).context("Unable to write the response body")?;

        Ok(())
    }
}

/// The server answered with something other than 200.
#[derive(Debug, Clone, PartialEq, Fail)]
#[fail(display = "download of {} failed with {}", url, status)]
pub struct DownloadFailed {
    pub url: String,
    pub status: StatusCode,
}
