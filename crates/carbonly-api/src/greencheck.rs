// Greencheck HTTP client
//
// Asks the Green Web Foundation whether domains are served from green
// infrastructure. Single lookups hit `/api/v3/greencheck/{domain}`; batches
// go through `/v2/greencheckmulti/{json-array}` and come back as a map
// keyed by domain.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public greencheck service.
pub const DEFAULT_BASE_URL: &str = "https://api.thegreenwebfoundation.org";

/// One domain's greencheck answer. Only `green` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GreencheckResult {
    #[serde(default)]
    pub url: String,
    pub green: bool,
    #[serde(default)]
    pub hosted_by: Option<String>,
    #[serde(default)]
    pub hosted_by_website: Option<String>,
}

pub struct GreencheckClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl GreencheckClient {
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Full greencheck record for one domain.
    pub async fn lookup(&self, domain: &str) -> Result<GreencheckResult, Error> {
        let url = self.endpoint(&["api", "v3", "greencheck", domain])?;
        self.get(url).await
    }

    /// Whether one domain is green-hosted.
    pub async fn check(&self, domain: &str) -> Result<bool, Error> {
        Ok(self.lookup(domain).await?.green)
    }

    /// The green subset of `domains`, in input order.
    pub async fn check_many(&self, domains: &[String]) -> Result<Vec<String>, Error> {
        if domains.is_empty() {
            return Ok(Vec::new());
        }

        let list = serde_json::to_string(domains).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })?;
        let url = self.endpoint(&["v2", "greencheckmulti", &list])?;
        let results: HashMap<String, GreencheckResult> = self.get(url).await?;

        Ok(domains
            .iter()
            .filter(|d| results.get(d.as_str()).is_some_and(|r| r.green))
            .cloned()
            .collect())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `{base}/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> GreencheckClient {
        GreencheckClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let url = client("https://example.org/proxy/")
            .endpoint(&["api", "v3", "greencheck", "a.org"])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.org/proxy/api/v3/greencheck/a.org");
    }

    #[test]
    fn endpoint_encodes_json_lists() {
        let url = client(DEFAULT_BASE_URL)
            .endpoint(&["v2", "greencheckmulti", r#"["a.org","b.org"]"#])
            .unwrap();
        assert!(url.path().starts_with("/v2/greencheckmulti/"));
        assert!(!url.path().contains('"'));
    }

    #[test]
    fn result_tolerates_missing_optional_fields() {
        let r: GreencheckResult = serde_json::from_str(r#"{"green": true}"#).unwrap();
        assert!(r.green);
        assert!(r.hosted_by.is_none());
    }
}
