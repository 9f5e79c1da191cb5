// ── Traffic manifest ──
//
// The page-level traffic summary produced by a capture tool (pagexray
// shape). Only `domains`, `assets` and the first-party rule are read;
// everything else in the document is ignored.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::CoreError;

/// Transfer summary for one page load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficManifest {
    /// Per-domain totals, in capture order.
    #[serde(default)]
    pub domains: IndexMap<String, DomainTransfer>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    /// Which domains belong to the page owner. Absent means none do.
    #[serde(rename = "firstPartyRegEx", default, skip_serializing_if = "Option::is_none")]
    pub first_party: Option<FirstPartyMatcher>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainTransfer {
    pub transfer_size: u64,
    #[serde(default)]
    pub content_size: u64,
    #[serde(default)]
    pub header_size: u64,
    #[serde(default)]
    pub requests: u32,
    #[serde(default)]
    pub timings: Timings,
}

/// Aggregated request timings, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default)]
    pub blocked: f64,
    #[serde(default)]
    pub dns: f64,
    #[serde(default)]
    pub connect: f64,
    #[serde(default)]
    pub send: f64,
    #[serde(default)]
    pub wait: f64,
    #[serde(default)]
    pub receive: f64,
}

/// One fetched resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub url: String,
    /// Content type bucket (e.g. "javascript", "image").
    #[serde(rename = "type")]
    pub content_type: String,
    pub transfer_size: u64,
}

impl Asset {
    /// Host the asset was served from.
    pub fn host(&self) -> Result<String, CoreError> {
        let url = Url::parse(&self.url).map_err(|e| CoreError::InvalidAssetUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        url.host_str()
            .map(str::to_owned)
            .ok_or_else(|| CoreError::InvalidAssetUrl {
                url: self.url.clone(),
                reason: "URL has no host".into(),
            })
    }
}

impl TrafficManifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether `domain` matches the first-party rule.
    pub fn is_first_party(&self, domain: &str) -> bool {
        self.first_party.as_ref().is_some_and(|m| m.matches(domain))
    }
}

// ── First-party matcher ─────────────────────────────────────────────

/// Regular expression identifying first-party domains.
#[derive(Clone)]
pub struct FirstPartyMatcher(Regex);

impl FirstPartyMatcher {
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| CoreError::InvalidFirstPartyPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, domain: &str) -> bool {
        self.0.is_match(domain)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for FirstPartyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FirstPartyMatcher").field(&self.as_str()).finish()
    }
}

impl Serialize for FirstPartyMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FirstPartyMatcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "url": "https://example.org/",
        "domains": {
            "example.org": { "transferSize": 1000, "contentSize": 3000, "headerSize": 200, "requests": 3,
                             "timings": { "blocked": 1, "dns": 2, "connect": 3, "send": 0, "wait": 10, "receive": 4 } },
            "cdn.example.net": { "transferSize": 500 }
        },
        "assets": [
            { "url": "https://example.org/app.js", "type": "javascript", "transferSize": 700, "status": 200 }
        ],
        "firstPartyRegEx": "^(.*\\.)?example\\.org$"
    }"#;

    #[test]
    fn parses_pagexray_shape_and_keeps_domain_order() {
        let m = TrafficManifest::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = m.domains.keys().map(String::as_str).collect();
        assert_eq!(names, ["example.org", "cdn.example.net"]);
        assert_eq!(m.domains["example.org"].requests, 3);
        assert_eq!(m.assets[0].content_type, "javascript");
    }

    #[test]
    fn first_party_rule_applies() {
        let m = TrafficManifest::from_json(SAMPLE).unwrap();
        assert!(m.is_first_party("example.org"));
        assert!(m.is_first_party("www.example.org"));
        assert!(!m.is_first_party("cdn.example.net"));
    }

    #[test]
    fn missing_rule_means_no_first_party() {
        let m = TrafficManifest::default();
        assert!(!m.is_first_party("example.org"));
    }

    #[test]
    fn invalid_rule_is_rejected() {
        let err = TrafficManifest::from_json(r#"{ "firstPartyRegEx": "(" }"#).unwrap_err();
        assert!(err.to_string().contains("Invalid first-party pattern"));
    }

    #[test]
    fn asset_host_comes_from_url() {
        let asset = Asset {
            url: "https://fonts.gstatic.com/s/font.woff2".into(),
            content_type: "font".into(),
            transfer_size: 1,
        };
        assert_eq!(asset.host().unwrap(), "fonts.gstatic.com");
    }

    #[test]
    fn unparsable_asset_url_is_an_error() {
        let asset = Asset {
            url: "not a url".into(),
            content_type: "other".into(),
            transfer_size: 1,
        };
        assert!(matches!(asset.host(), Err(CoreError::InvalidAssetUrl { .. })));
    }
}
