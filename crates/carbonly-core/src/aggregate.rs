// ── Manifest aggregation ──
//
// Applies the facade's per-byte estimate across a traffic manifest and
// reduces the results by domain, content type, asset and party. Greenness
// is decided per domain by membership in the caller's green set.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::co2::Co2;
use crate::error::CoreError;
use crate::hosting::GreenDomainSet;
use crate::manifest::{Asset, TrafficManifest};

/// How many assets `dirtiest_resources` returns at most.
pub const DIRTIEST_RESOURCES_LIMIT: usize = 10;

// ── Result rows ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEmissions {
    pub domain: String,
    pub co2: f64,
    pub transfer_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeEmissions {
    #[serde(rename = "type")]
    pub content_type: String,
    pub co2: f64,
    pub transfer_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEmissions {
    pub url: String,
    pub co2: f64,
    pub transfer_size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyEmissions {
    pub first_party: f64,
    pub third_party: f64,
}

/// Every aggregate for one page in a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub total: f64,
    pub per_domain: Vec<DomainEmissions>,
    pub per_content_type: Vec<ContentTypeEmissions>,
    pub dirtiest_resources: Vec<ResourceEmissions>,
    pub per_party: PartyEmissions,
}

// ── Aggregations ────────────────────────────────────────────────────

impl Co2 {
    /// Emissions for each domain, highest first. Domains with equal
    /// emissions keep manifest order.
    pub fn per_domain(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<Vec<DomainEmissions>, CoreError> {
        let mut rows = manifest
            .domains
            .iter()
            .map(|(domain, transfer)| {
                let co2 = self.per_byte(transfer.transfer_size, green.check(domain))?;
                Ok(DomainEmissions {
                    domain: domain.clone(),
                    co2: co2.total,
                    transfer_size: transfer.transfer_size,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        sort_by_co2_desc(&mut rows, |r| r.co2);
        debug!(domains = rows.len(), "per domain emissions");
        Ok(rows)
    }

    /// Total emissions for the page.
    pub fn per_page(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<f64, CoreError> {
        Ok(self.per_domain(manifest, green)?.iter().map(|r| r.co2).sum())
    }

    /// Asset emissions grouped by content type, highest first.
    pub fn per_content_type(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<Vec<ContentTypeEmissions>, CoreError> {
        let mut groups: IndexMap<&str, ContentTypeEmissions> = IndexMap::new();
        for asset in &manifest.assets {
            let co2 = self.asset_co2(asset, green)?;
            let group = groups
                .entry(asset.content_type.as_str())
                .or_insert_with(|| ContentTypeEmissions {
                    content_type: asset.content_type.clone(),
                    co2: 0.0,
                    transfer_size: 0,
                });
            group.co2 += co2;
            group.transfer_size = group.transfer_size.saturating_add(asset.transfer_size);
        }

        let mut rows: Vec<_> = groups.into_values().collect();
        sort_by_co2_desc(&mut rows, |r| r.co2);
        Ok(rows)
    }

    /// The assets with the highest emissions, at most
    /// [`DIRTIEST_RESOURCES_LIMIT`] of them.
    pub fn dirtiest_resources(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<Vec<ResourceEmissions>, CoreError> {
        let mut rows = manifest
            .assets
            .iter()
            .map(|asset| {
                Ok(ResourceEmissions {
                    url: asset.url.clone(),
                    co2: self.asset_co2(asset, green)?,
                    transfer_size: asset.transfer_size,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        sort_by_co2_desc(&mut rows, |r| r.co2);
        rows.truncate(DIRTIEST_RESOURCES_LIMIT);
        Ok(rows)
    }

    /// Domain emissions split by the manifest's first-party rule.
    pub fn per_party(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<PartyEmissions, CoreError> {
        let mut split = PartyEmissions::default();
        for row in self.per_domain(manifest, green)? {
            if manifest.is_first_party(&row.domain) {
                split.first_party += row.co2;
            } else {
                split.third_party += row.co2;
            }
        }
        Ok(split)
    }

    pub fn summarize(
        &self,
        manifest: &TrafficManifest,
        green: &GreenDomainSet,
    ) -> Result<PageReport, CoreError> {
        let per_domain = self.per_domain(manifest, green)?;
        Ok(PageReport {
            total: per_domain.iter().map(|r| r.co2).sum(),
            per_content_type: self.per_content_type(manifest, green)?,
            dirtiest_resources: self.dirtiest_resources(manifest, green)?,
            per_party: self.per_party(manifest, green)?,
            per_domain,
        })
    }

    fn asset_co2(&self, asset: &Asset, green: &GreenDomainSet) -> Result<f64, CoreError> {
        let host = asset.host()?;
        Ok(self.per_byte(asset.transfer_size, green.check(&host))?.total)
    }
}

/// Stable descending sort on a float key.
fn sort_by_co2_desc<T>(rows: &mut [T], co2: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| co2(b).total_cmp(&co2(a)));
}
