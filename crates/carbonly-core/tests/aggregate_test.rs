#![allow(clippy::unwrap_used)]
// Aggregation over a captured page manifest.

use carbonly_core::{Co2, Co2Config, GreenDomainSet, ModelName, TrafficManifest};

// ── Helpers ─────────────────────────────────────────────────────────

const PAGE: &str = include_str!("fixtures/thegreenwebfoundation.json");
const GREEN_DOMAINS: &str = include_str!("fixtures/green-domains.json");

fn page() -> TrafficManifest {
    TrafficManifest::from_json(PAGE).unwrap()
}

fn green() -> GreenDomainSet {
    serde_json::from_str(GREEN_DOMAINS).unwrap()
}

fn models() -> [Co2; 2] {
    [
        Co2::default(),
        Co2::new(Co2Config {
            model: ModelName::OneByte,
            ..Co2Config::default()
        }),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ── Fixture sanity ──────────────────────────────────────────────────

#[test]
fn fixture_has_eleven_domains_nine_green() {
    let page = page();
    let green = green();
    assert_eq!(page.domains.len(), 11);
    let matched = green.check_all(page.domains.keys().map(String::as_str));
    assert_eq!(matched.len(), 9);
}

// ── Per page / per domain ───────────────────────────────────────────

#[test]
fn green_hosting_lowers_page_emissions() {
    for co2 in models() {
        let with_green = co2.per_page(&page(), &green()).unwrap();
        let without = co2.per_page(&page(), &GreenDomainSet::new()).unwrap();
        assert!(with_green < without, "{with_green} !< {without}");
    }
}

#[test]
fn per_domain_lists_every_domain_and_sums_to_page() {
    for co2 in models() {
        let rows = co2.per_domain(&page(), &green()).unwrap();
        assert_eq!(rows.len(), 11);
        let sum: f64 = rows.iter().map(|r| r.co2).sum();
        assert!(close(sum, co2.per_page(&page(), &green()).unwrap()));
        assert!(rows.windows(2).all(|w| w[0].co2 >= w[1].co2));
    }
}

#[test]
fn per_domain_matches_single_transfer_estimates() {
    let co2 = Co2::default();
    let rows = co2.per_domain(&page(), &green()).unwrap();
    let top = &rows[0];
    assert_eq!(top.domain, "www.thegreenwebfoundation.org");
    assert_eq!(top.transfer_size, 523_424);
    assert!(close(top.co2, co2.per_byte(523_424, true).unwrap().total));
}

#[test]
fn zero_transfer_domain_is_listed_last() {
    let rows = Co2::default().per_domain(&page(), &green()).unwrap();
    let last = rows.last().unwrap();
    assert_eq!(last.domain, "admin.thegreenwebfoundation.org");
    assert!(last.co2.abs() < f64::EPSILON);
}

// ── Per party ───────────────────────────────────────────────────────

#[test]
fn parties_partition_the_page() {
    for co2 in models() {
        let split = co2.per_party(&page(), &green()).unwrap();
        let total = co2.per_page(&page(), &green()).unwrap();
        assert!(close(split.first_party + split.third_party, total));
        assert!(split.first_party > 0.0);
        assert!(split.third_party > 0.0);
    }
}

#[test]
fn no_first_party_rule_makes_everything_third_party() {
    let mut page = page();
    page.first_party = None;
    let co2 = Co2::default();
    let split = co2.per_party(&page, &green()).unwrap();
    assert!(split.first_party.abs() < f64::EPSILON);
    assert!(close(split.third_party, co2.per_page(&page, &green()).unwrap()));
}

// ── Assets ──────────────────────────────────────────────────────────

#[test]
fn dirtiest_resources_are_capped_and_sorted() {
    let rows = Co2::default().dirtiest_resources(&page(), &green()).unwrap();
    assert_eq!(page().assets.len(), 13);
    assert_eq!(rows.len(), 10);
    assert!(rows.windows(2).all(|w| w[0].co2 >= w[1].co2));
    assert_eq!(rows[0].url, "https://www.thegreenwebfoundation.org/static/app.js");
}

#[test]
fn dirtiest_resources_returns_fewer_for_small_pages() {
    let mut page = page();
    page.assets.truncate(3);
    let rows = Co2::default().dirtiest_resources(&page, &green()).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn content_types_cover_all_assets() {
    let page = page();
    let rows = Co2::default().per_content_type(&page, &green()).unwrap();
    let types: Vec<_> = rows.iter().map(|r| r.content_type.as_str()).collect();
    assert_eq!(types, ["javascript", "image", "font", "css", "html", "svg"]);

    let bytes: u64 = rows.iter().map(|r| r.transfer_size).sum();
    let expected: u64 = page.assets.iter().map(|a| a.transfer_size).sum();
    assert_eq!(bytes, expected);
}

// ── Empty input ─────────────────────────────────────────────────────

#[test]
fn empty_manifest_yields_zero_and_empty_lists() {
    let empty = TrafficManifest::from_json("{}").unwrap();
    let co2 = Co2::default();
    let none = GreenDomainSet::new();
    assert!(co2.per_page(&empty, &none).unwrap().abs() < f64::EPSILON);
    assert!(co2.per_domain(&empty, &none).unwrap().is_empty());
    assert!(co2.per_content_type(&empty, &none).unwrap().is_empty());
    assert!(co2.dirtiest_resources(&empty, &none).unwrap().is_empty());
    let split = co2.per_party(&empty, &none).unwrap();
    assert!(split.first_party.abs() < f64::EPSILON);
    assert!(split.third_party.abs() < f64::EPSILON);
}

#[test]
fn summary_bundles_every_aggregate() {
    let co2 = Co2::default();
    let report = co2.summarize(&page(), &green()).unwrap();
    assert!(close(report.total, co2.per_page(&page(), &green()).unwrap()));
    assert_eq!(report.per_domain.len(), 11);
    assert_eq!(report.dirtiest_resources.len(), 10);
    assert_eq!(report.per_content_type.len(), 6);
}
