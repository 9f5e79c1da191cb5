#![allow(clippy::unwrap_used)]
// Single-transfer estimates through the facade.

use carbonly_core::{
    CachingVariant, Co2, Co2Config, ComponentIntensity, CoreError, EstimateOptions,
    GridIntensityOptions, ModelName, ResultShape, SustainableWebDesign,
};
use pretty_assertions::assert_eq;

const MILLION: u64 = 1_000_000;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1e-3)
}

fn one_byte() -> Co2 {
    Co2::with_model("1byte").unwrap()
}

// ── Reference values ────────────────────────────────────────────────

#[test]
fn one_byte_million_bytes() {
    let grey = one_byte().per_byte(MILLION, false).unwrap().total;
    let green = one_byte().per_byte(MILLION, true).unwrap().total;
    assert!(close(grey, 0.290_813), "grey {grey}");
    assert!(close(green, 0.231_958_333_3), "green {green}");
}

#[test]
fn swd_million_bytes() {
    let co2 = Co2::default();
    assert!(close(co2.per_byte(MILLION, false).unwrap().total, 0.3315));
    assert!(close(co2.per_byte(MILLION, true).unwrap().total, 0.2874));
    assert!(close(co2.per_visit(MILLION, false).unwrap().total, 0.250_282_5));
    assert!(close(co2.per_visit(MILLION, true).unwrap().total, 0.216_987));
}

#[test]
fn swd_has_wider_boundary_than_one_byte() {
    let swd = Co2::default().per_byte(MILLION, false).unwrap().total;
    let flat = one_byte().per_byte(MILLION, false).unwrap().total;
    assert!(swd > flat);
}

#[test]
fn independent_caching_uses_its_own_shares() {
    let co2 = Co2::new(Co2Config {
        caching: CachingVariant::Independent,
        ..Co2Config::default()
    });
    assert!(close(co2.per_visit(MILLION, false).unwrap().total, 0.266_526));
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn green_never_exceeds_grey() {
    let co2 = Co2::default();
    for bytes in [0, 1, 512, 2_048_000, 10_u64.pow(9)] {
        let grey = co2.per_byte(bytes, false).unwrap().total;
        let green = co2.per_byte(bytes, true).unwrap().total;
        assert!(green <= grey);
        if bytes > 0 {
            assert!(green < grey);
        }
    }
}

#[test]
fn one_byte_is_linear() {
    let co2 = one_byte();
    let one = co2.per_byte(1_000, false).unwrap().total;
    let many = co2.per_byte(7_000, false).unwrap().total;
    assert!(close(many, one * 7.0));
    assert!(co2.per_byte(0, false).unwrap().total.abs() < f64::EPSILON);
}

#[test]
fn segmented_totals_match_plain_totals() {
    let plain = Co2::default();
    let segmented = Co2::new(Co2Config {
        results: ResultShape::Segments,
        ..Co2Config::default()
    });
    let a = plain.per_visit(MILLION, false).unwrap().total;
    let b = segmented.per_visit(MILLION, false).unwrap().total;
    assert!(close(a, b));
}

#[test]
fn segmented_per_byte_serializes_component_keys() {
    let co2 = Co2::new(Co2Config {
        results: ResultShape::Segments,
        ..Co2Config::default()
    });
    let json = serde_json::to_value(co2.per_byte(MILLION, false).unwrap()).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        ["consumerDeviceCO2", "dataCenterCO2", "networkCO2", "productionCO2", "total"]
    );
}

// ── Intensity overrides ─────────────────────────────────────────────

#[test]
fn device_override_changes_only_the_device_share() {
    let co2 = Co2::new(Co2Config {
        results: ResultShape::Segments,
        options: EstimateOptions {
            grid_intensity: GridIntensityOptions {
                device: Some(ComponentIntensity::Value(0.0)),
                ..GridIntensityOptions::default()
            },
            ..EstimateOptions::default()
        },
        ..Co2Config::default()
    });
    let estimate = co2.per_byte(MILLION, false).unwrap();
    // 0.00075 kWh × (0.14 + 0.19 + 0.15) × 442
    assert!(close(estimate.total, 0.159_12));
}

#[test]
fn options_parse_from_camel_case_json() {
    let options: EstimateOptions = serde_json::from_str(
        r#"{
            "gridIntensity": { "device": 100, "network": { "country": "FRA" }, "dataCenter": { "value": 300 } },
            "dataReloadRatio": 0.1
        }"#,
    )
    .unwrap();
    assert!(options.data_reload_ratio.is_some_and(|r| close(r, 0.1)));
    assert_eq!(options.grid_intensity.device, Some(ComponentIntensity::Value(100.0)));
}

// ── Failures ────────────────────────────────────────────────────────

#[test]
fn unknown_model_is_a_configuration_error() {
    assert!(matches!(
        Co2::with_model("2byte"),
        Err(CoreError::InvalidConfiguration { .. })
    ));
    assert_eq!("swd".parse::<ModelName>().unwrap(), ModelName::SustainableWebDesign);
}

#[test]
fn one_byte_has_no_per_visit() {
    assert!(matches!(
        one_byte().per_visit(MILLION, false),
        Err(CoreError::UnsupportedOperation { operation: "per_visit", alternative: "per_byte" })
    ));
}

#[test]
fn numeric_hosting_signal_is_rejected_by_the_model() {
    let err = SustainableWebDesign::new()
        .per_byte(MILLION, 42.0, false, &EstimateOptions::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument { .. }));
    assert!(err.to_string().contains("42"));
}
