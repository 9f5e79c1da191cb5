// ── Sustainable Web Design model ──
//
// Splits the energy of a transfer across consumer devices, network,
// datacenters and hardware production, applies a carbon intensity per
// component, and optionally discounts repeat visits for browser caching.
// Figures follow https://sustainablewebdesign.org/calculating-digital-emissions/

use serde::Serialize;
use tracing::{debug, trace};

use super::{
    EmissionsByComponent, EnergyByComponent, Estimate, HostingSignal, VisitEnergyByComponent,
    bytes_to_f64, format_number,
};
use crate::constants::{KWH_PER_GB, file_size::GIGABYTE};
use crate::error::CoreError;
use crate::options::{CachingVariant, EstimateOptions};

/// The component-weighted model. The caching variant is fixed at
/// construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SustainableWebDesign {
    caching: CachingVariant,
}

#[allow(clippy::unused_self)]
impl SustainableWebDesign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caching(caching: CachingVariant) -> Self {
        Self { caching }
    }

    pub fn caching(&self) -> CachingVariant {
        self.caching
    }

    // ── Energy ──────────────────────────────────────────────────────

    /// Kilowatt-hours used by each system component to move `bytes`.
    pub fn energy_per_byte_by_component(&self, bytes: u64) -> EnergyByComponent {
        let gigabytes = bytes_to_f64(bytes) / bytes_to_f64(GIGABYTE);
        let energy = gigabytes * KWH_PER_GB;
        EnergyByComponent::from_fn(|c| energy * c.energy_share())
    }

    /// Total kilowatt-hours used by the whole system to move `bytes`.
    pub fn energy_per_byte(&self, bytes: u64) -> f64 {
        self.energy_per_byte_by_component(bytes).total()
    }

    /// Per-component energy with the caching assumptions applied: each
    /// component is split into a first-visit share and a heavily discounted
    /// returning-visit share.
    pub fn energy_per_visit_by_component(
        &self,
        bytes: u64,
        options: &EstimateOptions,
    ) -> VisitEnergyByComponent {
        let ratios = self.caching.resolve(options);
        let energy = self.energy_per_byte_by_component(bytes);
        trace!(?energy, "energy by component");

        let adjusted = VisitEnergyByComponent {
            first_visit: EnergyByComponent::from_fn(|c| energy.get(c) * ratios.first_visit_percentage),
            return_visit: EnergyByComponent::from_fn(|c| {
                energy.get(c) * ratios.return_visit_percentage * ratios.data_reload_ratio
            }),
        };
        trace!(?adjusted, "cache adjusted energy by component");
        adjusted
    }

    /// Total kilowatt-hours per visit after caching.
    pub fn energy_per_visit(&self, bytes: u64, options: &EstimateOptions) -> f64 {
        let v = self.energy_per_visit_by_component(bytes, options);
        v.first_visit.total() + v.return_visit.total()
    }

    // ── Emissions ───────────────────────────────────────────────────

    /// Convert energy to grams of CO2, resolving each component's intensity
    /// from `options`. A green signal moves the datacenter to renewables.
    pub fn co2_by_component(
        &self,
        energy: &EnergyByComponent,
        signal: HostingSignal,
        options: &EstimateOptions,
    ) -> EmissionsByComponent {
        let green = signal.is_green();
        EmissionsByComponent::from_fn(|c| {
            energy.get(c) * options.grid_intensity.resolve(c, green).value
        })
    }

    /// Grams of CO2 for transferring `bytes`.
    pub fn per_byte(
        &self,
        bytes: u64,
        signal: impl Into<HostingSignal>,
        segment: bool,
        options: &EstimateOptions,
    ) -> Result<Estimate, CoreError> {
        let signal = signal.into();
        signal.require_flag("per_byte")?;

        let energy = self.energy_per_byte_by_component(bytes);
        let co2 = self.co2_by_component(&energy, signal, options);
        debug!(bytes, green = signal.is_green(), total = co2.total(), "swd per byte");

        let estimate = Estimate::components(co2);
        Ok(if segment { estimate } else { estimate.into_total() })
    }

    /// Grams of CO2 per page visit of `bytes`, with caching applied.
    /// First-visit and returning-visit shares are converted separately.
    pub fn per_visit(
        &self,
        bytes: u64,
        signal: impl Into<HostingSignal>,
        segment: bool,
        options: &EstimateOptions,
    ) -> Result<Estimate, CoreError> {
        let signal = signal.into();
        signal.require_flag("per_visit")?;

        let energy = self.energy_per_visit_by_component(bytes, options);
        let first = self.co2_by_component(&energy.first_visit, signal, options);
        let returning = self.co2_by_component(&energy.return_visit, signal, options);

        let estimate = Estimate::visit(first, returning);
        debug!(bytes, green = signal.is_green(), total = estimate.total, "swd per visit");
        Ok(if segment { estimate } else { estimate.into_total() })
    }

    /// Grams of CO2 for `energy_per_visit` kWh at a single intensity,
    /// rounded to two places.
    ///
    /// The intensity is applied to the whole figure, not just the
    /// datacenter share, unlike `per_visit`.
    pub fn emissions_per_visit_in_grams(&self, energy_per_visit: f64, intensity: f64) -> f64 {
        format_number(energy_per_visit * intensity)
    }

    // ── Annual helpers ──────────────────────────────────────────────

    pub fn annual_energy_in_kwh(&self, energy_per_visit: f64, monthly_visitors: f64) -> f64 {
        energy_per_visit * monthly_visitors * 12.0
    }

    pub fn annual_emissions_in_grams(&self, co2_grams: f64, monthly_visitors: f64) -> f64 {
        co2_grams * monthly_visitors * 12.0
    }

    /// Split an annual energy figure across components, rounded to two places.
    pub fn annual_segment_energy(&self, annual_energy: f64) -> EnergyByComponent {
        EnergyByComponent::from_fn(|c| format_number(annual_energy * c.energy_share()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_MONTHLY_VISITORS, GLOBAL_GRID_INTENSITY};
    use crate::model::{Breakdown, Component};
    use crate::options::{ComponentIntensity, GridIntensityOptions};

    const MILLION: u64 = 1_000_000;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn swd() -> SustainableWebDesign {
        SustainableWebDesign::new()
    }

    fn no_options() -> EstimateOptions {
        EstimateOptions::default()
    }

    #[test]
    fn energy_split_uses_fixed_shares() {
        let e = swd().energy_per_byte_by_component(MILLION);
        assert!(close(e.consumer_device, 0.00075 * 0.52));
        assert!(close(e.network, 0.00075 * 0.14));
        assert!(close(e.data_center, 0.00075 * 0.15));
        assert!(close(e.production, 0.00075 * 0.19));
        assert!(close(swd().energy_per_byte(MILLION), 0.00075));
    }

    #[test]
    fn million_bytes_grey_and_green() {
        let grey = swd().per_byte(MILLION, false, false, &no_options()).unwrap();
        let green = swd().per_byte(MILLION, true, false, &no_options()).unwrap();
        assert!(close(grey.total, 0.3315), "grey {}", grey.total);
        assert!(close(green.total, 0.2874), "green {}", green.total);
    }

    #[test]
    fn green_never_exceeds_grey() {
        for bytes in [0, 1, 999, 1_000_000, 52_428_800, 3_000_000_000] {
            let grey = swd().per_byte(bytes, false, false, &no_options()).unwrap().total;
            let green = swd().per_byte(bytes, true, false, &no_options()).unwrap().total;
            assert!(green <= grey);
            if bytes > 0 {
                assert!(green < grey);
            }
        }
    }

    #[test]
    fn segmented_per_byte_exposes_components() {
        let est = swd().per_byte(MILLION, true, true, &no_options()).unwrap();
        let Some(Breakdown::Components(co2)) = est.breakdown else {
            panic!("expected a component breakdown");
        };
        assert!(close(co2.data_center, 0.00075 * 0.15 * 50.0));
        assert!(close(co2.network, 0.00075 * 0.14 * GLOBAL_GRID_INTENSITY));
        assert!(close(co2.total(), est.total));
    }

    #[test]
    fn numeric_signal_is_an_invalid_argument() {
        let err = swd().per_byte(MILLION, 300.0, false, &no_options()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(err.to_string().contains("Received: 300"));

        let err = swd().per_visit(MILLION, 300.0, false, &no_options()).unwrap_err();
        assert!(err.to_string().starts_with("per_visit expects a boolean"));
    }

    #[test]
    fn co2_by_component_accepts_numeric_signal_without_effect() {
        let energy = swd().energy_per_byte_by_component(MILLION);
        let numeric = swd().co2_by_component(&energy, 12.0.into(), &no_options());
        let grey = swd().co2_by_component(&energy, false.into(), &no_options());
        assert_eq!(numeric, grey);
    }

    #[test]
    fn grid_intensity_overrides_apply_per_component() {
        let options = EstimateOptions {
            grid_intensity: GridIntensityOptions {
                device: Some(ComponentIntensity::Value(100.0)),
                network: Some(ComponentIntensity::Value(200.0)),
                data_center: Some(ComponentIntensity::Value(300.0)),
            },
            ..EstimateOptions::default()
        };
        let est = swd().per_byte(MILLION, false, true, &options).unwrap();
        let Some(Breakdown::Components(co2)) = est.breakdown else {
            panic!("expected a component breakdown");
        };
        assert!(close(co2.consumer_device, 0.00075 * 0.52 * 100.0));
        assert!(close(co2.network, 0.00075 * 0.14 * 200.0));
        assert!(close(co2.data_center, 0.00075 * 0.15 * 300.0));
        assert!(close(co2.production, 0.00075 * 0.19 * GLOBAL_GRID_INTENSITY));
    }

    #[test]
    fn per_visit_applies_caching() {
        let grey = swd().per_visit(MILLION, false, false, &no_options()).unwrap();
        let green = swd().per_visit(MILLION, true, false, &no_options()).unwrap();
        assert!(close(grey.total, 0.250_282_5), "grey {}", grey.total);
        assert!(close(green.total, 0.216_987), "green {}", green.total);
        assert!(close(swd().energy_per_visit(MILLION, &no_options()), 0.000_566_25));
    }

    #[test]
    fn independent_caching_uses_its_own_defaults() {
        let model = SustainableWebDesign::with_caching(CachingVariant::Independent);
        let grey = model.per_visit(MILLION, false, false, &no_options()).unwrap();
        assert!(close(grey.total, 0.266_526), "grey {}", grey.total);
    }

    #[test]
    fn segmented_per_visit_keeps_both_shares() {
        let est = swd().per_visit(MILLION, false, true, &no_options()).unwrap();
        let Some(Breakdown::Visit {
            first_visit,
            return_visit,
        }) = est.breakdown
        else {
            panic!("expected a visit breakdown");
        };
        assert!(close(first_visit.total(), 0.3315 * 0.75));
        assert!(close(return_visit.total(), 0.3315 * 0.25 * 0.02));
        assert!(close(first_visit.total() + return_visit.total(), est.total));
    }

    #[test]
    fn visit_options_override_defaults() {
        let options = EstimateOptions {
            first_visit_percentage: Some(1.0),
            data_reload_ratio: Some(0.5),
            ..EstimateOptions::default()
        };
        let energy = swd().energy_per_visit_by_component(MILLION, &options);
        assert!(energy.return_visit.total().abs() < 1e-15);
        assert!(close(energy.first_visit.total(), 0.00075));
    }

    #[test]
    fn emissions_per_visit_in_grams_uses_one_intensity_for_everything() {
        // The single intensity covers every component, not only the datacenter.
        let model = swd();
        let energy = model.energy_per_visit(100 * MILLION, &no_options());
        let single = model.emissions_per_visit_in_grams(energy, 50.0);
        let per_component = model.per_visit(100 * MILLION, true, false, &no_options()).unwrap();
        assert!(close(single, 2.83));
        assert!(single < per_component.total);
    }

    #[test]
    fn annual_helpers_scale_by_twelve_months() {
        let model = swd();
        assert!(close(model.annual_energy_in_kwh(0.5, DEFAULT_MONTHLY_VISITORS), 6000.0));
        assert!(close(model.annual_emissions_in_grams(2.0, 10.0), 240.0));
    }

    #[test]
    fn annual_segment_energy_rounds_each_share() {
        let seg = swd().annual_segment_energy(123.456);
        assert!(close(seg.get(Component::ConsumerDevice), 64.2));
        assert!(close(seg.get(Component::Network), 17.28));
        assert!(close(seg.get(Component::DataCenter), 18.52));
        assert!(close(seg.get(Component::Production), 23.46));
    }
}
