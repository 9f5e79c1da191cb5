// ── Fixed model coefficients ──
//
// Pure data. Nothing here is ever mutated; per-call overrides live in
// `options` and are resolved against these defaults.

/// Byte multiples used when converting transfer sizes.
pub mod file_size {
    pub const KILOBYTE: u64 = 1_000;
    pub const MEGABYTE: u64 = 1_000 * KILOBYTE;
    pub const GIGABYTE: u64 = 1_000 * MEGABYTE;
}

// ── Sustainable Web Design ──────────────────────────────────────────

/// Estimated total energy use of the internet (~2000 TWh) divided by the
/// total transfer it enables (~2500 EB), revised from 0.81 to 0.75.
pub const KWH_PER_GB: f64 = 0.75;

// Share of the energy attributed to each part of the system. Published
// figures, not renormalised.
pub const END_USER_DEVICE_ENERGY: f64 = 0.52;
pub const NETWORK_ENERGY: f64 = 0.14;
pub const DATACENTER_ENERGY: f64 = 0.15;
pub const PRODUCTION_ENERGY: f64 = 0.19;

/// Global average carbon intensity for 2021 (Ember), g CO2/kWh.
pub const GLOBAL_GRID_INTENSITY: f64 = 442.0;

/// Carbon intensity applied to green-hosted datacenters, g CO2/kWh.
pub const RENEWABLES_GRID_INTENSITY: f64 = 50.0;

// Caching assumptions, complementary variant.
pub const FIRST_TIME_VIEWING_PERCENTAGE: f64 = 0.75;
pub const RETURNING_VISITOR_PERCENTAGE: f64 = 0.25;

// Caching assumptions, independent variant.
pub const INDEPENDENT_FIRST_TIME_VIEWING_PERCENTAGE: f64 = 0.8;
pub const INDEPENDENT_RETURNING_VISITOR_PERCENTAGE: f64 = 0.2;

/// Share of a page re-fetched on a repeat visit.
pub const PERCENTAGE_OF_DATA_LOADED_ON_SUBSEQUENT_LOAD: f64 = 0.02;

/// Monthly visitor count assumed by the annual helpers.
pub const DEFAULT_MONTHLY_VISITORS: f64 = 1000.0;

// ── OneByte ─────────────────────────────────────────────────────────

// Grid intensities used by the OneByte model, g CO2/kWh.
pub const CO2_PER_KWH_IN_DC_GREY: f64 = 519.0;
pub const CO2_PER_KWH_NETWORK_GREY: f64 = 475.0;
pub const CO2_PER_KWH_IN_DC_GREEN: f64 = 0.0;

/// Datacenter energy per byte, kWh.
pub const KWH_PER_BYTE_IN_DC: f64 = 0.000_000_000_072;

// Per-byte energy for each access network type, kWh.
pub const FIXED_NETWORK_WIRED: f64 = 0.000_000_000_429;
pub const FIXED_NETWORK_WIFI: f64 = 0.000_000_000_152;
pub const FOUR_G_MOBILE: f64 = 0.000_000_000_884;

/// Network energy per byte, averaged over the three access types.
pub const KWH_PER_BYTE_FOR_NETWORK: f64 =
    (FIXED_NETWORK_WIRED + FIXED_NETWORK_WIFI + FOUR_G_MOBILE) / 3.0;
