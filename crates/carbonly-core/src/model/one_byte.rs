// ── OneByte model ──
//
// The legacy flat-ratio model from The Shift Project's "1byte" figures.
// A single energy-per-byte figure for datacenter and network, no
// per-component breakdown and no caching semantics.

use serde::Serialize;
use tracing::trace;

use super::{Estimate, bytes_to_f64};
use crate::constants::{
    CO2_PER_KWH_IN_DC_GREEN, CO2_PER_KWH_IN_DC_GREY, CO2_PER_KWH_NETWORK_GREY, KWH_PER_BYTE_FOR_NETWORK,
    KWH_PER_BYTE_IN_DC,
};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OneByte;

impl OneByte {
    pub fn new() -> Self {
        Self
    }

    /// Grams of CO2 per byte for grey or green hosting.
    pub fn co2_per_byte(green: bool) -> f64 {
        if green {
            KWH_PER_BYTE_IN_DC * CO2_PER_KWH_IN_DC_GREEN
                + KWH_PER_BYTE_FOR_NETWORK * CO2_PER_KWH_NETWORK_GREY
        } else {
            (KWH_PER_BYTE_IN_DC + KWH_PER_BYTE_FOR_NETWORK) * CO2_PER_KWH_IN_DC_GREY
        }
    }

    /// Emissions for `bytes` transferred. Always total-only.
    #[allow(clippy::unused_self)]
    pub fn per_byte(&self, bytes: u64, green: bool) -> Estimate {
        if bytes == 0 {
            return Estimate::total_only(0.0);
        }
        let total = bytes_to_f64(bytes) * Self::co2_per_byte(green);
        trace!(bytes, green, total, "onebyte estimate");
        Estimate::total_only(total)
    }

    /// OneByte has no caching model.
    #[allow(clippy::unused_self)]
    pub fn per_visit(&self, _bytes: u64, _green: bool) -> Result<Estimate, CoreError> {
        Err(CoreError::UnsupportedOperation {
            operation: "per_visit",
            alternative: "per_byte",
        })
    }
}
