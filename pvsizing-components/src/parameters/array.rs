//! Array sizing parameters

use serde::{Deserialize, Serialize};

/// Parameters for string sizing and the configuration search.
///
/// The power ratio is the array DC rated power divided by the inverter
/// nominal AC output power. Pairings outside the `[power_ratio_min,
/// power_ratio_max]` band are flagged with a warning but never rejected:
/// installations outside the band are unusual, not impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySizingParameters {
    /// Lowest power ratio flagged as a compatible pairing.
    /// default: 0.9
    pub power_ratio_min: f64,

    /// Highest power ratio flagged as a compatible pairing.
    /// default: 1.3
    pub power_ratio_max: f64,

    /// Ratio the configuration search steers towards. Mild DC oversizing
    /// recovers the inverter's conversion losses.
    /// default: 1.1
    pub power_ratio_preferred: f64,
}

impl Default for ArraySizingParameters {
    fn default() -> Self {
        Self {
            power_ratio_min: 0.9,
            power_ratio_max: 1.3,
            power_ratio_preferred: 1.1,
        }
    }
}

impl ArraySizingParameters {
    /// Whether a power ratio falls inside the acceptable band.
    pub fn ratio_in_band(&self, ratio: f64) -> bool {
        ratio >= self.power_ratio_min && ratio <= self.power_ratio_max
    }
}
