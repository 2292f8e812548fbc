//! Cable sizing parameters

use serde::{Deserialize, Serialize};

/// Correction factors and electrical constants for cable sizing.
///
/// A cable's usable ampacity is its base rating derated by the installation
/// correction factors: `Iz' = Iz × K1 × K2 × K3 × K4`, where K4 depends on
/// the thermal environment of the run (exposed tray, shaded tray, buried).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableParameters {
    /// Installation method factor K1.
    /// default: 1.0
    pub k1_installation: f64,

    /// Circuit grouping factor K2.
    /// default: 0.94
    pub k2_grouping: f64,

    /// Ambient temperature factor K3.
    /// default: 0.80
    pub k3_ambient: f64,

    /// Thermal environment factor K4 for a cable tray exposed to the sun
    /// (80 °C).
    /// default: 0.41
    pub k4_exposed_80c: f64,

    /// K4 for a shaded cable tray (50 °C).
    /// default: 0.82
    pub k4_shaded_50c: f64,

    /// K4 for a buried run (25 °C).
    /// default: 1.04
    pub k4_buried_25c: f64,

    /// Copper resistivity (Ω·mm²/m).
    /// default: 0.0168
    pub resistivity: f64,

    /// Power factor cos φ of the AC load.
    /// default: 0.8
    pub cos_phi: f64,

    /// sin φ of the AC load.
    /// default: 0.6
    pub sin_phi: f64,

    /// Linear reactance term λ for AC voltage drop (Ω/m scale factor).
    /// default: 0.8e-3
    pub lambda_reactance: f64,

    /// Default per-run voltage drop ceiling (%), used when the cable record
    /// carries no override.
    /// default: 1.5
    pub max_voltage_drop_percent: f64,
}

impl Default for CableParameters {
    fn default() -> Self {
        Self {
            k1_installation: 1.0,
            k2_grouping: 0.94,
            k3_ambient: 0.80,
            k4_exposed_80c: 0.41,
            k4_shaded_50c: 0.82,
            k4_buried_25c: 1.04,
            resistivity: 0.0168,
            cos_phi: 0.8,
            sin_phi: 0.6,
            lambda_reactance: 0.8e-3,
            max_voltage_drop_percent: 1.5,
        }
    }
}

impl CableParameters {
    /// Combined derating factor shared by every thermal case (K1 × K2 × K3).
    pub fn base_derating(&self) -> f64 {
        self.k1_installation * self.k2_grouping * self.k3_ambient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_derating() {
        let params = CableParameters::default();
        // 1.0 × 0.94 × 0.80 = 0.752
        assert!(
            (params.base_derating() - 0.752).abs() < 1e-12,
            "Expected 0.752, got {}",
            params.base_derating()
        );
    }

    #[test]
    fn test_k4_orders_with_temperature() {
        let params = CableParameters::default();
        assert!(
            params.k4_exposed_80c < params.k4_shaded_50c
                && params.k4_shaded_50c < params.k4_buried_25c,
            "Hotter environments must derate harder"
        );
    }
}
