//! Protection sizing parameters

use serde::{Deserialize, Serialize};

/// Safety factors and system constants for protection-device requirements.
///
/// The factors are the UTE C15-712-1 worksheet margins: string fuses are
/// rated for 1.1 × 1.25 × Isc, disconnect switches for 1.25 × Isc, and
/// surge arresters for a continuous operating voltage margin above the
/// string (DC) or grid (AC) voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionParameters {
    /// Service factor applied on top of the short-circuit factor for
    /// string fuse current ratings.
    /// default: 1.1
    pub fuse_service_factor: f64,

    /// Short-circuit safety factor for DC current ratings.
    /// default: 1.25
    pub short_circuit_factor: f64,

    /// Margin applied to the string Voc for the DC surge arrester's
    /// continuous operating voltage.
    /// default: 1.2
    pub dc_surge_voltage_factor: f64,

    /// Margin applied to the grid voltage for the AC surge arrester's
    /// continuous operating voltage.
    /// default: 1.1
    pub ac_surge_voltage_factor: f64,

    /// Minimum nominal discharge current for surge arresters (kA).
    /// default: 5.0
    pub min_discharge_current_ka: f64,

    /// Differential sensitivity required of the AC breaker (mA).
    /// default: 30.0
    pub differential_sensitivity_ma: f64,

    /// Nominal grid voltage (V).
    /// default: 230.0 (European single-phase)
    pub grid_voltage: f64,

    /// Number of inverters feeding the AC main disconnect switch.
    /// default: 1
    pub number_of_inverters: u32,
}

impl Default for ProtectionParameters {
    fn default() -> Self {
        Self {
            fuse_service_factor: 1.1,
            short_circuit_factor: 1.25,
            dc_surge_voltage_factor: 1.2,
            ac_surge_voltage_factor: 1.1,
            min_discharge_current_ka: 5.0,
            differential_sensitivity_ma: 30.0,
            grid_voltage: 230.0,
            number_of_inverters: 1,
        }
    }
}

impl ProtectionParameters {
    /// Combined factor for string fuse current: 1.1 × 1.25 by default.
    pub fn fuse_current_factor(&self) -> f64 {
        self.fuse_service_factor * self.short_circuit_factor
    }
}
