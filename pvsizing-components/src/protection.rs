//! Protection-device requirement computation
//!
//! Derives the minimum acceptable rating for each protection-device role
//! from the sized array's worst-case voltages and currents. Whether a bound
//! is strict (`>`) or inclusive (`≥`) is part of the contract — a device
//! rated exactly at an inclusive bound is acceptable, one rated exactly at a
//! strict bound is not — so bounds carry their inclusivity explicitly.

use crate::parameters::ProtectionParameters;
use pvsizing_core::equipment::{DeviceRole, InverterSpec, PanelSpec};
use pvsizing_core::temperature::OperatingPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lower bound on a rating, inclusive or strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowerBound {
    pub value: f64,
    pub inclusive: bool,
}

impl LowerBound {
    /// `rating ≥ value`
    pub fn at_least(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// `rating > value`
    pub fn above(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Whether a rating satisfies the bound.
    pub fn admits(&self, rating: f64) -> bool {
        if self.inclusive {
            rating >= self.value
        } else {
            rating > self.value
        }
    }
}

impl fmt::Display for LowerBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inclusive {
            write!(f, ">= {:.2}", self.value)
        } else {
            write!(f, "> {:.2}", self.value)
        }
    }
}

/// Required ratings for one protection-device role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRequirement {
    pub role: DeviceRole,
    /// Voltage rule. For surge arresters this constrains the continuous
    /// operating voltage.
    pub voltage: LowerBound,
    /// Current rule; absent for roles rated only by discharge current.
    pub current: Option<LowerBound>,
    /// Upper current limit, when one applies (string fuses are capped by the
    /// panel's max series fuse rating, AC breakers by the cable ampacity).
    pub max_current: Option<f64>,
    /// Nominal discharge current rule for surge arresters (kA).
    pub discharge_current_ka: Option<LowerBound>,
    /// Required differential sensitivity for the AC breaker (mA).
    pub differential_sensitivity_ma: Option<f64>,
}

/// The full requirement set, one record per role, plus the
/// parallel-connection limits that decide whether string fuses are needed
/// at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRequirements {
    pub dc_fuse: DeviceRequirement,
    pub dc_disconnect: DeviceRequirement,
    pub dc_surge: DeviceRequirement,
    pub ac_breaker: DeviceRequirement,
    pub ac_surge: DeviceRequirement,
    pub ac_disconnect: DeviceRequirement,

    /// Maximum parallel string count with no string protection,
    /// `(1 + Irm) / Isc`, where `Irm` is the panel's max series fuse rating.
    pub unprotected_parallel_limit: f64,

    /// Maximum parallel string count per protected string,
    /// `0.5 × (1 + Irm / Imp)`.
    pub protected_string_limit: f64,
}

impl ProtectionRequirements {
    /// Requirement record for one role.
    pub fn for_role(&self, role: DeviceRole) -> &DeviceRequirement {
        match role {
            DeviceRole::DcFuse => &self.dc_fuse,
            DeviceRole::DcDisconnectSwitch => &self.dc_disconnect,
            DeviceRole::DcSurgeArrester => &self.dc_surge,
            DeviceRole::AcCircuitBreaker => &self.ac_breaker,
            DeviceRole::AcSurgeArrester => &self.ac_surge,
            DeviceRole::AcDisconnectSwitch => &self.ac_disconnect,
        }
    }

    /// All six requirement records.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRequirement> {
        [
            &self.dc_fuse,
            &self.dc_disconnect,
            &self.dc_surge,
            &self.ac_breaker,
            &self.ac_surge,
            &self.ac_disconnect,
        ]
        .into_iter()
    }
}

/// Protection requirement component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionSizing {
    parameters: ProtectionParameters,
}

impl ProtectionSizing {
    pub fn new() -> Self {
        Self::from_parameters(ProtectionParameters::default())
    }

    pub fn from_parameters(parameters: ProtectionParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &ProtectionParameters {
        &self.parameters
    }

    /// Build the requirement set for an array of `series_count` panels per
    /// string.
    ///
    /// `cold` is the operating point at the minimum design temperature (the
    /// voltage worst case). `ac_cable_ampacity` caps the AC breaker rating
    /// when the cable run is known.
    pub fn requirements(
        &self,
        panel: &PanelSpec,
        inverter: &InverterSpec,
        series_count: u32,
        cold: &OperatingPoint,
        ac_cable_ampacity: Option<f64>,
    ) -> ProtectionRequirements {
        let p = &self.parameters;
        let string_voc_cold = cold.voc * f64::from(series_count);
        let isc_stc = panel.short_circuit_current;

        let dc_fuse = DeviceRequirement {
            role: DeviceRole::DcFuse,
            voltage: LowerBound::at_least(string_voc_cold),
            current: Some(LowerBound::at_least(p.fuse_current_factor() * isc_stc)),
            max_current: Some(panel.max_series_fuse_rating),
            discharge_current_ka: None,
            differential_sensitivity_ma: None,
        };

        let dc_disconnect = DeviceRequirement {
            role: DeviceRole::DcDisconnectSwitch,
            voltage: LowerBound::above(string_voc_cold),
            current: Some(LowerBound::above(p.short_circuit_factor * isc_stc)),
            max_current: None,
            discharge_current_ka: None,
            differential_sensitivity_ma: None,
        };

        let dc_surge = DeviceRequirement {
            role: DeviceRole::DcSurgeArrester,
            voltage: LowerBound::above(
                p.dc_surge_voltage_factor * panel.open_circuit_voltage * f64::from(series_count),
            ),
            // Current withstand under string fault.
            current: Some(LowerBound::above(p.short_circuit_factor * isc_stc)),
            max_current: None,
            discharge_current_ka: Some(LowerBound::above(p.min_discharge_current_ka)),
            differential_sensitivity_ma: None,
        };

        let ac_breaker = DeviceRequirement {
            role: DeviceRole::AcCircuitBreaker,
            voltage: LowerBound::at_least(p.grid_voltage),
            current: Some(LowerBound::at_least(inverter.max_output_current)),
            max_current: ac_cable_ampacity,
            discharge_current_ka: None,
            differential_sensitivity_ma: Some(p.differential_sensitivity_ma),
        };

        let ac_surge = DeviceRequirement {
            role: DeviceRole::AcSurgeArrester,
            voltage: LowerBound::above(p.ac_surge_voltage_factor * p.grid_voltage),
            current: None,
            max_current: None,
            discharge_current_ka: Some(LowerBound::above(p.min_discharge_current_ka)),
            differential_sensitivity_ma: None,
        };

        let ac_disconnect = DeviceRequirement {
            role: DeviceRole::AcDisconnectSwitch,
            voltage: LowerBound::at_least(inverter.output_voltage),
            current: Some(LowerBound::above(
                f64::from(p.number_of_inverters) * inverter.max_output_current,
            )),
            max_current: None,
            discharge_current_ka: None,
            differential_sensitivity_ma: None,
        };

        ProtectionRequirements {
            dc_fuse,
            dc_disconnect,
            dc_surge,
            ac_breaker,
            ac_surge,
            ac_disconnect,
            unprotected_parallel_limit: (1.0 + panel.max_series_fuse_rating) / isc_stc,
            protected_string_limit: 0.5
                * (1.0 + panel.max_series_fuse_rating / panel.current_at_pmax),
        }
    }
}

impl Default for ProtectionSizing {
    fn default() -> Self {
        Self::new()
    }
}
