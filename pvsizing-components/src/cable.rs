//! Cable sizing and voltage drop
//!
//! Assesses DC and AC cable runs against the sized array's currents:
//! ampacity derated for the installation environment, voltage drop over the
//! run, and a recommended minimum conductor section.
//!
//! Derated ampacity is `Iz' = Iz × K1 × K2 × K3 × K4`, evaluated for the
//! three thermal environments of the worksheets (exposed tray at 80 °C,
//! shaded tray at 50 °C, buried at 25 °C); compliance is judged against the
//! worst case.
//!
//! Voltage drop:
//! - DC: $\Delta u = 2 \rho \frac{L}{S} I_{mp}$, expressed as a percentage
//!   of the module Vmp (as the UTE worksheets express it)
//! - AC: $\Delta u = 2 (\rho \frac{L}{S} \cos\varphi + \lambda L \sin\varphi) I_{max}$,
//!   as a percentage of the nominal AC voltage

use crate::parameters::CableParameters;
use pvsizing_core::equipment::{CableSpec, SystemSide};
use serde::{Deserialize, Serialize};

/// Derated ampacity for the three thermal environments (A).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeratedAmpacity {
    /// Cable tray exposed to the sun (80 °C).
    pub exposed_80c: f64,
    /// Shaded cable tray (50 °C).
    pub shaded_50c: f64,
    /// Buried run (25 °C).
    pub buried_25c: f64,
}

impl DeratedAmpacity {
    /// The most pessimistic of the three environments.
    pub fn worst_case(&self) -> f64 {
        self.exposed_80c.min(self.shaded_50c).min(self.buried_25c)
    }
}

/// Assessment of one cable run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableAssessment {
    pub side: SystemSide,
    pub section_mm2: f64,
    pub derated: DeratedAmpacity,
    /// Design current the run must carry (A).
    pub required_current: f64,
    /// Minimum section from the standard ampacity ladder (mm²).
    pub recommended_section_mm2: f64,
    /// Absolute voltage drop over the run (V).
    pub voltage_drop_v: f64,
    /// Drop as a percentage of the reference voltage.
    pub voltage_drop_percent: f64,
    pub is_compliant: bool,
    pub issue: Option<String>,
}

/// Cable sizing component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableSizing {
    parameters: CableParameters,
}

impl CableSizing {
    pub fn new() -> Self {
        Self::from_parameters(CableParameters::default())
    }

    pub fn from_parameters(parameters: CableParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &CableParameters {
        &self.parameters
    }

    /// Derate a base ampacity for the three thermal environments.
    pub fn derate(&self, ampacity: f64) -> DeratedAmpacity {
        let base = ampacity * self.parameters.base_derating();
        DeratedAmpacity {
            exposed_80c: base * self.parameters.k4_exposed_80c,
            shaded_50c: base * self.parameters.k4_shaded_50c,
            buried_25c: base * self.parameters.k4_buried_25c,
        }
    }

    /// Minimum conductor section for a design current, from the standard
    /// ampacity ladder (mm²).
    pub fn recommended_section(current: f64) -> f64 {
        match current {
            c if c <= 16.0 => 2.5,
            c if c <= 25.0 => 4.0,
            c if c <= 35.0 => 6.0,
            c if c <= 50.0 => 10.0,
            c if c <= 70.0 => 16.0,
            c if c <= 90.0 => 25.0,
            c if c <= 120.0 => 35.0,
            _ => 50.0,
        }
    }

    /// Voltage drop over a run (V) for the run's side.
    pub fn voltage_drop(&self, cable: &CableSpec, current: f64) -> f64 {
        let p = &self.parameters;
        let resistance = p.resistivity * cable.length_m / cable.section_mm2;
        match cable.side {
            SystemSide::Dc => 2.0 * resistance * current,
            SystemSide::Ac => {
                2.0 * (resistance * p.cos_phi
                    + p.lambda_reactance * cable.length_m * p.sin_phi)
                    * current
            }
        }
    }

    /// Assess a run against a design current and reference voltage.
    ///
    /// `reference_voltage` is the module Vmp for DC runs and the nominal AC
    /// voltage for AC runs.
    pub fn assess(
        &self,
        cable: &CableSpec,
        required_current: f64,
        reference_voltage: f64,
    ) -> CableAssessment {
        let derated = self.derate(cable.ampacity);
        let voltage_drop_v = self.voltage_drop(cable, required_current);
        let voltage_drop_percent = 100.0 * voltage_drop_v / reference_voltage;
        let drop_limit = cable
            .max_voltage_drop_percent
            .unwrap_or(self.parameters.max_voltage_drop_percent);

        let mut issues = Vec::new();
        if derated.worst_case() < required_current {
            issues.push(format!(
                "derated ampacity ({:.1}A worst case) is below the design current ({:.1}A)",
                derated.worst_case(),
                required_current
            ));
        }
        if voltage_drop_percent > drop_limit {
            issues.push(format!(
                "voltage drop ({:.2}%) exceeds the {:.1}% limit",
                voltage_drop_percent, drop_limit
            ));
        }

        CableAssessment {
            side: cable.side,
            section_mm2: cable.section_mm2,
            derated,
            required_current,
            recommended_section_mm2: Self::recommended_section(required_current),
            voltage_drop_v,
            voltage_drop_percent,
            is_compliant: issues.is_empty(),
            issue: if issues.is_empty() {
                None
            } else {
                Some(issues.join("; "))
            },
        }
    }
}

impl Default for CableSizing {
    fn default() -> Self {
        Self::new()
    }
}
