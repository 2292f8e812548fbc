//! End-to-end sizing study
//!
//! Wires the components into the full pipeline: validate inputs, adjust the
//! panel to the design-temperature extremes, compute string bounds, derive
//! protection requirements, evaluate candidate devices and assess cable
//! runs, assembling everything into one [`SizingResult`].
//!
//! The study is request-scoped: every value is computed fresh from the
//! supplied records and nothing survives the call. Identical inputs yield
//! identical results.

use crate::array::{
    ArrayConfiguration, CompatibilityWarning, ParallelBounds, SeriesBounds, StringSizing,
};
use crate::cable::{CableAssessment, CableSizing};
use crate::compliance::{ComplianceChecker, ComplianceFinding};
use crate::parameters::{ArraySizingParameters, CableParameters, ProtectionParameters};
use crate::protection::{ProtectionRequirements, ProtectionSizing};
use log::debug;
use pvsizing_core::equipment::{
    CableSpec, CandidateDevice, InverterSpec, PanelSpec, SiteThermalBounds, SystemSide,
};
use pvsizing_core::errors::DesignResult;
use serde::{Deserialize, Serialize};

/// Everything a study may consume.
///
/// The extras beyond panel/inverter/thermal are optional: candidate devices
/// and cable runs may arrive in later workflow stages, and the target power
/// only matters when the caller wants a concrete layout chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyInputs {
    pub panel: PanelSpec,
    pub inverter: InverterSpec,
    pub thermal: SiteThermalBounds,
    #[serde(default)]
    pub candidate_devices: Vec<CandidateDevice>,
    #[serde(default)]
    pub cables: Vec<CableSpec>,
    #[serde(default)]
    pub target_power_w: Option<f64>,
}

impl StudyInputs {
    pub fn new(panel: PanelSpec, inverter: InverterSpec, thermal: SiteThermalBounds) -> Self {
        Self {
            panel,
            inverter,
            thermal,
            candidate_devices: Vec::new(),
            cables: Vec::new(),
            target_power_w: None,
        }
    }

    fn validate(&self) -> DesignResult<()> {
        self.panel.validate()?;
        self.inverter.validate()?;
        self.thermal.validate()?;
        for device in &self.candidate_devices {
            device.validate()?;
        }
        for cable in &self.cables {
            cable.validate()?;
        }
        Ok(())
    }
}

/// The complete study output.
///
/// A derived snapshot for the given inputs: recomputed on every request,
/// never cached, never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Open-circuit voltage at the minimum design temperature (V).
    pub voc_at_min_temp: f64,
    /// MPP voltage at the minimum design temperature (V).
    pub vmp_at_min_temp: f64,
    /// MPP voltage at the maximum design temperature (V).
    pub vmp_at_max_temp: f64,
    /// Short-circuit current at the maximum design temperature (A).
    pub isc_at_max_temp: f64,
    /// MPP current at the maximum design temperature (A).
    pub imp_at_max_temp: f64,

    pub series: SeriesBounds,
    pub parallel: ParallelBounds,

    /// Array DC power over inverter nominal AC power, at the chosen
    /// configuration when one was selected, otherwise at the optimal bounds
    /// layout.
    pub power_ratio: f64,
    /// Array DC rated power for the same layout (W).
    pub array_power_w: f64,

    pub compatible: bool,
    pub warnings: Vec<CompatibilityWarning>,

    /// Concrete layout for the requested target power, when feasible.
    pub configuration: Option<ArrayConfiguration>,

    pub requirements: ProtectionRequirements,
    pub findings: Vec<ComplianceFinding>,
    pub compliance_score: u8,

    pub cables: Vec<CableAssessment>,
}

/// The assembled pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizingStudy {
    array: StringSizing,
    protection: ProtectionSizing,
    compliance: ComplianceChecker,
    cable: CableSizing,
}

impl SizingStudy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(
        array: ArraySizingParameters,
        protection: ProtectionParameters,
        cable: CableParameters,
    ) -> Self {
        Self {
            array: StringSizing::from_parameters(array),
            protection: ProtectionSizing::from_parameters(protection),
            compliance: ComplianceChecker::new(),
            cable: CableSizing::from_parameters(cable),
        }
    }

    /// Run the full study.
    pub fn compute(&self, inputs: &StudyInputs) -> DesignResult<SizingResult> {
        inputs.validate()?;

        debug!(
            "sizing study: {} {} / {} {}",
            inputs.panel.manufacturer,
            inputs.panel.model,
            inputs.inverter.manufacturer,
            inputs.inverter.model
        );

        let cold = inputs.panel.at_temperature(inputs.thermal.min_design_temp);
        let hot = inputs.panel.at_temperature(inputs.thermal.max_design_temp);

        let sizing = self
            .array
            .size(&inputs.panel, &inputs.inverter, &inputs.thermal);

        let configuration = inputs.target_power_w.and_then(|target| {
            self.array
                .select_configuration(&inputs.panel, &inputs.inverter, &inputs.thermal, target)
        });

        // Protection rules key off the panels-per-string count: the chosen
        // layout's when one exists, otherwise the optimal bound.
        let series_count = configuration
            .as_ref()
            .map(|c| c.panels_per_string)
            .unwrap_or(sizing.series.optimal);

        let ac_cable_ampacity = inputs
            .cables
            .iter()
            .find(|c| c.side == SystemSide::Ac)
            .map(|c| c.ampacity);

        let requirements = self.protection.requirements(
            &inputs.panel,
            &inputs.inverter,
            series_count,
            &cold,
            ac_cable_ampacity,
        );

        let findings = self
            .compliance
            .evaluate(&requirements, &inputs.candidate_devices);
        let compliance_score = self.compliance.score(&findings);

        let short_circuit_factor = self.protection.parameters().short_circuit_factor;
        let cables = inputs
            .cables
            .iter()
            .map(|cable| match cable.side {
                // A string run carries the fault-rated string current and is
                // judged against the module Vmp, per the UTE worksheets.
                SystemSide::Dc => self.cable.assess(
                    cable,
                    short_circuit_factor * hot.isc,
                    inputs.panel.voltage_at_pmax,
                ),
                SystemSide::Ac => self.cable.assess(
                    cable,
                    inputs.inverter.max_output_current,
                    inputs.inverter.output_voltage,
                ),
            })
            .collect();

        let (power_ratio, array_power_w) = match &configuration {
            Some(c) => (c.power_ratio, c.array_power_w),
            None => (sizing.power_ratio, sizing.array_power_w),
        };

        debug!(
            "study complete: ratio {:.3}, compatible {}, compliance score {}",
            power_ratio, sizing.compatible, compliance_score
        );

        Ok(SizingResult {
            voc_at_min_temp: cold.voc,
            vmp_at_min_temp: cold.vmp,
            vmp_at_max_temp: hot.vmp,
            isc_at_max_temp: hot.isc,
            imp_at_max_temp: hot.imp,
            series: sizing.series,
            parallel: sizing.parallel,
            power_ratio,
            array_power_w,
            compatible: sizing.compatible,
            warnings: sizing.warnings,
            configuration,
            requirements,
            findings,
            compliance_score,
            cables,
        })
    }
}

/// Convenience entry point with default parameters.
///
/// This is the plain-function surface an API layer calls: panel, inverter,
/// site thermal bounds and whatever candidate devices have been picked so
/// far.
pub fn compute_sizing(
    panel: &PanelSpec,
    inverter: &InverterSpec,
    thermal: &SiteThermalBounds,
    candidate_devices: &[CandidateDevice],
) -> DesignResult<SizingResult> {
    let mut inputs = StudyInputs::new(panel.clone(), inverter.clone(), *thermal);
    inputs.candidate_devices = candidate_devices.to_vec();
    SizingStudy::new().compute(&inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvsizing_core::errors::DesignError;

    fn reference_panel() -> PanelSpec {
        PanelSpec {
            manufacturer: "SunPower".to_string(),
            model: "SPR-MAX3-360".to_string(),
            max_power_w: 360.0,
            open_circuit_voltage: 69.5,
            short_circuit_current: 6.48,
            voltage_at_pmax: 59.1,
            current_at_pmax: 6.09,
            temp_coeff_voc: -0.25,
            temp_coeff_isc: 0.05,
            temp_coeff_pmax: -0.29,
            max_series_fuse_rating: 20.0,
        }
    }

    fn reference_inverter() -> InverterSpec {
        InverterSpec {
            manufacturer: "Growatt".to_string(),
            model: "MIN 5000TL-X".to_string(),
            max_dc_voltage: 600.0,
            mppt_voltage_range_min: 100.0,
            mppt_voltage_range_max: 480.0,
            max_input_current_per_mppt: 13.0,
            max_short_circuit_current: 15.0,
            nominal_output_power: 5000.0,
            max_output_current: 22.7,
            output_voltage: 230.0,
        }
    }

    #[test]
    fn test_compute_sizing_populates_adjusted_values() {
        let result = compute_sizing(
            &reference_panel(),
            &reference_inverter(),
            &SiteThermalBounds::default(),
            &[],
        )
        .expect("valid inputs");
        assert!((result.voc_at_min_temp - 75.58125).abs() < 1e-9);
        assert!((result.isc_at_max_temp - 6.6744).abs() < 1e-9);
        assert!(result.compatible);
        assert!(result.findings.is_empty(), "no candidates, no findings");
        assert_eq!(result.compliance_score, 100);
    }

    #[test]
    fn test_invalid_input_propagates_before_any_computation() {
        let mut panel = reference_panel();
        panel.open_circuit_voltage = 0.0;
        let err = compute_sizing(
            &panel,
            &reference_inverter(),
            &SiteThermalBounds::default(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, DesignError::NonPositiveValue { .. }));
    }

    #[test]
    fn test_results_are_bit_identical_across_calls() {
        let panel = reference_panel();
        let inverter = reference_inverter();
        let thermal = SiteThermalBounds::default();
        let a = compute_sizing(&panel, &inverter, &thermal, &[]).unwrap();
        let b = compute_sizing(&panel, &inverter, &thermal, &[]).unwrap();
        assert_eq!(a, b, "the study holds no hidden state");
    }

    #[test]
    fn test_target_power_selects_configuration() {
        let mut inputs = StudyInputs::new(
            reference_panel(),
            reference_inverter(),
            SiteThermalBounds::default(),
        );
        inputs.target_power_w = Some(5000.0);
        let result = SizingStudy::new().compute(&inputs).unwrap();
        let configuration = result.configuration.expect("feasible layout");
        assert_eq!(configuration.total_panels, 14);
        // The result-level ratio follows the chosen layout.
        assert!((result.power_ratio - 1.008).abs() < 1e-9);
        assert!((result.array_power_w - 5040.0).abs() < 1e-9);
    }

    #[test]
    fn test_ac_cable_caps_breaker_requirement() {
        let mut inputs = StudyInputs::new(
            reference_panel(),
            reference_inverter(),
            SiteThermalBounds::default(),
        );
        inputs.cables.push(CableSpec {
            side: SystemSide::Ac,
            section_mm2: 4.0,
            length_m: 10.0,
            ampacity: 30.0,
            max_voltage_drop_percent: None,
        });
        let result = SizingStudy::new().compute(&inputs).unwrap();
        assert_eq!(result.requirements.ac_breaker.max_current, Some(30.0));
        assert_eq!(result.cables.len(), 1);
    }

    #[test]
    fn test_serializes_to_json_for_the_api_layer() {
        let result = compute_sizing(
            &reference_panel(),
            &reference_inverter(),
            &SiteThermalBounds::default(),
            &[],
        )
        .unwrap();
        let json = serde_json::to_string(&result).expect("serialization failed");
        let parsed: SizingResult = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(result, parsed);
    }
}
