//! Candidate-device compliance checking
//!
//! Single-pass, stateless evaluation of supplied protection devices against
//! the computed requirement set. Non-compliance is a normal, expected output
//! consumed by the caller to drive user-facing warnings — never an error.
//!
//! Roles with no supplied candidate are omitted from the findings: device
//! selection may happen in a later workflow stage, so absence is not a
//! failure.

use crate::protection::{DeviceRequirement, LowerBound, ProtectionRequirements};
use log::debug;
use pvsizing_core::equipment::{CandidateDevice, DeviceRole};
use serde::{Deserialize, Serialize};

/// How bad a violation is, for scoring and triage.
///
/// Voltage shortfalls can destroy equipment or arc, so they rank critical;
/// current and discharge shortfalls trip or age the device, ranking error;
/// incomplete datasheets rank warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

/// Verdict for one supplied candidate device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub role: DeviceRole,
    pub manufacturer: String,
    pub model: String,
    pub is_compliant: bool,
    /// Worst violation severity; absent when compliant.
    pub severity: Option<Severity>,
    /// Human-readable statement of every violated bound, citing both the
    /// device rating and the requirement; absent when compliant.
    pub issue: Option<String>,
    /// Suggested remediation; absent when compliant.
    pub recommendation: Option<String>,
}

/// Compliance checker component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceChecker {}

struct Violation {
    severity: Severity,
    description: String,
}

fn bound_phrase(bound: &LowerBound) -> &'static str {
    if bound.inclusive {
        "does not meet minimum requirement"
    } else {
        "must exceed"
    }
}

impl ComplianceChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every supplied candidate against its role's requirement.
    pub fn evaluate(
        &self,
        requirements: &ProtectionRequirements,
        candidates: &[CandidateDevice],
    ) -> Vec<ComplianceFinding> {
        debug!("compliance check over {} candidate devices", candidates.len());
        candidates
            .iter()
            .map(|device| self.evaluate_device(requirements.for_role(device.role), device))
            .collect()
    }

    fn evaluate_device(
        &self,
        requirement: &DeviceRequirement,
        device: &CandidateDevice,
    ) -> ComplianceFinding {
        let mut violations: Vec<Violation> = Vec::new();
        let mut missing_data = false;

        // Voltage rule. Surge arresters are judged on their continuous
        // operating voltage, everything else on the plain rated voltage.
        match device.operating_voltage() {
            Some(voltage) => {
                if !requirement.voltage.admits(voltage) {
                    violations.push(Violation {
                        severity: Severity::Critical,
                        description: format!(
                            "voltage rating ({:.2}V) {} ({:.2}V)",
                            voltage,
                            bound_phrase(&requirement.voltage),
                            requirement.voltage.value
                        ),
                    });
                }
            }
            None => {
                missing_data = true;
                violations.push(Violation {
                    severity: Severity::Warning,
                    description: "voltage rating is not specified".to_string(),
                });
            }
        }

        // Current rule, when the role has one.
        if let Some(bound) = requirement.current {
            match device.rated_current {
                Some(current) => {
                    if !bound.admits(current) {
                        violations.push(Violation {
                            severity: Severity::Error,
                            description: format!(
                                "current rating ({:.2}A) {} ({:.2}A)",
                                current,
                                bound_phrase(&bound),
                                bound.value
                            ),
                        });
                    }
                    if let Some(max) = requirement.max_current {
                        if current > max {
                            violations.push(Violation {
                                severity: Severity::Error,
                                description: format!(
                                    "current rating ({:.2}A) exceeds maximum allowed ({:.2}A)",
                                    current, max
                                ),
                            });
                        }
                    }
                }
                None => {
                    missing_data = true;
                    violations.push(Violation {
                        severity: Severity::Warning,
                        description: "current rating is not specified".to_string(),
                    });
                }
            }
        }

        // Discharge rule for surge arresters.
        if let Some(bound) = requirement.discharge_current_ka {
            match device.nominal_discharge_current_ka {
                Some(discharge) => {
                    if !bound.admits(discharge) {
                        violations.push(Violation {
                            severity: Severity::Error,
                            description: format!(
                                "nominal discharge current ({:.1}kA) {} ({:.1}kA)",
                                discharge,
                                bound_phrase(&bound),
                                bound.value
                            ),
                        });
                    }
                }
                None => {
                    missing_data = true;
                    violations.push(Violation {
                        severity: Severity::Warning,
                        description: "nominal discharge current is not specified".to_string(),
                    });
                }
            }
        }

        // Differential sensitivity, checked only when the device states one.
        if let (Some(required), Some(actual)) = (
            requirement.differential_sensitivity_ma,
            device.differential_sensitivity_ma,
        ) {
            if actual > required {
                violations.push(Violation {
                    severity: Severity::Error,
                    description: format!(
                        "differential sensitivity ({:.0}mA) exceeds required ({:.0}mA)",
                        actual, required
                    ),
                });
            }
        }

        let is_compliant = violations.is_empty();
        let severity = violations.iter().map(|v| v.severity).max();
        let issue = if is_compliant {
            None
        } else {
            Some(
                violations
                    .iter()
                    .map(|v| v.description.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };
        let recommendation = if is_compliant {
            None
        } else if missing_data {
            Some("Specify complete device information".to_string())
        } else {
            Some(format!("Replace with higher rated {}", device.role))
        };

        ComplianceFinding {
            role: device.role,
            manufacturer: device.manufacturer.clone(),
            model: device.model.clone(),
            is_compliant,
            severity,
            issue,
            recommendation,
        }
    }

    /// Aggregate score: 100 minus 25 per critical, 15 per error, 5 per
    /// warning finding, floored at zero.
    pub fn score(&self, findings: &[ComplianceFinding]) -> u8 {
        let deductions: i32 = findings
            .iter()
            .filter_map(|f| f.severity)
            .map(|severity| match severity {
                Severity::Critical => 25,
                Severity::Error => 15,
                Severity::Warning => 5,
            })
            .sum();
        (100 - deductions).clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protection::ProtectionSizing;
    use pvsizing_core::equipment::{InverterSpec, PanelSpec};

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
            max_output_current: 43.0,
            output_voltage: 230.0,
        }
    }

    fn requirements() -> ProtectionRequirements {
        let panel = reference_panel();
        let cold = panel.at_temperature(-10.0);
        ProtectionSizing::new().requirements(&panel, &reference_inverter(), 7, &cold, Some(30.0))
    }

    fn fuse(rated_voltage: f64, rated_current: f64) -> CandidateDevice {
        CandidateDevice {
            role: DeviceRole::DcFuse,
            manufacturer: "TOMZN Electric".to_string(),
            model: "DC-PV".to_string(),
            rated_voltage: Some(rated_voltage),
            rated_current: Some(rated_current),
            continuous_operating_voltage: None,
            nominal_discharge_current_ka: None,
            protection_level_kv: None,
            differential_sensitivity_ma: None,
        }
    }

    #[test]
    fn test_compliant_fuse() {
        // 8.91 A minimum, 20 A panel cap: a 15 A fuse at 600 V passes.
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[fuse(600.0, 15.0)]);
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert!(finding.is_compliant, "issue: {:?}", finding.issue);
        assert_eq!(finding.severity, None);
        assert_eq!(finding.issue, None);
        assert_eq!(finding.recommendation, None);
    }

    #[test]
    fn test_undersized_breaker_cites_both_values() {
        let breaker = CandidateDevice {
            role: DeviceRole::AcCircuitBreaker,
            manufacturer: "TOMZN Electric".to_string(),
            model: "TOM2A-125".to_string(),
            rated_voltage: Some(230.0),
            rated_current: Some(25.0),
            continuous_operating_voltage: None,
            nominal_discharge_current_ka: None,
            protection_level_kv: None,
            differential_sensitivity_ma: Some(30.0),
        };
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[breaker]);
        let finding = &findings[0];
        assert!(!finding.is_compliant);
        let issue = finding.issue.as_deref().expect("issue text");
        assert!(
            issue.contains("25.00A") && issue.contains("43.00A"),
            "issue must cite both the rating and the requirement: {}",
            issue
        );
        assert_eq!(finding.severity, Some(Severity::Error));
        assert_eq!(
            finding.recommendation.as_deref(),
            Some("Replace with higher rated AC circuit breaker")
        );
    }

    #[test]
    fn test_fuse_at_exact_inclusive_bound_is_compliant() {
        // The fuse current rule is inclusive: a rating equal to
        // 1.1 × 1.25 × Isc passes.
        let minimum = requirements().dc_fuse.current.unwrap().value;
        let findings =
            ComplianceChecker::new().evaluate(&requirements(), &[fuse(600.0, minimum)]);
        assert!(
            findings[0].is_compliant,
            "inclusive boundary must round-trip: {:?}",
            findings[0].issue
        );
    }

    #[test]
    fn test_disconnect_at_exact_strict_bound_is_not_compliant() {
        let requirement = requirements();
        let bound = requirement.dc_disconnect.current.unwrap();
        let switch = CandidateDevice {
            role: DeviceRole::DcDisconnectSwitch,
            manufacturer: "TOMZN Electric".to_string(),
            model: "TOM7Z-125".to_string(),
            rated_voltage: Some(1000.0),
            rated_current: Some(bound.value),
            continuous_operating_voltage: None,
            nominal_discharge_current_ka: None,
            protection_level_kv: None,
            differential_sensitivity_ma: None,
        };
        let findings = ComplianceChecker::new().evaluate(&requirement, &[switch]);
        assert!(
            !findings[0].is_compliant,
            "a strict bound rejects a rating exactly at the bound"
        );
    }

    #[test]
    fn test_fuse_over_panel_cap_fails() {
        // 25 A exceeds the panel's 20 A max series fuse rating.
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[fuse(600.0, 25.0)]);
        let finding = &findings[0];
        assert!(!finding.is_compliant);
        assert!(finding
            .issue
            .as_deref()
            .unwrap()
            .contains("exceeds maximum allowed"));
    }

    #[test]
    fn test_undersized_voltage_is_critical() {
        // 400 V fuse against a 529 V string.
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[fuse(400.0, 15.0)]);
        assert_eq!(findings[0].severity, Some(Severity::Critical));
    }

    #[test]
    fn test_missing_arrester_data_is_a_warning_finding() {
        let arrester = CandidateDevice {
            role: DeviceRole::DcSurgeArrester,
            manufacturer: "TOMZN Electric".to_string(),
            model: "TZG40-PV".to_string(),
            rated_voltage: Some(700.0),
            rated_current: Some(9.0),
            continuous_operating_voltage: None,
            nominal_discharge_current_ka: None,
            protection_level_kv: None,
            differential_sensitivity_ma: None,
        };
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[arrester]);
        let finding = &findings[0];
        assert!(!finding.is_compliant);
        assert_eq!(finding.severity, Some(Severity::Warning));
        assert!(finding
            .issue
            .as_deref()
            .unwrap()
            .contains("discharge current is not specified"));
        assert_eq!(
            finding.recommendation.as_deref(),
            Some("Specify complete device information")
        );
    }

    #[test]
    fn test_compliant_arrester() {
        let arrester = CandidateDevice {
            role: DeviceRole::DcSurgeArrester,
            manufacturer: "TOMZN Electric".to_string(),
            model: "TZG40-PV".to_string(),
            rated_voltage: None,
            rated_current: Some(9.0),
            continuous_operating_voltage: Some(600.0),
            nominal_discharge_current_ka: Some(30.0),
            protection_level_kv: Some(2.5),
            differential_sensitivity_ma: None,
        };
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[arrester]);
        assert!(
            findings[0].is_compliant,
            "issue: {:?}",
            findings[0].issue
        );
    }

    #[test]
    fn test_roles_without_candidates_are_omitted() {
        let findings = ComplianceChecker::new().evaluate(&requirements(), &[fuse(600.0, 15.0)]);
        assert_eq!(
            findings.len(),
            1,
            "only supplied candidates appear in the findings"
        );
    }

    #[test]
    fn test_score_deductions() {
        let checker = ComplianceChecker::new();
        let findings = checker.evaluate(
            &requirements(),
            &[
                fuse(600.0, 15.0), // compliant
                fuse(400.0, 15.0), // critical (voltage)
                fuse(600.0, 2.0),  // error (current)
            ],
        );
        // 100 − 25 − 15 = 60
        assert_eq!(checker.score(&findings), 60);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let checker = ComplianceChecker::new();
        let bad: Vec<CandidateDevice> = (0..6).map(|_| fuse(1.0, 1.0)).collect();
        let findings = checker.evaluate(&requirements(), &bad);
        assert_eq!(checker.score(&findings), 0);
    }

    #[test]
    fn test_findings_are_a_stable_snapshot() {
        let checker = ComplianceChecker::new();
        let devices = [fuse(600.0, 15.0), fuse(400.0, 15.0)];
        let a = checker.evaluate(&requirements(), &devices);
        let b = checker.evaluate(&requirements(), &devices);
        assert_eq!(a, b, "identical inputs must give identical findings");
    }
}
