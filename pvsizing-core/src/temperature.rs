//! Temperature adjustment of panel datasheet values
//!
//! Converts STC (25 °C) ratings to the values at the site design-temperature
//! extremes using the linear temperature-coefficient model from the UTE
//! C15-712-1 sizing worksheets:
//!
//! $$V(T) = V_{STC} \times (1 + \frac{\beta}{100}(T - 25))$$
//! $$I(T) = I_{STC} \times (1 + \frac{\alpha}{100}(T - 25))$$
//!
//! where $\beta$ is the Voc coefficient and $\alpha$ the Isc coefficient in
//! %/°C.
//!
//! # Known approximation
//!
//! Vmp is derated with the **Voc** coefficient, not the dedicated Pmax
//! coefficient the datasheet also provides. The UTE worksheets document the
//! formula this way and the downstream string bounds depend on it, so the
//! behaviour is preserved exactly; `PanelSpec::temp_coeff_pmax` is carried
//! but unused here.

use crate::equipment::PanelSpec;
use serde::{Deserialize, Serialize};

/// Standard Test Conditions cell temperature (°C).
pub const STC_TEMPERATURE_C: f64 = 25.0;

/// Panel electrical values adjusted to one cell temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Cell temperature the values are adjusted to (°C).
    pub temperature_c: f64,
    /// Open-circuit voltage at `temperature_c` (V).
    pub voc: f64,
    /// Maximum-power-point voltage at `temperature_c` (V).
    pub vmp: f64,
    /// Short-circuit current at `temperature_c` (A).
    pub isc: f64,
    /// Maximum-power-point current at `temperature_c` (A).
    pub imp: f64,
}

/// Multiplier applied to an STC rating at temperature `t`.
///
/// `coeff` is the datasheet coefficient in %/°C.
pub fn temperature_factor(coeff: f64, t: f64) -> f64 {
    1.0 + (coeff / 100.0) * (t - STC_TEMPERATURE_C)
}

impl PanelSpec {
    /// Adjust the four electrical ratings to cell temperature `t` (°C).
    ///
    /// Pure arithmetic over validated inputs; call
    /// [`PanelSpec::validate`](crate::equipment::PanelSpec::validate) first
    /// so NaN never reaches a formula.
    pub fn at_temperature(&self, t: f64) -> OperatingPoint {
        let voltage_factor = temperature_factor(self.temp_coeff_voc, t);
        let current_factor = temperature_factor(self.temp_coeff_isc, t);
        OperatingPoint {
            temperature_c: t,
            voc: self.open_circuit_voltage * voltage_factor,
            // Vmp uses the Voc coefficient, see the module docs.
            vmp: self.voltage_at_pmax * voltage_factor,
            isc: self.short_circuit_current * current_factor,
            imp: self.current_at_pmax * current_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_factor_is_unity_at_stc() {
        assert!(
            (temperature_factor(-0.25, STC_TEMPERATURE_C) - 1.0).abs() < 1e-12,
            "No adjustment at 25 °C"
        );
    }

    #[test]
    fn test_voc_at_minus_10() {
        // 69.5 × (1 + (−0.25/100) × (−35)) = 69.5 × 1.0875 = 75.58 V
        let point = reference_panel().at_temperature(-10.0);
        assert!(
            (point.voc - 75.58125).abs() < 1e-9,
            "Voc(−10 °C): expected 75.58125, got {:.5}",
            point.voc
        );
    }

    #[test]
    fn test_isc_at_85() {
        // 6.48 × (1 + (0.05/100) × 60) = 6.48 × 1.03 = 6.674 A
        let point = reference_panel().at_temperature(85.0);
        assert!(
            (point.isc - 6.6744).abs() < 1e-9,
            "Isc(85 °C): expected 6.6744, got {:.4}",
            point.isc
        );
    }

    #[test]
    fn test_cold_raises_open_circuit_voltage() {
        // With a negative Voc coefficient, cooling below STC must increase
        // Voc for any valid panel.
        let panel = reference_panel();
        let cold = panel.at_temperature(-10.0);
        assert!(
            cold.voc > panel.open_circuit_voltage,
            "Voc at −10 °C ({:.2}) should exceed Voc STC ({:.2})",
            cold.voc,
            panel.open_circuit_voltage
        );
        assert!(
            cold.vmp > panel.voltage_at_pmax,
            "Vmp follows the same coefficient, so it rises too"
        );
    }

    #[test]
    fn test_heat_raises_short_circuit_current() {
        let panel = reference_panel();
        let hot = panel.at_temperature(85.0);
        assert!(
            hot.isc > panel.short_circuit_current,
            "Isc at 85 °C ({:.3}) should exceed Isc STC ({:.3})",
            hot.isc,
            panel.short_circuit_current
        );
        assert!(hot.imp > panel.current_at_pmax);
    }

    #[test]
    fn test_vmp_uses_voc_coefficient() {
        // The documented approximation: Vmp scales by the Voc coefficient,
        // not temp_coeff_pmax.
        let mut panel = reference_panel();
        panel.temp_coeff_pmax = -5.0; // absurd value must have no effect
        let point = panel.at_temperature(85.0);
        let expected = panel.voltage_at_pmax * (1.0 + (-0.25 / 100.0) * 60.0);
        assert!(
            (point.vmp - expected).abs() < 1e-9,
            "Vmp(85 °C): expected {:.4} via the Voc coefficient, got {:.4}",
            expected,
            point.vmp
        );
    }

    #[test]
    fn test_adjustment_is_deterministic() {
        let panel = reference_panel();
        let a = panel.at_temperature(-10.0);
        let b = panel.at_temperature(-10.0);
        assert_eq!(a, b, "Identical inputs must give identical points");
    }
}
