//! Array string sizing
//!
//! Computes how many panels may be wired in series and how many strings in
//! parallel for a given panel/inverter pairing, from the temperature-adjusted
//! panel values and the inverter's electrical limits:
//!
//! - series max: worst-case cold Voc must never exceed the inverter's
//!   maximum DC input voltage
//! - series optimal: cold Vmp stays inside the MPPT window's upper edge
//! - series min: hot Vmp stays above the MPPT window's lower edge
//! - parallel max: worst-case hot Isc must never exceed the per-MPPT
//!   short-circuit rating
//! - parallel optimal: hot Imp fits the per-MPPT usable input current
//!
//! Every *max* bound rounds down and every *min* bound rounds up. The
//! direction is correctness-critical: exceeding a maximum is a safety
//! violation, and undershooting a minimum starves the MPPT tracker.

use crate::parameters::ArraySizingParameters;
use log::debug;
use pvsizing_core::equipment::{InverterSpec, PanelSpec, SiteThermalBounds};
use pvsizing_core::temperature::OperatingPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Panels-in-series bounds for one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesBounds {
    /// Hard maximum from the inverter's DC input voltage limit.
    pub max: u32,
    /// Largest count keeping cold Vmp inside the MPPT window.
    pub optimal: u32,
    /// Smallest count keeping hot Vmp above the MPPT window.
    pub min: u32,
}

/// Strings-in-parallel bounds for one MPPT input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelBounds {
    /// Hard maximum from the per-MPPT short-circuit current rating.
    pub max: u32,
    /// Largest count whose hot Imp fits the usable input current.
    pub optimal: u32,
}

/// A valid-but-suspect engineering outcome, carried in the result.
///
/// Warnings are data, never errors: they represent configurations the user
/// may knowingly accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompatibilityWarning {
    /// The series bounds contradict each other; the pairing is electrically
    /// incompatible.
    SeriesBoundsInconsistent { min: u32, optimal: u32, max: u32 },
    /// Even a single string exceeds the inverter's short-circuit rating.
    NoParallelCapacity {
        isc_at_max_temp: f64,
        max_short_circuit_current: f64,
    },
    /// Power ratio falls outside the acceptable band.
    PowerRatioOutOfBand { ratio: f64, min: f64, max: f64 },
    /// A temperature-adjusted voltage or current collapsed to zero or below;
    /// the coefficient/temperature combination is outside the linear model's
    /// validity.
    OperatingPointCollapsed { temperature_c: f64 },
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityWarning::SeriesBoundsInconsistent { min, optimal, max } => write!(
                f,
                "series bounds are inconsistent (min {}, optimal {}, max {}); \
                 the panel and inverter are electrically incompatible",
                min, optimal, max
            ),
            CompatibilityWarning::NoParallelCapacity {
                isc_at_max_temp,
                max_short_circuit_current,
            } => write!(
                f,
                "string short-circuit current at the hot extreme ({:.2}A) exceeds the \
                 inverter's per-MPPT short-circuit rating ({:.2}A)",
                isc_at_max_temp, max_short_circuit_current
            ),
            CompatibilityWarning::PowerRatioOutOfBand { ratio, min, max } => write!(
                f,
                "power ratio {:.3} is outside the acceptable band [{:.1}, {:.1}]",
                ratio, min, max
            ),
            CompatibilityWarning::OperatingPointCollapsed { temperature_c } => write!(
                f,
                "temperature-adjusted electrical values collapsed at {:.1} °C; \
                 check the panel's temperature coefficients",
                temperature_c
            ),
        }
    }
}

/// String-count bounds plus the pairing verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySizing {
    pub series: SeriesBounds,
    pub parallel: ParallelBounds,
    /// Array DC power at the optimal layout divided by the inverter's
    /// nominal AC power.
    pub power_ratio: f64,
    /// Array DC rated power at the optimal layout (W).
    pub array_power_w: f64,
    /// True when no warning was raised.
    pub compatible: bool,
    pub warnings: Vec<CompatibilityWarning>,
}

/// A concrete layout chosen for a target power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayConfiguration {
    pub panels_per_string: u32,
    pub strings: u32,
    pub total_panels: u32,
    /// Array DC rated power (W).
    pub array_power_w: f64,
    pub power_ratio: f64,
    /// Hot-extreme string Vmp × panels per string (V).
    pub min_string_voltage: f64,
    /// Cold-extreme string Voc × panels per string (V).
    pub max_string_voltage: f64,
    /// Hot-extreme Isc × strings (A).
    pub max_array_current: f64,
}

/// String sizing component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringSizing {
    parameters: ArraySizingParameters,
}

impl StringSizing {
    pub fn new() -> Self {
        Self::from_parameters(ArraySizingParameters::default())
    }

    pub fn from_parameters(parameters: ArraySizingParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &ArraySizingParameters {
        &self.parameters
    }

    /// Series bounds from the cold and hot operating points.
    ///
    /// - `Nsmax = floor(maxDcVoltage / Voc(Tmin))`
    /// - `Nsoptimal = floor(mpptMax / Vmp(Tmin))`
    /// - `Nsmin = ceil(mpptMin / Vmp(Tmax))`
    pub fn series_bounds(
        &self,
        inverter: &InverterSpec,
        cold: &OperatingPoint,
        hot: &OperatingPoint,
    ) -> SeriesBounds {
        SeriesBounds {
            max: (inverter.max_dc_voltage / cold.voc).floor() as u32,
            optimal: (inverter.mppt_voltage_range_max / cold.vmp).floor() as u32,
            min: (inverter.mppt_voltage_range_min / hot.vmp).ceil() as u32,
        }
    }

    /// Parallel bounds from the hot operating point.
    ///
    /// - `Npmax = floor(maxShortCircuitCurrent / Isc(Tmax))`
    /// - `Npoptimal = floor(maxInputCurrentPerMppt / Imp(Tmax))`
    pub fn parallel_bounds(&self, inverter: &InverterSpec, hot: &OperatingPoint) -> ParallelBounds {
        ParallelBounds {
            max: (inverter.max_short_circuit_current / hot.isc).floor() as u32,
            optimal: (inverter.max_input_current_per_mppt / hot.imp).floor() as u32,
        }
    }

    /// Power ratio for a concrete layout.
    pub fn power_ratio(
        &self,
        panel: &PanelSpec,
        inverter: &InverterSpec,
        panels_per_string: u32,
        strings: u32,
    ) -> f64 {
        let array_power = panel.max_power_w * f64::from(panels_per_string) * f64::from(strings);
        array_power / inverter.nominal_output_power
    }

    /// Full sizing pass: bounds, power ratio at the optimal layout, and the
    /// compatibility verdict.
    ///
    /// Contradictory bounds are surfaced as warnings with the computed
    /// counts left intact, never clamped into a plausible-looking range.
    pub fn size(
        &self,
        panel: &PanelSpec,
        inverter: &InverterSpec,
        thermal: &SiteThermalBounds,
    ) -> ArraySizing {
        let cold = panel.at_temperature(thermal.min_design_temp);
        let hot = panel.at_temperature(thermal.max_design_temp);

        let mut warnings = Vec::new();

        // The linear coefficient model can push a value through zero for
        // extreme coefficient/temperature combinations; the division-based
        // bounds are meaningless past that point.
        for point in [&cold, &hot] {
            if point.voc <= 0.0 || point.vmp <= 0.0 || point.isc <= 0.0 || point.imp <= 0.0 {
                warnings.push(CompatibilityWarning::OperatingPointCollapsed {
                    temperature_c: point.temperature_c,
                });
            }
        }
        if !warnings.is_empty() {
            return ArraySizing {
                series: SeriesBounds {
                    max: 0,
                    optimal: 0,
                    min: 0,
                },
                parallel: ParallelBounds { max: 0, optimal: 0 },
                power_ratio: 0.0,
                array_power_w: 0.0,
                compatible: false,
                warnings,
            };
        }

        let series = self.series_bounds(inverter, &cold, &hot);
        let parallel = self.parallel_bounds(inverter, &hot);

        if !(series.min <= series.optimal && series.optimal <= series.max) {
            warnings.push(CompatibilityWarning::SeriesBoundsInconsistent {
                min: series.min,
                optimal: series.optimal,
                max: series.max,
            });
        }
        if parallel.max < 1 {
            warnings.push(CompatibilityWarning::NoParallelCapacity {
                isc_at_max_temp: hot.isc,
                max_short_circuit_current: inverter.max_short_circuit_current,
            });
        }

        let array_power_w =
            panel.max_power_w * f64::from(series.optimal) * f64::from(parallel.optimal);
        let power_ratio = array_power_w / inverter.nominal_output_power;
        if !self.parameters.ratio_in_band(power_ratio) {
            warnings.push(CompatibilityWarning::PowerRatioOutOfBand {
                ratio: power_ratio,
                min: self.parameters.power_ratio_min,
                max: self.parameters.power_ratio_max,
            });
        }

        debug!(
            "sized {} / {}: series {}..{} (optimal {}), parallel max {} (optimal {}), ratio {:.3}",
            panel.model,
            inverter.model,
            series.min,
            series.max,
            series.optimal,
            parallel.max,
            parallel.optimal,
            power_ratio
        );

        ArraySizing {
            series,
            parallel,
            power_ratio,
            array_power_w,
            compatible: warnings.is_empty(),
            warnings,
        }
    }

    /// Pick a concrete layout for a target DC power.
    ///
    /// Scans every admissible `series × strings` combination, keeps those
    /// whose power ratio sits inside the band and whose total power meets
    /// the target, and prefers the ratio closest to the preferred value.
    /// Returns `None` when no feasible layout exists.
    pub fn select_configuration(
        &self,
        panel: &PanelSpec,
        inverter: &InverterSpec,
        thermal: &SiteThermalBounds,
        target_power_w: f64,
    ) -> Option<ArrayConfiguration> {
        let sizing = self.size(panel, inverter, thermal);
        let cold = panel.at_temperature(thermal.min_design_temp);
        let hot = panel.at_temperature(thermal.max_design_temp);

        let target_panels = (target_power_w / panel.max_power_w).ceil() as u32;

        let mut best: Option<(f64, ArrayConfiguration)> = None;
        for panels_per_string in sizing.series.min.max(1)..=sizing.series.max {
            for strings in 1..=sizing.parallel.max {
                let total_panels = panels_per_string * strings;
                let ratio = self.power_ratio(panel, inverter, panels_per_string, strings);
                if !self.parameters.ratio_in_band(ratio) || total_panels < target_panels {
                    continue;
                }

                let distance = (ratio - self.parameters.power_ratio_preferred).abs();
                let closer = match &best {
                    Some((best_distance, _)) => distance < *best_distance,
                    None => true,
                };
                if closer {
                    best = Some((
                        distance,
                        ArrayConfiguration {
                            panels_per_string,
                            strings,
                            total_panels,
                            array_power_w: panel.max_power_w * f64::from(total_panels),
                            power_ratio: ratio,
                            min_string_voltage: hot.vmp * f64::from(panels_per_string),
                            max_string_voltage: cold.voc * f64::from(panels_per_string),
                            max_array_current: hot.isc * f64::from(strings),
                        },
                    ));
                }
            }
        }

        best.map(|(_, configuration)| configuration)
    }
}

impl Default for StringSizing {
    fn default() -> Self {
        Self::new()
    }
}
