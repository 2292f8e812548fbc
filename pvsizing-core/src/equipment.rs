//! Equipment datasheet records
//!
//! All records are immutable, request-scoped value objects: constructed from
//! caller-supplied data, validated, fed through the sizing calculations and
//! discarded. Nothing here is persisted or cached across requests.
//!
//! Each record carries a `validate` method that rejects non-finite or
//! non-positive values before any formula touches them; the formulas
//! themselves are pure arithmetic with no error branches.

use crate::errors::{DesignError, DesignResult};
use serde::{Deserialize, Serialize};
use std::fmt;

fn require_finite(field: &'static str, value: f64) -> DesignResult<()> {
    if !value.is_finite() {
        return Err(DesignError::NonFiniteValue { field });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> DesignResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(DesignError::NonPositiveValue { field, value });
    }
    Ok(())
}

/// PV module electrical datasheet parameters.
///
/// All electrical values are rated at STC (25 °C cell temperature); the
/// `temperature` module derives the values at the site design extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub manufacturer: String,
    pub model: String,

    /// Rated power at maximum power point (W).
    pub max_power_w: f64,

    /// Open-circuit voltage Voc at STC (V).
    pub open_circuit_voltage: f64,

    /// Short-circuit current Isc at STC (A).
    pub short_circuit_current: f64,

    /// Voltage at maximum power point Vmp at STC (V).
    pub voltage_at_pmax: f64,

    /// Current at maximum power point Imp at STC (A).
    pub current_at_pmax: f64,

    /// Temperature coefficient of Voc (%/°C, typically negative).
    pub temp_coeff_voc: f64,

    /// Temperature coefficient of Isc (%/°C, typically small and positive).
    pub temp_coeff_isc: f64,

    /// Temperature coefficient of Pmax (%/°C).
    ///
    /// Carried from the datasheet for completeness; the voltage derating
    /// formulas deliberately use `temp_coeff_voc` instead (see the
    /// `temperature` module).
    pub temp_coeff_pmax: f64,

    /// Maximum series fuse rating from the datasheet (A).
    /// Upper limit on any string fuse protecting this module.
    pub max_series_fuse_rating: f64,
}

impl PanelSpec {
    /// Check that every field the formulas depend on is usable.
    pub fn validate(&self) -> DesignResult<()> {
        require_positive("panel max_power_w", self.max_power_w)?;
        require_positive("panel open_circuit_voltage", self.open_circuit_voltage)?;
        require_positive("panel short_circuit_current", self.short_circuit_current)?;
        require_positive("panel voltage_at_pmax", self.voltage_at_pmax)?;
        require_positive("panel current_at_pmax", self.current_at_pmax)?;
        require_positive("panel max_series_fuse_rating", self.max_series_fuse_rating)?;
        require_finite("panel temp_coeff_voc", self.temp_coeff_voc)?;
        require_finite("panel temp_coeff_isc", self.temp_coeff_isc)?;
        require_finite("panel temp_coeff_pmax", self.temp_coeff_pmax)?;
        Ok(())
    }
}

/// Grid-tied inverter electrical datasheet parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSpec {
    pub manufacturer: String,
    pub model: String,

    /// Absolute maximum DC input voltage (V).
    pub max_dc_voltage: f64,

    /// Lower edge of the MPPT voltage window (V).
    pub mppt_voltage_range_min: f64,

    /// Upper edge of the MPPT voltage window (V).
    pub mppt_voltage_range_max: f64,

    /// Maximum usable input current per MPPT channel (A).
    pub max_input_current_per_mppt: f64,

    /// Maximum short-circuit current per MPPT channel (A).
    pub max_short_circuit_current: f64,

    /// Nominal AC output power (W).
    pub nominal_output_power: f64,

    /// Maximum AC output current (A).
    pub max_output_current: f64,

    /// Nominal AC output voltage (V).
    pub output_voltage: f64,
}

impl InverterSpec {
    /// Check that every field the formulas depend on is usable.
    pub fn validate(&self) -> DesignResult<()> {
        require_positive("inverter max_dc_voltage", self.max_dc_voltage)?;
        require_positive("inverter mppt_voltage_range_min", self.mppt_voltage_range_min)?;
        require_positive("inverter mppt_voltage_range_max", self.mppt_voltage_range_max)?;
        require_positive(
            "inverter max_input_current_per_mppt",
            self.max_input_current_per_mppt,
        )?;
        require_positive(
            "inverter max_short_circuit_current",
            self.max_short_circuit_current,
        )?;
        require_positive("inverter nominal_output_power", self.nominal_output_power)?;
        require_positive("inverter max_output_current", self.max_output_current)?;
        require_positive("inverter output_voltage", self.output_voltage)?;
        if self.mppt_voltage_range_min >= self.mppt_voltage_range_max {
            return Err(DesignError::InvertedRange {
                field: "inverter mppt_voltage_range",
                min: self.mppt_voltage_range_min,
                max: self.mppt_voltage_range_max,
            });
        }
        Ok(())
    }
}

/// Site design-temperature extremes (°C).
///
/// The defaults are the conventional worst-case cell temperatures used by
/// the UTE C15-712-1 sizing worksheets: −10 °C for the cold bound (highest
/// string voltage) and 85 °C for the hot bound (highest string current,
/// lowest MPPT voltage).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteThermalBounds {
    /// Minimum design cell temperature (°C).
    pub min_design_temp: f64,
    /// Maximum design cell temperature (°C).
    pub max_design_temp: f64,
}

impl Default for SiteThermalBounds {
    fn default() -> Self {
        Self {
            min_design_temp: -10.0,
            max_design_temp: 85.0,
        }
    }
}

impl SiteThermalBounds {
    pub fn validate(&self) -> DesignResult<()> {
        require_finite("min_design_temp", self.min_design_temp)?;
        require_finite("max_design_temp", self.max_design_temp)?;
        if self.min_design_temp >= self.max_design_temp {
            return Err(DesignError::InvertedRange {
                field: "site design temperature",
                min: self.min_design_temp,
                max: self.max_design_temp,
            });
        }
        Ok(())
    }
}

/// DC or AC side of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemSide {
    Dc,
    Ac,
}

impl fmt::Display for SystemSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemSide::Dc => write!(f, "DC"),
            SystemSide::Ac => write!(f, "AC"),
        }
    }
}

/// Protection-device role in the installation, one requirement per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    DcFuse,
    DcDisconnectSwitch,
    DcSurgeArrester,
    AcCircuitBreaker,
    AcSurgeArrester,
    AcDisconnectSwitch,
}

impl DeviceRole {
    pub fn side(&self) -> SystemSide {
        match self {
            DeviceRole::DcFuse | DeviceRole::DcDisconnectSwitch | DeviceRole::DcSurgeArrester => {
                SystemSide::Dc
            }
            DeviceRole::AcCircuitBreaker
            | DeviceRole::AcSurgeArrester
            | DeviceRole::AcDisconnectSwitch => SystemSide::Ac,
        }
    }

    /// Surge arresters are rated by continuous operating voltage and
    /// discharge current rather than plain rated voltage/current.
    pub fn is_surge_arrester(&self) -> bool {
        matches!(self, DeviceRole::DcSurgeArrester | DeviceRole::AcSurgeArrester)
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceRole::DcFuse => "DC fuse",
            DeviceRole::DcDisconnectSwitch => "DC disconnect switch",
            DeviceRole::DcSurgeArrester => "DC surge arrester",
            DeviceRole::AcCircuitBreaker => "AC circuit breaker",
            DeviceRole::AcSurgeArrester => "AC surge arrester",
            DeviceRole::AcDisconnectSwitch => "AC main disconnect switch",
        };
        write!(f, "{}", name)
    }
}

/// A concrete protection device proposed for one role.
///
/// Every rating is optional: device selection can happen over several
/// workflow stages, and a partially specified device is evaluated as
/// non-compliant with a "complete the datasheet" finding rather than
/// rejected as invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDevice {
    pub role: DeviceRole,
    pub manufacturer: String,
    pub model: String,

    /// Rated operating voltage (V).
    pub rated_voltage: Option<f64>,

    /// Rated current (A).
    pub rated_current: Option<f64>,

    /// Continuous operating voltage Ucov for surge arresters (V).
    /// Falls back to `rated_voltage` when absent.
    #[serde(default)]
    pub continuous_operating_voltage: Option<f64>,

    /// Nominal discharge current for surge arresters (kA).
    #[serde(default)]
    pub nominal_discharge_current_ka: Option<f64>,

    /// Voltage protection level Up for surge arresters (kV).
    #[serde(default)]
    pub protection_level_kv: Option<f64>,

    /// Differential sensitivity for residual-current breakers (mA).
    #[serde(default)]
    pub differential_sensitivity_ma: Option<f64>,
}

impl CandidateDevice {
    /// Ratings that are present must still be physically meaningful.
    pub fn validate(&self) -> DesignResult<()> {
        for (field, value) in [
            ("device rated_voltage", self.rated_voltage),
            ("device rated_current", self.rated_current),
            (
                "device continuous_operating_voltage",
                self.continuous_operating_voltage,
            ),
            (
                "device nominal_discharge_current_ka",
                self.nominal_discharge_current_ka,
            ),
            ("device protection_level_kv", self.protection_level_kv),
            (
                "device differential_sensitivity_ma",
                self.differential_sensitivity_ma,
            ),
        ] {
            if let Some(value) = value {
                require_positive(field, value)?;
            }
        }
        Ok(())
    }

    /// Voltage to compare against the role's voltage rule: surge arresters
    /// advertise Ucov, everything else a plain rated voltage.
    pub fn operating_voltage(&self) -> Option<f64> {
        self.continuous_operating_voltage.or(self.rated_voltage)
    }
}

/// A cable run on the DC or AC side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSpec {
    pub side: SystemSide,

    /// Conductor cross-section (mm²).
    pub section_mm2: f64,

    /// One-way run length (m).
    pub length_m: f64,

    /// Manufacturer base ampacity Iz before correction factors (A).
    pub ampacity: f64,

    /// Per-run voltage drop ceiling (%); the study default applies when
    /// absent.
    #[serde(default)]
    pub max_voltage_drop_percent: Option<f64>,
}

impl CableSpec {
    pub fn validate(&self) -> DesignResult<()> {
        require_positive("cable section_mm2", self.section_mm2)?;
        require_positive("cable length_m", self.length_m)?;
        require_positive("cable ampacity", self.ampacity)?;
        if let Some(limit) = self.max_voltage_drop_percent {
            require_positive("cable max_voltage_drop_percent", limit)?;
        }
        Ok(())
    }
}
