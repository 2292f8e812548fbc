//! TOML equipment catalogs
//!
//! A catalog is a flat TOML document holding the panels, inverters,
//! protection devices and cable runs a design study may draw from:
//!
//! ```toml
//! [[panels]]
//! manufacturer = "SunPower"
//! model = "SPR-MAX3-360"
//! max_power_w = 360.0
//! # ...
//!
//! [[inverters]]
//! manufacturer = "Growatt"
//! model = "MIN 5000TL-X"
//! # ...
//! ```
//!
//! Catalogs are read-only reference data; the study itself never mutates or
//! persists them.

use crate::equipment::{CableSpec, CandidateDevice, InverterSpec, PanelSpec};
use crate::errors::{DesignError, DesignResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Equipment records available to a design study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
    #[serde(default)]
    pub inverters: Vec<InverterSpec>,
    #[serde(default)]
    pub devices: Vec<CandidateDevice>,
    #[serde(default)]
    pub cables: Vec<CableSpec>,
}

impl EquipmentCatalog {
    /// Parse a catalog from a TOML document.
    pub fn from_toml_str(document: &str) -> DesignResult<Self> {
        let catalog: EquipmentCatalog = toml::from_str(document)?;
        debug!(
            "loaded equipment catalog: {} panels, {} inverters, {} devices, {} cables",
            catalog.panels.len(),
            catalog.inverters.len(),
            catalog.devices.len(),
            catalog.cables.len()
        );
        Ok(catalog)
    }

    /// Validate every record in the catalog up front, so lookups hand out
    /// specs that are already safe to compute with.
    pub fn validate(&self) -> DesignResult<()> {
        for panel in &self.panels {
            panel.validate()?;
        }
        for inverter in &self.inverters {
            inverter.validate()?;
        }
        for device in &self.devices {
            device.validate()?;
        }
        for cable in &self.cables {
            cable.validate()?;
        }
        Ok(())
    }

    /// Look up a panel by model name.
    pub fn panel(&self, model: &str) -> DesignResult<&PanelSpec> {
        self.panels
            .iter()
            .find(|p| p.model == model)
            .ok_or_else(|| DesignError::UnknownEquipment {
                kind: "panel",
                model: model.to_string(),
            })
    }

    /// Look up an inverter by model name.
    pub fn inverter(&self, model: &str) -> DesignResult<&InverterSpec> {
        self.inverters
            .iter()
            .find(|i| i.model == model)
            .ok_or_else(|| DesignError::UnknownEquipment {
                kind: "inverter",
                model: model.to_string(),
            })
    }
}
