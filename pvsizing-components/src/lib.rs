//! Sizing components for PV installation design studies
//!
//! This crate provides the calculation stages behind an array sizing and
//! protection study, following the UTE C15-712-1 worksheets:
//!
//! - `array`: panels-in-series / strings-in-parallel bounds, power ratio and
//!   target-power configuration search
//! - `protection`: required ratings for the six protection-device roles
//! - `compliance`: evaluation of candidate devices against requirements
//! - `cable`: derated ampacities and voltage drops for DC/AC runs
//! - `study`: the end-to-end pipeline assembling a [`SizingResult`]
//!
//! # Parameters
//!
//! Each component has an associated parameters struct in the `parameters`
//! module with defaults matching the standard worksheet factors.
//!
//! The whole pipeline is a pure, synchronous transformation: identical
//! inputs always produce identical results, nothing is shared across
//! invocations, and concurrent calls need no coordination.

pub mod array;
pub mod cable;
pub mod compliance;
pub mod parameters;
pub mod protection;
pub mod study;

pub use study::{compute_sizing, SizingResult, SizingStudy, StudyInputs};
