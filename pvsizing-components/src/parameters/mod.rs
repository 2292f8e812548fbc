//! Component parameters
//!
//! Parameter structures for the sizing components. Defaults match the
//! UTE C15-712-1 worksheet factors used by the original design documents.

mod array;
mod cable;
mod protection;

pub use array::ArraySizingParameters;
pub use cable::CableParameters;
pub use protection::ProtectionParameters;
