//! Matforge core model builder and text exporters.

pub mod model;
pub mod types;

pub use model::{FormatError, Model, ModelError, NAME_WIDTH};
pub use types::{Bounds, Sense, Variable};
