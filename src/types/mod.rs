//! Core value types shared by the object model
//!
//! Handles, typed references between objects and the small value types
//! (colors, line weights, points) carried by entities and table entries.

pub mod color;
pub mod handle;
pub mod line_weight;
pub mod reference;
pub mod vector;

pub use color::Color;
pub use handle::{DocumentId, Handle};
pub use line_weight::LineWeight;
pub use reference::{ObjectRef, OwnedRef};
pub use vector::Vector3;
