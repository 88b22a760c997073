//! # acadlink
//!
//! The object-graph core of a CAD (DWG/DXF) interchange library.
//!
//! A format reader decodes records into [`CadTemplate`]s: objects whose
//! references to other objects are still raw handles or names. The
//! [`DocumentBuilder`] resolves every template exactly once, in any order,
//! and assembles a fully linked [`CadDocument`]. In the other direction the
//! [`DocumentWriter`] walks a document and decomposes each object into an
//! [`ObjectRecord`] of primitive fields and typed outgoing handles.
//!
//! ## Quick Start
//!
//! ```rust
//! use acadlink::io::{CadTemplate, DocumentBuilder, HeaderHandlesCollection, NamedReference};
//! use acadlink::{Handle, Layer, Line};
//!
//! let mut builder = DocumentBuilder::new(HeaderHandlesCollection::new());
//! builder.add_template(CadTemplate::new(Layer::new("Walls")).at(Handle::new(0x10)));
//!
//! let mut line = CadTemplate::new(Line::new()).at(Handle::new(0x20));
//! if let Some(data) = line.entity_data_mut() {
//!     data.layer = NamedReference::by_name("WALLS");
//! }
//! builder.add_template(line);
//!
//! let document = builder.build()?;
//! let line = document.try_lookup::<Line>(Handle::new(0x20)).unwrap();
//! assert_eq!(line.common.layer.handle(), Handle::new(0x10));
//! # Ok::<(), acadlink::CadError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`HandleRegistry`] - the handle → object arena of one document
//! - [`CadObject`] - closed set of object kinds; links are typed handles
//!   ([`ObjectRef`], [`OwnedRef`])
//! - [`Table`] / [`objects::Dictionary`] - named collections
//! - [`io::templates`] / [`io::builder`] - reading side
//! - [`io::writer`] - writing side
//!
//! Recoverable problems are reported as [`notification::Notification`]s;
//! only structural violations are errors.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod object;
pub mod objects;
pub mod registry;
pub mod tables;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use error::{CadError, Result};
pub use types::{Color, DocumentId, Handle, LineWeight, ObjectRef, OwnedRef, Vector3};

pub use object::{CadObject, LookupResult, ObjectCommon, ObjectKind};

pub use entities::{
    Arc, AttributeDefinition, AttributeEntity, Block, BlockEnd, Circle, Dimension, Entity,
    EntityCommon, Insert, Line, MText, Point, Polyline, Seqend, Text, Vertex,
};

pub use tables::{
    AppId, BlockRecord, DimStyle, Layer, LineType, Table, TableEntry, TableKind, TextStyle,
};

pub use document::CadDocument;
pub use registry::HandleRegistry;

pub use io::{CadTemplate, DocumentBuilder, DocumentWriter, ObjectRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cad_document_creation() {
        let doc = CadDocument::new();
        assert!(doc.get_entry::<Layer>("0").is_some());
        assert!(doc.model_space().is_some());
    }
}
