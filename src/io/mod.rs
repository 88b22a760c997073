//! Interchange between format readers/writers and the document model.
//!
//! Readers hand decoded records to the [`DocumentBuilder`] as
//! [`CadTemplate`]s together with the [`HeaderHandlesCollection`]; writers
//! receive [`ObjectRecord`]s from the [`DocumentWriter`].

pub mod builder;
pub mod header_handles;
pub mod reference_type;
pub mod templates;
pub mod writer;

pub use builder::{BuilderConfiguration, DocumentBuilder};
pub use header_handles::HeaderHandlesCollection;
pub use reference_type::ReferenceType;
pub use templates::{CadTemplate, LinkedRange, NamedReference, TemplateData};
pub use writer::{decompose, DocumentWriter, ObjectRecord, ObjectWorklist, RecordSink};
