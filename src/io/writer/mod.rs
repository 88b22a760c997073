//! Document writer: flattens a document into records.
//!
//! The writer walks the document from its roots (the tables in their
//! standard order, then the root dictionary) with a FIFO [`ObjectWorklist`].
//! Each object is decomposed into an [`ObjectRecord`] handed to a
//! [`RecordSink`]; the objects it owns are queued behind it. The document is
//! never mutated.

mod decompose;
mod record;

use std::collections::VecDeque;

use ahash::AHashSet;

pub use decompose::decompose;
pub use record::{FieldValue, HandleReference, ObjectRecord};

use crate::document::CadDocument;
use crate::error::Result;
use crate::notification::{NotificationCollection, NotificationHandler, NotificationType, Notifier};
use crate::tables::TableKind;
use crate::types::Handle;

/// FIFO queue of handles that accepts each handle once
#[derive(Debug, Clone, Default)]
pub struct ObjectWorklist {
    queue: VecDeque<Handle>,
    seen: AHashSet<Handle>,
}

impl ObjectWorklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a handle; returns `false` for null or already queued handles
    pub fn push(&mut self, handle: Handle) -> bool {
        if handle.is_null() || !self.seen.insert(handle) {
            return false;
        }
        self.queue.push_back(handle);
        true
    }

    pub fn pop(&mut self) -> Option<Handle> {
        self.queue.pop_front()
    }

    /// Whether the handle was ever queued
    pub fn was_queued(&self, handle: Handle) -> bool {
        self.seen.contains(&handle)
    }

    /// Handles waiting to be processed
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Destination of decomposed records
pub trait RecordSink {
    fn write_record(&mut self, record: ObjectRecord) -> Result<()>;
}

impl RecordSink for Vec<ObjectRecord> {
    fn write_record(&mut self, record: ObjectRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Writes every object of a document to a [`RecordSink`]
pub struct DocumentWriter<'a> {
    document: &'a CadDocument,
    notifier: Notifier,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(document: &'a CadDocument) -> Self {
        Self {
            document,
            notifier: Notifier::new(),
        }
    }

    pub fn set_notification_handler(&mut self, handler: NotificationHandler) {
        self.notifier.set_handler(handler);
    }

    pub fn notifications(&self) -> &NotificationCollection {
        self.notifier.notifications()
    }

    /// Write every object; returns the number of records written.
    ///
    /// Objects not reachable from the roots are reported and written after
    /// the reachable ones, in handle order.
    pub fn write<S: RecordSink>(&mut self, sink: &mut S) -> Result<usize> {
        let mut worklist = ObjectWorklist::new();
        let header = self.document.header();
        for kind in TableKind::ALL {
            if let Some(table) = header.table_control(kind) {
                worklist.push(table);
            }
        }
        if let Some(root) = self.document.root_dictionary_handle() {
            worklist.push(root);
        }

        let mut written = self.drain(&mut worklist, sink)?;
        tracing::debug!(written, "reachable objects written");

        let mut handles: Vec<Handle> = self.document.registry().handles().collect();
        handles.sort_unstable();
        for handle in handles {
            if worklist.was_queued(handle) {
                continue;
            }
            let name = self
                .document
                .get(handle)
                .map_or("OBJECT", |o| o.object_name());
            self.notifier.notify(
                NotificationType::Warning,
                format!("{} {} is not reachable from the document roots", name, handle),
                None,
            );
            worklist.push(handle);
            written += self.drain(&mut worklist, sink)?;
        }

        tracing::debug!(written, "document written");
        Ok(written)
    }

    fn drain<S: RecordSink>(
        &mut self,
        worklist: &mut ObjectWorklist,
        sink: &mut S,
    ) -> Result<usize> {
        let mut written = 0;
        while let Some(handle) = worklist.pop() {
            let Some(object) = self.document.get(handle) else {
                self.notifier.notify(
                    NotificationType::Warning,
                    format!("Object {} was not found", handle),
                    None,
                );
                continue;
            };

            let record = decompose(object)?;
            for owned in record.owned_handles() {
                worklist.push(owned);
            }
            sink.write_record(record)?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::error::CadError;
    use crate::objects::UnknownObject;

    #[test]
    fn test_worklist_accepts_each_handle_once() {
        let mut worklist = ObjectWorklist::new();
        assert!(worklist.push(Handle::new(3)));
        assert!(!worklist.push(Handle::new(3)));
        assert!(!worklist.push(Handle::NULL));
        assert!(worklist.push(Handle::new(1)));

        assert_eq!(worklist.pop(), Some(Handle::new(3)));
        assert_eq!(worklist.pop(), Some(Handle::new(1)));
        assert_eq!(worklist.pop(), None);
        assert!(!worklist.push(Handle::new(3)));
    }

    #[test]
    fn test_write_new_document() {
        let mut document = CadDocument::new();
        document.add_entity(Line::new()).unwrap();

        let mut records: Vec<ObjectRecord> = Vec::new();
        let mut writer = DocumentWriter::new(&document);
        let written = writer.write(&mut records).unwrap();

        assert_eq!(written, document.registry().len());
        assert!(writer.notifications().is_empty());
        assert_eq!(records[0].type_name, "TABLE");
        assert_eq!(records[0].field(2).and_then(FieldValue::as_str), Some("LTYPE"));

        let mut seen = AHashSet::new();
        assert!(records.iter().all(|r| seen.insert(r.handle)));
    }

    #[test]
    fn test_unreachable_object_is_reported_and_written() {
        let mut document = CadDocument::new();
        let stray = document.registry_mut().insert(Line::new()).unwrap();

        let mut records: Vec<ObjectRecord> = Vec::new();
        let mut writer = DocumentWriter::new(&document);
        writer.write(&mut records).unwrap();

        assert_eq!(records.last().map(|r| r.handle), Some(stray));
        assert_eq!(writer.notifications().of_type(NotificationType::Warning).len(), 1);
    }

    #[test]
    fn test_unknown_object_is_fatal() {
        let mut document = CadDocument::new();
        let root = document.root_dictionary_handle().unwrap();
        document
            .add_dictionary_entry(root, "PROXY", UnknownObject::new("ACAD_PROXY_OBJECT"))
            .unwrap();

        let mut records: Vec<ObjectRecord> = Vec::new();
        let err = DocumentWriter::new(&document).write(&mut records).unwrap_err();
        assert!(matches!(err, CadError::UnsupportedKind(_)));
    }
}
