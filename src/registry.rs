//! Handle registry: the object arena of one document.
//!
//! Every object of a document lives here, keyed by its handle. The registry
//! owns handle assignment (a monotonically growing seed), rejects objects that
//! belong to another document, and implements the two whole-graph operations
//! that touch handles:
//!
//! - cascading removal: an object is removed together with everything it
//!   exclusively owns, and every remaining reference to a removed handle is
//!   nulled;
//! - renumbering ([`HandleRegistry::restore_handles`]): handles are
//!   reassigned sequentially, keeping their relative order.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::entities::{Block, BlockEnd};
use crate::error::{CadError, Result};
use crate::object::{CadObject, LookupResult, ObjectKind};
use crate::tables::BlockRecord;
use crate::types::{DocumentId, Handle, ObjectRef, OwnedRef};

/// Handle → object map of one document
#[derive(Debug)]
pub struct HandleRegistry {
    document: DocumentId,
    objects: IndexMap<Handle, CadObject, ahash::RandomState>,
    /// Next handle to assign; greater than every handle in use, saturating
    /// at the last handle
    seed: u64,
}

/// A clone is a registry of a new document: every cloned object is stamped
/// with the new identity
impl Clone for HandleRegistry {
    fn clone(&self) -> Self {
        let document = DocumentId::next();
        let mut objects = self.objects.clone();
        for object in objects.values_mut() {
            object.common_mut().document = Some(document);
        }
        HandleRegistry {
            document,
            objects,
            seed: self.seed,
        }
    }
}

impl HandleRegistry {
    /// Create an empty registry for a new document
    pub fn new() -> Self {
        Self::with_document(DocumentId::next())
    }

    pub(crate) fn with_document(document: DocumentId) -> Self {
        HandleRegistry {
            document,
            objects: IndexMap::default(),
            seed: 1,
        }
    }

    /// Identity of the document owning this registry
    pub fn document_id(&self) -> DocumentId {
        self.document
    }

    /// Next handle that will be assigned
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Move the seed forward; a value below the current seed is ignored
    pub fn advance_seed(&mut self, seed: u64) {
        if seed > self.seed {
            self.seed = seed;
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Look up a handle; handle 0 is the document itself
    pub fn lookup(&self, handle: Handle) -> Option<LookupResult<'_>> {
        if handle.is_null() {
            return Some(LookupResult::Document);
        }
        self.objects.get(&handle).map(LookupResult::Object)
    }

    pub fn get(&self, handle: Handle) -> Option<&CadObject> {
        self.objects.get(&handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut CadObject> {
        self.objects.get_mut(&handle)
    }

    /// Typed lookup; `None` when the handle is absent or of another kind
    pub fn try_lookup<T: ObjectKind>(&self, handle: Handle) -> Option<&T> {
        self.objects.get(&handle).and_then(T::cast)
    }

    pub fn try_lookup_mut<T: ObjectKind>(&mut self, handle: Handle) -> Option<&mut T> {
        self.objects.get_mut(&handle).and_then(T::cast_mut)
    }

    /// Typed lookup that reports why it failed
    pub fn expect_kind<T: ObjectKind>(&self, handle: Handle) -> Result<&T> {
        let object = self
            .objects
            .get(&handle)
            .ok_or(CadError::ObjectNotFound(handle))?;
        T::cast(object).ok_or(CadError::TypeMismatch {
            handle,
            expected: T::OBJECT_NAME,
            found: object.object_name(),
        })
    }

    /// Iterate over all objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CadObject> {
        self.objects.values()
    }

    /// Handles of all objects in insertion order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.objects.keys().copied()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CadObject> {
        self.objects.values_mut()
    }

    /// Insert an object and return its handle.
    ///
    /// A null or already taken handle is replaced by the seed. Inserting a
    /// block record whose BLOCK/ENDBLK markers are unset creates them.
    pub fn insert(&mut self, object: impl Into<CadObject>) -> Result<Handle> {
        let mut object = object.into();
        if let Some(owner) = object.common().document() {
            if owner != self.document {
                return Err(CadError::ForeignObject {
                    handle: object.handle(),
                    owner,
                });
            }
        }

        let handle = self.assign_handle(object.handle())?;
        {
            let common = object.common_mut();
            common.handle = handle;
            common.document = Some(self.document);
        }

        let is_block_record = matches!(object, CadObject::BlockRecord(_));
        self.objects.insert(handle, object);

        if is_block_record {
            self.insert_block_markers(handle)?;
        }
        Ok(handle)
    }

    fn assign_handle(&mut self, requested: Handle) -> Result<Handle> {
        if requested.is_valid() && !self.objects.contains_key(&requested) {
            if requested.value() >= self.seed {
                self.seed = requested.value().saturating_add(1);
            }
            return Ok(requested);
        }

        // The seed stops at the last handle; once that is used the space is
        // exhausted
        let handle = Handle::new(self.seed);
        if self.objects.contains_key(&handle) {
            return Err(CadError::HandleLimitExceeded {
                seed: self.seed,
                limit: u64::MAX,
            });
        }
        self.seed = self.seed.saturating_add(1);
        Ok(handle)
    }

    /// Whether the last handle is in use, leaving no handle to assign
    pub fn is_exhausted(&self) -> bool {
        self.objects.contains_key(&Handle::new(u64::MAX))
    }

    fn insert_block_markers(&mut self, record: Handle) -> Result<()> {
        let (name, base_point, needs_block, needs_end) =
            match self.try_lookup::<BlockRecord>(record) {
                Some(r) => (
                    r.name.clone(),
                    r.base_point,
                    r.block.is_null(),
                    r.block_end.is_null(),
                ),
                None => return Ok(()),
            };

        if needs_block {
            let mut block = Block::new(name, base_point);
            block.object.owner = ObjectRef::new(record);
            let handle = self.insert(block)?;
            if let Some(r) = self.try_lookup_mut::<BlockRecord>(record) {
                r.block = OwnedRef::new(handle);
            }
        }
        if needs_end {
            let mut block_end = BlockEnd::new();
            block_end.object.owner = ObjectRef::new(record);
            let handle = self.insert(block_end)?;
            if let Some(r) = self.try_lookup_mut::<BlockRecord>(record) {
                r.block_end = OwnedRef::new(handle);
            }
        }
        Ok(())
    }

    /// Remove an object, everything it owns, and every reference to them.
    ///
    /// Returns `None` when the handle is not registered.
    pub fn remove(&mut self, handle: Handle) -> Option<CadObject> {
        self.detach(handle).map(|(object, _)| object)
    }

    /// Cascading removal; also returns the set of removed handles.
    pub(crate) fn detach(&mut self, handle: Handle) -> Option<(CadObject, AHashSet<Handle>)> {
        if handle.is_null() || !self.objects.contains_key(&handle) {
            return None;
        }

        let mut removed = AHashSet::new();
        let mut pending = VecDeque::from([handle]);
        while let Some(current) = pending.pop_front() {
            if !removed.insert(current) {
                continue;
            }
            if let Some(object) = self.objects.get(&current) {
                pending.extend(object.owned_handles());
            }
        }
        removed.retain(|h| self.objects.contains_key(h));

        let mut root = self.objects.shift_remove(&handle)?;
        self.objects.retain(|h, _| !removed.contains(h));

        let mut null_removed = |h: Handle| if removed.contains(&h) { Handle::NULL } else { h };
        for object in self.objects.values_mut() {
            object.remap_references(&mut null_removed);
        }

        let common = root.common_mut();
        common.handle = Handle::NULL;
        common.document = None;

        tracing::debug!(%handle, cascaded = removed.len() - 1, "object removed");
        Some((root, removed))
    }

    /// Renumber every object sequentially from `max(seed, 1)`.
    ///
    /// Relative handle order is preserved, every reference is rewritten and
    /// references to unregistered handles become null. Returns the old → new
    /// mapping.
    pub fn restore_handles(&mut self, seed: u64) -> Result<AHashMap<Handle, Handle>> {
        let start = seed.max(1);
        let mut entries: Vec<(Handle, CadObject)> =
            std::mem::take(&mut self.objects).into_iter().collect();
        entries.sort_by_key(|(handle, _)| *handle);

        let Some(end) = start.checked_add(entries.len() as u64) else {
            self.objects = entries.into_iter().collect();
            return Err(CadError::HandleLimitExceeded {
                seed: start,
                limit: u64::MAX,
            });
        };

        let mut mapping = AHashMap::with_capacity(entries.len());
        for (next, (old, _)) in (start..end).zip(entries.iter()) {
            mapping.insert(*old, Handle::new(next));
        }

        let mut renumber = |h: Handle| mapping.get(&h).copied().unwrap_or(Handle::NULL);
        let mut objects = IndexMap::with_capacity_and_hasher(entries.len(), Default::default());
        for (old, mut object) in entries {
            let new = renumber(old);
            object.common_mut().handle = new;
            object.remap_references(&mut renumber);
            objects.insert(new, object);
        }

        self.objects = objects;
        self.seed = end;
        tracing::debug!(start, seed = self.seed, "handles restored");
        Ok(mapping)
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
