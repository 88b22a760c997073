//! Non-graphical object templates

use indexmap::IndexMap;

use super::Referrer;
use crate::io::builder::DocumentBuilder;
use crate::notification::NotificationType;
use crate::object::CadObject;
use crate::objects::dictionary_entries_mut;
use crate::tables::BlockRecord;
use crate::types::{Handle, OwnedRef};

/// Dictionary entries keyed by their encoded name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryTemplateData {
    pub entries: IndexMap<String, Handle>,
    /// Default entry of an ACDBDICTIONARYWDFLT
    pub default_entry: Handle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTemplateData {
    pub entities: Vec<Handle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutTemplateData {
    pub block_record: Handle,
}

pub(super) fn resolve_dictionary(
    object: &mut CadObject,
    data: &DictionaryTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    if let CadObject::DictionaryWithDefault(dictionary) = object {
        dictionary.default_entry =
            builder.resolve_handle(data.default_entry, referrer, "default entry");
    }

    let Some(entries) = dictionary_entries_mut(object) else {
        return;
    };

    for (key, &handle) in &data.entries {
        let entry = builder.resolve_handle::<CadObject>(handle, referrer, "entry");
        if entry.is_null() {
            continue;
        }

        let name = match builder.entry_name(handle) {
            Some(name) if !name.is_empty() => name,
            Some(_) => {
                if let Some(child) = builder.template_object_mut(handle) {
                    child.set_entry_name(key);
                }
                key.clone()
            }
            None => key.clone(),
        };

        match entries.add(&name, OwnedRef::new(handle)) {
            Ok(()) => builder.enqueue(handle),
            Err(e) => builder.notify_with_cause(
                NotificationType::Warning,
                format!("Entry '{}' of {} ignored", key, referrer),
                &e,
            ),
        }
    }
}

pub(super) fn resolve_group(
    object: &mut CadObject,
    data: &GroupTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let CadObject::Group(group) = object else {
        return;
    };
    for &handle in &data.entities {
        let entity = builder.resolve_handle::<CadObject>(handle, referrer, "entity");
        if entity.is_null() {
            continue;
        }
        if builder.is_entity(handle) {
            group.add_entity(entity);
        } else {
            builder.notify(
                NotificationType::Warning,
                format!("{} in {} is not an entity", handle, referrer),
            );
        }
    }
}

pub(super) fn resolve_layout(
    object: &mut CadObject,
    data: &LayoutTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let record = builder.resolve_handle::<BlockRecord>(data.block_record, referrer, "block record");
    if let CadObject::Layout(layout) = object {
        layout.block_record = record;
    }
}
