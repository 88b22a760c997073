//! Typed references between objects of one document.
//!
//! Objects never hold each other directly: every edge of the graph is a
//! handle tagged with the kind of object it points at. Two edge types exist:
//!
//! - [`ObjectRef`]: non-owning pointer (owner back-links, reactors, layer,
//!   linetype, text style, block references, ...). Removing the target nulls
//!   the reference.
//! - [`OwnedRef`]: exclusive ownership (extended dictionary, table and
//!   dictionary entries, block entities, vertices). Removing the owner
//!   removes the target as well.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::Handle;
use crate::object::CadObject;

macro_rules! typed_reference {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T = CadObject> {
            handle: Handle,
            _kind: PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            /// A reference that points nowhere
            pub const NULL: Self = Self {
                handle: Handle::NULL,
                _kind: PhantomData,
            };

            /// Wrap a handle
            pub const fn new(handle: Handle) -> Self {
                Self {
                    handle,
                    _kind: PhantomData,
                }
            }

            /// The referenced handle
            pub const fn handle(&self) -> Handle {
                self.handle
            }

            pub const fn is_null(&self) -> bool {
                self.handle.is_null()
            }

            /// Forget the target kind
            pub const fn erase(self) -> $name<CadObject> {
                $name::new(self.handle)
            }

            /// Apply a handle mapping; returns `false` when the reference
            /// became null.
            pub fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) -> bool {
                if self.handle.is_valid() {
                    self.handle = map(self.handle);
                }
                self.handle.is_valid()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.handle == other.handle
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> Hash for $name<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.handle.hash(state);
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::NULL
            }
        }

        impl<T> From<Handle> for $name<T> {
            fn from(handle: Handle) -> Self {
                Self::new(handle)
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.handle)
            }
        }
    };
}

typed_reference!(
    /// Non-owning reference to an object of kind `T`
    ObjectRef
);

typed_reference!(
    /// Exclusive ownership edge to an object of kind `T`
    OwnedRef
);

/// Remap every reference of a list, dropping the ones that became null
pub(crate) fn remap_all<R>(refs: &mut Vec<R>, mut remap: impl FnMut(&mut R) -> bool) {
    refs.retain_mut(|r| remap(r));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Layer;

    #[test]
    fn test_null_reference() {
        let r: ObjectRef<Layer> = ObjectRef::NULL;
        assert!(r.is_null());
        assert_eq!(r, ObjectRef::default());
    }

    #[test]
    fn test_remap_to_null() {
        let mut r: OwnedRef<Layer> = OwnedRef::new(Handle::new(7));
        assert!(!r.remap(&mut |_| Handle::NULL));
        assert!(r.is_null());
    }

    #[test]
    fn test_remap_skips_null() {
        let mut r: ObjectRef = ObjectRef::NULL;
        let mut calls = 0;
        r.remap(&mut |h| {
            calls += 1;
            h
        });
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_erase_keeps_handle() {
        let r: ObjectRef<Layer> = ObjectRef::new(Handle::new(0x20));
        assert_eq!(r.erase().handle(), Handle::new(0x20));
        assert_eq!(format!("{:?}", r), "ObjectRef(0x20)");
    }
}
