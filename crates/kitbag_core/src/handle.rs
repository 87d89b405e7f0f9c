//! Type-safe handles for externally owned resources
//!
//! The inventory never looks inside an icon or any other presentation asset.
//! It only stores and hands back a [`Handle`], and the host resolves it through
//! the [`HandleMap`] that issued it. Resources are registered once at startup
//! and live as long as the map, so handles never go stale.

use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Index of a `T` inside a [`HandleMap`]; `u32::MAX` is the null handle
#[repr(transparent)]
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Handle that resolves to nothing
    #[inline]
    pub const fn null() -> Self {
        Self::from_index(u32::MAX)
    }

    #[inline]
    const fn from_index(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }

    /// Position in the issuing map
    #[inline]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

// Written out by hand so `T` needs none of these traits itself
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = core::any::type_name::<T>();
        if self.is_null() {
            write!(f, "Handle<{}>(null)", name)
        } else {
            write!(f, "Handle<{}>({})", name, self.index)
        }
    }
}

/// Append-only table of resources addressed by [`Handle`]
pub struct HandleMap<T> {
    values: Vec<T>,
}

impl<T> HandleMap<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Store a value and return its handle.
    ///
    /// Returns the null handle once `u32::MAX` values are stored.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        match u32::try_from(self.values.len()) {
            Ok(index) if index != u32::MAX => {
                self.values.push(value);
                Handle::from_index(index)
            }
            _ => Handle::null(),
        }
    }

    /// Resolve a handle; null and foreign handles resolve to nothing
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.is_null() {
            return None;
        }
        self.values.get(handle.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandleMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleMap").field("len", &self.len()).finish()
    }
}
