//! # kitbag_core - Kitbag Core
//!
//! Zero-dependency primitives shared by the inventory engine and its hosts:
//! - **Ids**: unique item instance identifiers
//! - **Handles**: typed references to externally owned resources
//!   such as icons

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

pub mod handle;
pub mod id;

pub use handle::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::handle::{Handle, HandleMap};
    pub use crate::id::{IdGenerator, ItemId};
}
