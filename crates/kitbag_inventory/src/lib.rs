//! Kitbag Inventory - Slot Allocation and Stack Transfer
//!
//! This crate provides the inventory engine behind a grid inventory with
//! hotkeys and equipment slots.
//!
//! # Features
//!
//! - Items with active, passive, hybrid and equipment capabilities
//! - Slots holding one stack each, bounded by the item's max stack size
//! - Equipment slots restricted to equipment items of one body region
//! - Hotkey slots bound to number keys
//! - Priority-ordered placement and removal across slot groups
//! - Whole and partial stack transfer between slots
//! - Passive effects applied exactly while an item is held
//!
//! # Example
//!
//! ```ignore
//! use kitbag_inventory::prelude::*;
//!
//! let ids = IdGenerator::new();
//! let mut session = InventorySession::new(&InventoryLayout::default());
//!
//! let potion = Item::new(ids.next(), "Potion", ItemKind::Active(ActiveProfile::consumable()))
//!     .with_max_stack(5);
//! let slot = session.add_item(potion).expect("room for a potion");
//! session.transfer(slot, SlotRef::hotkey(0))?;
//! session.use_hotkey(0)?;
//! ```

pub mod effect;
pub mod inventory;
pub mod item;
pub mod layout;
pub mod registry;
pub mod session;
pub mod slot;

pub mod prelude {
    pub use crate::effect::{EffectContext, EffectTimer, ItemEffect, NoEffect};
    pub use crate::inventory::{Inventory, InventoryError, SlotGroup, SlotRef};
    pub use crate::item::{
        ActiveProfile, EquipRegion, Icon, IconHandle, Item, ItemKind, ItemType, UseOutcome,
    };
    pub use crate::layout::{InventoryLayout, LayoutError};
    pub use crate::registry::PassiveEffectRegistry;
    pub use crate::session::{InventorySession, SharedSession};
    pub use crate::slot::{
        ClickOutcome, Placement, RejectReason, Rejected, Removal, Slot, SlotKind, SlotTooltip,
        TransferOutcome,
    };
    pub use kitbag_core::{IdGenerator, ItemId};
}

pub use prelude::*;
