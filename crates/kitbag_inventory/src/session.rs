//! Inventory sessions
//!
//! A session owns one inventory together with the registry its slots report
//! to. [`SharedSession`] puts a session behind a mutex so hosts with several
//! callers (network handlers, scripting) run one mutation at a time; slot and
//! registry changes for an operation happen under the same lock.

use crate::inventory::{Inventory, InventoryError, SlotRef};
use crate::item::{Item, ItemType};
use crate::layout::InventoryLayout;
use crate::registry::PassiveEffectRegistry;
use crate::slot::{ClickOutcome, Removal, TransferOutcome};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// An inventory and its passive effect registry
#[derive(Debug, Default)]
pub struct InventorySession {
    pub inventory: Inventory,
    pub registry: PassiveEffectRegistry,
}

impl InventorySession {
    /// Create a session with an empty inventory
    pub fn new(layout: &InventoryLayout) -> Self {
        Self {
            inventory: Inventory::new(layout),
            registry: PassiveEffectRegistry::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) -> Result<SlotRef, Item> {
        self.inventory.add_item(item, &mut self.registry)
    }

    pub fn remove_item(&mut self, name: &str, item_type: ItemType) -> bool {
        self.inventory.remove_item(name, item_type, &mut self.registry)
    }

    pub fn use_hotkey(&mut self, index: usize) -> Result<ClickOutcome, InventoryError> {
        self.inventory.use_hotkey(index, &mut self.registry)
    }

    pub fn left_click(&mut self, slot: SlotRef) -> Result<ClickOutcome, InventoryError> {
        self.inventory.left_click(slot, &mut self.registry)
    }

    pub fn right_click(&mut self, slot: SlotRef) -> Result<Removal, InventoryError> {
        self.inventory.right_click(slot, &mut self.registry)
    }

    pub fn discard(&mut self, slot: SlotRef) -> Result<Option<Item>, InventoryError> {
        self.inventory.discard(slot, &mut self.registry)
    }

    pub fn transfer(&mut self, from: SlotRef, to: SlotRef) -> Result<TransferOutcome, InventoryError> {
        self.inventory.transfer(from, to, &mut self.registry)
    }

    pub fn tick(&mut self, dt: f32) {
        self.inventory.tick(dt);
    }
}

/// Thread-safe handle to a session
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<InventorySession>>,
}

impl SharedSession {
    /// Wrap a session
    pub fn new(session: InventorySession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut InventorySession) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Lock the session for several operations in a row
    pub fn lock(&self) -> MutexGuard<'_, InventorySession> {
        self.inner.lock()
    }
}
