//! Passive effect registry
//!
//! Tracks which held items currently have their passive effect applied. The
//! registry is passed explicitly into every slot operation that can place or
//! drop an item, so effects are active exactly while the item sits in a slot.

use crate::item::Item;
use kitbag_core::ItemId;

/// Set of items whose passive effect is applied
#[derive(Debug, Default, Clone)]
pub struct PassiveEffectRegistry {
    /// Registered item ids in equip order
    active: Vec<ItemId>,
}

impl PassiveEffectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the item and apply its effect.
    ///
    /// Returns false without calling into the item when it has no passive
    /// capability or is already registered.
    pub fn equip(&mut self, item: &mut Item) -> bool {
        if !item.is_passive() || self.contains(item.id()) {
            return false;
        }
        self.active.push(item.id());
        item.apply_passive_effect();
        log::debug!("Equipped passive item '{}' ({})", item.name(), item.id());
        true
    }

    /// Remove the item's effect and unregister it.
    ///
    /// Returns false when the item was not registered.
    pub fn unequip(&mut self, item: &mut Item) -> bool {
        let Some(position) = self.active.iter().position(|id| *id == item.id()) else {
            return false;
        };
        item.remove_passive_effect();
        self.active.remove(position);
        log::debug!("Unequipped passive item '{}' ({})", item.name(), item.id());
        true
    }

    /// Check if an item is registered
    pub fn contains(&self, id: ItemId) -> bool {
        self.active.contains(&id)
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check if no item is registered
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Registered ids in equip order
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.active.iter().copied()
    }
}
