//! Inventory: slot groups and the allocator that places items into them

use crate::item::{EquipRegion, Item, ItemType};
use crate::layout::InventoryLayout;
use crate::registry::PassiveEffectRegistry;
use crate::slot::{ClickOutcome, RejectReason, Removal, Slot, SlotKind, SlotTooltip, TransferOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Slot group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotGroup {
    Equipment,
    Hotkeys,
    Items,
}

impl fmt::Display for SlotGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equipment => write!(f, "equip"),
            Self::Hotkeys => write!(f, "hotkey"),
            Self::Items => write!(f, "item"),
        }
    }
}

/// Address of a slot: group plus index within the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub group: SlotGroup,
    pub index: usize,
}

impl SlotRef {
    pub const fn equipment(index: usize) -> Self {
        Self {
            group: SlotGroup::Equipment,
            index,
        }
    }

    pub const fn hotkey(index: usize) -> Self {
        Self {
            group: SlotGroup::Hotkeys,
            index,
        }
    }

    pub const fn item(index: usize) -> Self {
        Self {
            group: SlotGroup::Items,
            index,
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.index)
    }
}

/// Inventory errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Hotkey index past the last hotkey slot
    #[error("hotkey index {index} out of range (inventory has {len} hotkeys)")]
    HotkeyOutOfRange { index: usize, len: usize },
    /// No slot at that address
    #[error("no slot at {0}")]
    SlotNotFound(SlotRef),
    /// A slot refused the transfer
    #[error("transfer rejected: {0}")]
    Transfer(#[from] RejectReason),
}

/// Inventory with equipment, hotkey and general item slots.
///
/// All slots live in one vector; each group is a contiguous range of it.
#[derive(Debug)]
pub struct Inventory {
    slots: Vec<Slot>,
    equipment: Range<usize>,
    hotkeys: Range<usize>,
    items: Range<usize>,
}

impl Inventory {
    /// Create an empty inventory with the given layout.
    ///
    /// The layout is expected to have passed [`InventoryLayout::validate`].
    /// An unvalidated one is clamped rather than rejected: at most 255
    /// hotkeys and [`InventoryLayout::MAX_ITEM_SLOTS`] general slots are
    /// created, and empty groups stay empty.
    pub fn new(layout: &InventoryLayout) -> Self {
        let hotkey_count = layout.hotkeys.min(usize::from(u8::MAX));
        let item_count = layout.item_slot_count().min(InventoryLayout::MAX_ITEM_SLOTS);
        if hotkey_count != layout.hotkeys || item_count != layout.item_slot_count() {
            log::warn!(
                "Layout clamped to {} hotkeys and {} item slots",
                hotkey_count,
                item_count
            );
        }
        let mut slots = Vec::with_capacity(layout.equipment.len() + hotkey_count + item_count);

        slots.extend(layout.equipment.iter().map(|region| Slot::equipment(*region)));
        let equipment = 0..slots.len();

        let start = slots.len();
        slots.extend((1..=u8::MAX).take(hotkey_count).map(Slot::hotkey));
        let hotkeys = start..slots.len();

        let start = slots.len();
        slots.extend((0..item_count).map(|_| Slot::item_slot()));
        let items = start..slots.len();

        log::debug!(
            "Inventory created: {} equipment, {} hotkeys, {} item slots",
            equipment.len(),
            hotkeys.len(),
            items.len()
        );

        Self {
            slots,
            equipment,
            hotkeys,
            items,
        }
    }

    fn range(&self, group: SlotGroup) -> Range<usize> {
        match group {
            SlotGroup::Equipment => self.equipment.clone(),
            SlotGroup::Hotkeys => self.hotkeys.clone(),
            SlotGroup::Items => self.items.clone(),
        }
    }

    fn flat_index(&self, slot: SlotRef) -> Option<usize> {
        let range = self.range(slot.group);
        (slot.index < range.len()).then(|| range.start + slot.index)
    }

    fn slot_ref(&self, group: SlotGroup, flat: usize) -> SlotRef {
        SlotRef {
            group,
            index: flat - self.range(group).start,
        }
    }

    /// Slots of one group, in index order
    pub fn group(&self, group: SlotGroup) -> &[Slot] {
        &self.slots[self.range(group)]
    }

    pub fn equipment_slots(&self) -> &[Slot] {
        self.group(SlotGroup::Equipment)
    }

    pub fn hotkey_slots(&self) -> &[Slot] {
        self.group(SlotGroup::Hotkeys)
    }

    pub fn item_slots(&self) -> &[Slot] {
        self.group(SlotGroup::Items)
    }

    /// Get a slot
    pub fn slot(&self, slot: SlotRef) -> Option<&Slot> {
        self.slots.get(self.flat_index(slot)?)
    }

    fn slot_mut(&mut self, slot: SlotRef) -> Result<&mut Slot, InventoryError> {
        let index = self.flat_index(slot).ok_or(InventoryError::SlotNotFound(slot))?;
        Ok(&mut self.slots[index])
    }

    /// Every slot with its address
    pub fn slots(&self) -> impl Iterator<Item = (SlotRef, &Slot)> + '_ {
        [SlotGroup::Equipment, SlotGroup::Hotkeys, SlotGroup::Items]
            .into_iter()
            .flat_map(move |group| {
                self.group(group)
                    .iter()
                    .enumerate()
                    .map(move |(index, slot)| (SlotRef { group, index }, slot))
            })
    }

    /// Total units held under `name`
    pub fn count_of(&self, name: &str) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.holds(name))
            .map(Slot::stack_count)
            .sum()
    }

    /// Number of occupied slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Equipment slot indices reserved for `region`, in index order
    fn region_slots(&self, region: EquipRegion) -> Vec<usize> {
        self.equipment
            .clone()
            .filter(|index| self.slots[*index].kind() == SlotKind::Equipment { region })
            .collect()
    }

    /// Place one unit of `item`.
    ///
    /// Tries, in order: merging a stackable item into a matching hotkey
    /// stack, then a matching general stack, then the first empty general
    /// slot, then (equipment only) the first empty equipment slot of the
    /// item's region. Gives the item back when every path is exhausted.
    pub fn add_item(
        &mut self,
        item: Item,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<SlotRef, Item> {
        let mut item = item;

        if item.is_stackable() {
            for group in [SlotGroup::Hotkeys, SlotGroup::Items] {
                item = match self.try_stack(group, item, registry) {
                    Ok(slot) => return Ok(slot),
                    Err(item) => item,
                };
            }
        }

        let general: Vec<usize> = self.items.clone().collect();
        item = match self.try_empty(SlotGroup::Items, &general, item, registry) {
            Ok(slot) => return Ok(slot),
            Err(item) => item,
        };

        if let Some(region) = item.item_type().region() {
            let reserved = self.region_slots(region);
            item = match self.try_empty(SlotGroup::Equipment, &reserved, item, registry) {
                Ok(slot) => return Ok(slot),
                Err(item) => item,
            };
        }

        log::debug!("No slot available for '{}'", item.name());
        Err(item)
    }

    fn try_stack(
        &mut self,
        group: SlotGroup,
        mut item: Item,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<SlotRef, Item> {
        for index in self.range(group) {
            let slot = &mut self.slots[index];
            if !slot.holds(item.name()) || slot.space_available() == 0 {
                continue;
            }
            match slot.add_item(item, registry) {
                Ok(_) => return Ok(self.slot_ref(group, index)),
                Err(rejected) => item = rejected.into_item(),
            }
        }
        Err(item)
    }

    fn try_empty(
        &mut self,
        group: SlotGroup,
        candidates: &[usize],
        mut item: Item,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<SlotRef, Item> {
        for &index in candidates {
            let slot = &mut self.slots[index];
            if slot.is_occupied() {
                continue;
            }
            match slot.add_item(item, registry) {
                Ok(_) => return Ok(self.slot_ref(group, index)),
                Err(rejected) => item = rejected.into_item(),
            }
        }
        Err(item)
    }

    /// Remove one unit of the item called `name`.
    ///
    /// Searches hotkeys, then general slots, then the equipment slots of
    /// `item_type`'s region. Returns false if no slot holds it.
    pub fn remove_item(
        &mut self,
        name: &str,
        item_type: ItemType,
        registry: &mut PassiveEffectRegistry,
    ) -> bool {
        let mut candidates: Vec<usize> = self.hotkeys.clone().chain(self.items.clone()).collect();
        if let Some(region) = item_type.region() {
            candidates.extend(self.region_slots(region));
        }

        let Some(index) = candidates.into_iter().find(|index| self.slots[*index].holds(name)) else {
            return false;
        };
        self.slots[index].remove_item(registry).removed()
    }

    /// Use the item in hotkey slot `index` (0-based)
    pub fn use_hotkey(
        &mut self,
        index: usize,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<ClickOutcome, InventoryError> {
        let len = self.hotkeys.len();
        if index >= len {
            return Err(InventoryError::HotkeyOutOfRange { index, len });
        }
        self.slot_mut(SlotRef::hotkey(index))
            .map(|slot| slot.on_left_click(registry))
    }

    /// Hotkey index for a number key: `1..=9` map to `0..=8`, `0` to 9
    pub fn hotkey_for_key(key: u8) -> Option<usize> {
        match key {
            0 => Some(9),
            1..=9 => Some(key as usize - 1),
            _ => None,
        }
    }

    /// Left click on a slot
    pub fn left_click(
        &mut self,
        slot: SlotRef,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<ClickOutcome, InventoryError> {
        Ok(self.slot_mut(slot)?.on_left_click(registry))
    }

    /// Right click on a slot
    pub fn right_click(
        &mut self,
        slot: SlotRef,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<Removal, InventoryError> {
        Ok(self.slot_mut(slot)?.on_right_click(registry))
    }

    /// Hover over a slot
    pub fn hover(&self, slot: SlotRef) -> Result<Option<SlotTooltip>, InventoryError> {
        self.slot(slot)
            .map(Slot::on_hover)
            .ok_or(InventoryError::SlotNotFound(slot))
    }

    /// Discard the whole stack in a slot
    pub fn discard(
        &mut self,
        slot: SlotRef,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<Option<Item>, InventoryError> {
        Ok(self.slot_mut(slot)?.discard(registry))
    }

    /// Drag the stack in `from` onto `to`
    pub fn transfer(
        &mut self,
        from: SlotRef,
        to: SlotRef,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<TransferOutcome, InventoryError> {
        let source = self.flat_index(from).ok_or(InventoryError::SlotNotFound(from))?;
        let target = self.flat_index(to).ok_or(InventoryError::SlotNotFound(to))?;
        if source == target {
            return Err(RejectReason::SameSlot.into());
        }

        let (source, target) = if source < target {
            let (low, high) = self.slots.split_at_mut(target);
            (&mut low[source], &mut high[0])
        } else {
            let (low, high) = self.slots.split_at_mut(source);
            (&mut high[0], &mut low[target])
        };

        let outcome = target.transfer_from(source, registry)?;
        log::debug!("Transfer {} -> {}: {:?}", from, to, outcome);
        Ok(outcome)
    }

    /// Advance cooldowns and ongoing effects of every held item
    pub fn tick(&mut self, dt: f32) {
        for slot in &mut self.slots {
            slot.tick(dt);
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(&InventoryLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ActiveProfile, ItemKind};
    use kitbag_core::IdGenerator;

    fn small_layout() -> InventoryLayout {
        InventoryLayout::default().with_hotkeys(2).with_grid(1, 2)
    }

    fn potion(ids: &IdGenerator) -> Item {
        Item::new(ids.next(), "potion", ItemKind::Active(ActiveProfile::consumable())).with_max_stack(5)
    }

    fn gear(ids: &IdGenerator, name: &str, region: EquipRegion) -> Item {
        Item::new(ids.next(), name, ItemKind::Equipment(region))
    }

    #[test]
    fn test_layout_groups() {
        let inv = Inventory::default();
        assert_eq!(inv.equipment_slots().len(), 5);
        assert_eq!(inv.hotkey_slots().len(), 10);
        assert_eq!(inv.item_slots().len(), 24);
        assert_eq!(inv.hotkey_slots()[0].hotkey_number(), Some(1));
        assert_eq!(inv.hotkey_slots()[9].hotkey_number(), Some(10));
        assert_eq!(inv.slots().count(), 39);
    }

    #[test]
    fn test_add_goes_to_first_general_slot() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        assert_eq!(inv.add_item(potion(&ids), &mut registry).unwrap(), SlotRef::item(0));
        assert_eq!(inv.add_item(potion(&ids), &mut registry).unwrap(), SlotRef::item(0));
        assert_eq!(inv.count_of("potion"), 2);
        assert_eq!(inv.used_slots(), 1);
    }

    #[test]
    fn test_hotkey_stack_preferred() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        inv.add_item(potion(&ids), &mut registry).unwrap();
        inv.transfer(SlotRef::item(0), SlotRef::hotkey(1), &mut registry).unwrap();

        assert_eq!(inv.add_item(potion(&ids), &mut registry).unwrap(), SlotRef::hotkey(1));
        assert_eq!(inv.slot(SlotRef::hotkey(1)).unwrap().stack_count(), 2);
        assert!(!inv.slot(SlotRef::item(0)).unwrap().is_occupied());
    }

    #[test]
    fn test_full_stack_spills_into_next_slot() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        for _ in 0..6 {
            inv.add_item(potion(&ids), &mut registry).unwrap();
        }
        assert_eq!(inv.slot(SlotRef::item(0)).unwrap().stack_count(), 5);
        assert_eq!(inv.slot(SlotRef::item(1)).unwrap().stack_count(), 1);
    }

    #[test]
    fn test_equipment_falls_back_to_region_slots() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        inv.add_item(gear(&ids, "hat", EquipRegion::Head), &mut registry).unwrap();
        inv.add_item(gear(&ids, "cap", EquipRegion::Head), &mut registry).unwrap();

        let placed = inv.add_item(gear(&ids, "gloves", EquipRegion::Top), &mut registry).unwrap();
        assert_eq!(placed, SlotRef::equipment(1));
        let placed = inv.add_item(gear(&ids, "shirt", EquipRegion::Top), &mut registry).unwrap();
        assert_eq!(placed, SlotRef::equipment(2));
        assert!(inv.add_item(gear(&ids, "vest", EquipRegion::Top), &mut registry).is_err());

        let placed = inv.add_item(gear(&ids, "boots", EquipRegion::Bottom), &mut registry).unwrap();
        assert_eq!(placed, SlotRef::equipment(3));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_remove_searches_region_slots() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout().with_grid(1, 1));

        inv.add_item(potion(&ids), &mut registry).unwrap();
        inv.add_item(gear(&ids, "boots", EquipRegion::Bottom), &mut registry).unwrap();
        assert!(inv.slot(SlotRef::equipment(3)).unwrap().holds("boots"));

        assert!(!inv.remove_item("boots", ItemType::TopEquip, &mut registry));
        assert!(inv.remove_item("boots", ItemType::BottomEquip, &mut registry));
        assert!(registry.is_empty());
        assert!(!inv.remove_item("boots", ItemType::BottomEquip, &mut registry));
    }

    #[test]
    fn test_equipment_stays_in_its_region() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        assert_eq!(
            inv.add_item(gear(&ids, "helmet", EquipRegion::Head), &mut registry).unwrap(),
            SlotRef::item(0)
        );
        assert_eq!(
            inv.transfer(SlotRef::item(0), SlotRef::equipment(1), &mut registry),
            Err(InventoryError::Transfer(RejectReason::WrongRegion))
        );
        inv.transfer(SlotRef::item(0), SlotRef::equipment(0), &mut registry).unwrap();

        assert_eq!(
            inv.transfer(SlotRef::equipment(0), SlotRef::equipment(3), &mut registry),
            Err(InventoryError::Transfer(RejectReason::WrongRegion))
        );
        assert!(inv.slot(SlotRef::equipment(0)).unwrap().holds("helmet"));
        assert!(!inv.slot(SlotRef::equipment(3)).unwrap().is_occupied());

        // dragged out to the grid and back, the helmet can still be removed by name
        assert_eq!(
            inv.transfer(SlotRef::equipment(0), SlotRef::item(1), &mut registry),
            Ok(TransferOutcome::Moved { count: 1 })
        );
        assert_eq!(
            inv.transfer(SlotRef::item(1), SlotRef::equipment(0), &mut registry),
            Ok(TransferOutcome::Moved { count: 1 })
        );
        assert!(inv.remove_item("helmet", ItemType::HeadEquip, &mut registry));
        assert_eq!(inv.count_of("helmet"), 0);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_unvalidated_layout_is_clamped() {
        let layout = InventoryLayout::default().with_hotkeys(300).with_grid(usize::MAX, 2);
        let inv = Inventory::new(&layout);

        assert_eq!(inv.hotkey_slots().len(), 255);
        assert_eq!(inv.hotkey_slots()[254].hotkey_number(), Some(255));
        assert_eq!(inv.item_slots().len(), InventoryLayout::MAX_ITEM_SLOTS);
    }

    #[test]
    fn test_transfer_addressing() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());
        inv.add_item(potion(&ids), &mut registry).unwrap();

        assert_eq!(
            inv.transfer(SlotRef::item(0), SlotRef::item(0), &mut registry),
            Err(InventoryError::Transfer(RejectReason::SameSlot))
        );
        assert_eq!(
            inv.transfer(SlotRef::item(0), SlotRef::hotkey(7), &mut registry),
            Err(InventoryError::SlotNotFound(SlotRef::hotkey(7)))
        );
        assert_eq!(
            inv.transfer(SlotRef::item(1), SlotRef::item(0), &mut registry),
            Err(InventoryError::Transfer(RejectReason::SourceEmpty))
        );
        assert_eq!(
            inv.transfer(SlotRef::item(0), SlotRef::item(1), &mut registry),
            Ok(TransferOutcome::Moved { count: 1 })
        );
        assert_eq!(
            inv.transfer(SlotRef::item(1), SlotRef::equipment(0), &mut registry),
            Err(InventoryError::Transfer(RejectReason::NotEquipment))
        );
    }

    #[test]
    fn test_use_hotkey_bounds() {
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());

        assert_eq!(inv.use_hotkey(0, &mut registry), Ok(ClickOutcome::Empty));
        assert_eq!(
            inv.use_hotkey(2, &mut registry),
            Err(InventoryError::HotkeyOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_hotkey_for_key() {
        assert_eq!(Inventory::hotkey_for_key(1), Some(0));
        assert_eq!(Inventory::hotkey_for_key(9), Some(8));
        assert_eq!(Inventory::hotkey_for_key(0), Some(9));
        assert_eq!(Inventory::hotkey_for_key(11), None);
    }

    #[test]
    fn test_hover_and_clicks_by_address() {
        let ids = IdGenerator::new();
        let mut registry = PassiveEffectRegistry::new();
        let mut inv = Inventory::new(&small_layout());
        inv.add_item(potion(&ids), &mut registry).unwrap();
        inv.add_item(potion(&ids), &mut registry).unwrap();

        let tooltip = inv.hover(SlotRef::item(0)).unwrap().unwrap();
        assert_eq!(tooltip.count, 2);
        assert_eq!(inv.hover(SlotRef::item(1)), Ok(None));
        assert!(inv.hover(SlotRef::item(9)).is_err());

        assert_eq!(
            inv.left_click(SlotRef::item(0), &mut registry),
            Ok(ClickOutcome::Used { consumed: true })
        );
        assert!(inv.right_click(SlotRef::item(0), &mut registry).unwrap().removed());
        assert_eq!(inv.count_of("potion"), 0);
    }
}
