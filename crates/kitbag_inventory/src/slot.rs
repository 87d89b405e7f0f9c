//! Slots: single-stack containers
//!
//! A slot is either empty or holds one stack of `1..=stack_limit` units of a
//! single item instance. Only slots mutate slot state; the allocator picks a
//! slot and asks it to change. Every path that makes an item enter or leave
//! the inventory goes through the [`PassiveEffectRegistry`] handed in by the
//! caller, so passive effects follow the item.

use crate::item::{EquipRegion, IconHandle, Item, ItemType, UseOutcome};
use crate::registry::PassiveEffectRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slot role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// General purpose slot
    Item,
    /// Quick-use slot bound to a numbered key (1-based)
    HotKey { number: u8 },
    /// Equipment slot reserved for one body region
    Equipment { region: EquipRegion },
}

impl SlotKind {
    /// Check if an item may enter a slot of this kind
    pub fn accepts(&self, item: &Item) -> bool {
        self.refusal(item).is_none()
    }

    /// Why an item may not enter a slot of this kind, if it may not
    pub fn refusal(&self, item: &Item) -> Option<RejectReason> {
        match self {
            Self::Item | Self::HotKey { .. } => None,
            Self::Equipment { region } => match item.item_type().region() {
                None => Some(RejectReason::NotEquipment),
                Some(own) if own != *region => Some(RejectReason::WrongRegion),
                Some(_) => None,
            },
        }
    }
}

/// Why a slot refused an operation. The slot is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The stack already holds `stack_limit` units
    #[error("stack is full")]
    StackFull,
    /// The slot holds a different item
    #[error("item does not stack with the slot's current item")]
    Incompatible,
    /// Equipment slots only take equipment
    #[error("only equipment items can be placed in an equipment slot")]
    NotEquipment,
    /// Equipment slots only take equipment worn on their own region
    #[error("equipment belongs to a different region")]
    WrongRegion,
    /// Nothing to move
    #[error("source slot is empty")]
    SourceEmpty,
    /// Transfer from a slot onto itself
    #[error("source and target are the same slot")]
    SameSlot,
}

/// A refused item, handed back to the caller
#[derive(Debug, Error)]
#[error("{reason}: '{}'", .item.name())]
pub struct Rejected {
    pub reason: RejectReason,
    pub item: Item,
}

impl Rejected {
    fn new(reason: RejectReason, item: Item) -> Self {
        Self { reason, item }
    }

    /// Take the item back
    pub fn into_item(self) -> Item {
        self.item
    }
}

/// Successful placement of one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The slot was empty and now holds the item
    Placed,
    /// The unit joined the existing stack
    Stacked { count: u32 },
}

/// Successful slot-to-slot transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The whole stack moved into an empty target
    Moved { count: u32 },
    /// The whole source stack joined the target stack
    Merged { moved: u32, count: u32 },
    /// The target filled up; the rest stayed in the source
    Split { moved: u32, remaining: u32 },
}

/// Result of removing one unit
#[derive(Debug)]
pub enum Removal {
    /// The slot was already empty
    Empty,
    /// One unit removed, the stack remains
    Decremented { remaining: u32 },
    /// The last unit left; the slot is empty again
    Cleared(Item),
}

impl Removal {
    /// Check if a unit was removed
    pub fn removed(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Result of clicking a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Nothing in the slot
    Empty,
    /// The item has no active capability
    NotUsable,
    /// A reusable item is still cooling down
    CoolingDown { remaining: f32 },
    /// The item was used; `consumed` when a unit was removed
    Used { consumed: bool },
}

impl From<UseOutcome> for ClickOutcome {
    fn from(outcome: UseOutcome) -> Self {
        match outcome {
            UseOutcome::Used { consumed } => Self::Used { consumed },
            UseOutcome::CoolingDown { remaining } => Self::CoolingDown { remaining },
            UseOutcome::NotUsable => Self::NotUsable,
        }
    }
}

/// Hover information for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTooltip {
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub count: u32,
    pub limit: u32,
}

#[derive(Debug)]
struct Stack {
    item: Item,
    /// Always at least 1
    count: u32,
}

/// A single inventory slot
#[derive(Debug)]
pub struct Slot {
    kind: SlotKind,
    contents: Option<Stack>,
    stack_limit: u32,
}

impl Slot {
    /// Create an empty slot
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            contents: None,
            stack_limit: 1,
        }
    }

    /// General purpose slot
    pub fn item_slot() -> Self {
        Self::new(SlotKind::Item)
    }

    /// Hotkey slot bound to key `number`
    pub fn hotkey(number: u8) -> Self {
        Self::new(SlotKind::HotKey { number })
    }

    /// Equipment slot for `region`
    pub fn equipment(region: EquipRegion) -> Self {
        Self::new(SlotKind::Equipment { region })
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn is_occupied(&self) -> bool {
        self.contents.is_some()
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.contents.as_ref().map(|stack| &stack.item)
    }

    /// Units held (0 when empty)
    pub fn stack_count(&self) -> u32 {
        self.contents.as_ref().map_or(0, |stack| stack.count)
    }

    /// Capacity adopted from the last item placed into the empty slot
    pub fn stack_limit(&self) -> u32 {
        self.stack_limit
    }

    /// Units the current stack can still take (0 when empty)
    pub fn space_available(&self) -> u32 {
        self.contents
            .as_ref()
            .map_or(0, |stack| self.stack_limit.saturating_sub(stack.count))
    }

    /// Icon to draw; the null handle means "empty"
    pub fn icon(&self) -> IconHandle {
        self.current_item().map_or(IconHandle::null(), Item::icon)
    }

    /// Hotkey number, for hotkey slots
    pub fn hotkey_number(&self) -> Option<u8> {
        match self.kind {
            SlotKind::HotKey { number } => Some(number),
            _ => None,
        }
    }

    /// Check if the item may enter this slot at all
    pub fn accepts(&self, item: &Item) -> bool {
        self.kind.accepts(item)
    }

    /// Check if the slot holds an item named `name`
    pub fn holds(&self, name: &str) -> bool {
        self.current_item().map_or(false, |item| item.name() == name)
    }

    /// Add one unit.
    ///
    /// An empty slot takes the item and adopts its max stack size; passive
    /// items are equipped. An occupied slot absorbs the unit when the item
    /// stacks with its own and there is room. Otherwise the item comes back
    /// inside [`Rejected`] and nothing changes.
    ///
    /// Stacking needs the same item type and the same name, so two different
    /// items of one type are [`RejectReason::Incompatible`].
    pub fn add_item(
        &mut self,
        mut item: Item,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<Placement, Rejected> {
        if let Some(reason) = self.kind.refusal(&item) {
            return Err(Rejected::new(reason, item));
        }

        match self.contents.as_mut() {
            None => {
                self.stack_limit = item.max_stack_size();
                item.set_current_stack_size(1);
                registry.equip(&mut item);
                log::debug!("Placed '{}' into {:?} slot", item.name(), self.kind);
                self.contents = Some(Stack { item, count: 1 });
                Ok(Placement::Placed)
            }
            Some(stack) => {
                if !stack.item.stacks_with(&item) {
                    return Err(Rejected::new(RejectReason::Incompatible, item));
                }
                if stack.count >= self.stack_limit {
                    return Err(Rejected::new(RejectReason::StackFull, item));
                }
                stack.count += 1;
                stack.item.set_current_stack_size(stack.count);
                Ok(Placement::Stacked { count: stack.count })
            }
        }
    }

    /// Move `source`'s stack, or as much of it as fits, into this slot.
    ///
    /// Into an empty slot the whole stack moves and stays registered. Onto a
    /// compatible stack with room, everything that fits moves; if the whole
    /// source stack fits, the source item instance leaves the inventory and is
    /// unequipped. Rejections leave both slots unchanged.
    pub fn transfer_from(
        &mut self,
        source: &mut Slot,
        registry: &mut PassiveEffectRegistry,
    ) -> Result<TransferOutcome, RejectReason> {
        let mut incoming = source.contents.take().ok_or(RejectReason::SourceEmpty)?;
        if let Some(reason) = self.kind.refusal(&incoming.item) {
            source.contents = Some(incoming);
            return Err(reason);
        }

        match self.contents.as_mut() {
            None => {
                let count = incoming.count;
                self.stack_limit = incoming.item.max_stack_size();
                incoming.item.set_current_stack_size(count);
                registry.equip(&mut incoming.item);
                log::debug!("Moved {} x '{}' into {:?} slot", count, incoming.item.name(), self.kind);
                self.contents = Some(incoming);
                Ok(TransferOutcome::Moved { count })
            }
            Some(target) => {
                if !target.item.stacks_with(&incoming.item) {
                    source.contents = Some(incoming);
                    return Err(RejectReason::Incompatible);
                }
                let space = self.stack_limit.saturating_sub(target.count);
                if space == 0 {
                    source.contents = Some(incoming);
                    return Err(RejectReason::StackFull);
                }

                if incoming.count <= space {
                    let moved = incoming.count;
                    target.count += moved;
                    target.item.set_current_stack_size(target.count);
                    incoming.item.set_current_stack_size(0);
                    registry.unequip(&mut incoming.item);
                    log::debug!("Merged {} x '{}', stack now {}", moved, target.item.name(), target.count);
                    return Ok(TransferOutcome::Merged {
                        moved,
                        count: target.count,
                    });
                }

                target.count += space;
                target.item.set_current_stack_size(target.count);
                incoming.count -= space;
                incoming.item.set_current_stack_size(incoming.count);
                let remaining = incoming.count;
                if remaining == 0 {
                    registry.unequip(&mut incoming.item);
                } else {
                    source.contents = Some(incoming);
                }
                log::debug!("Split transfer: moved {}, {} left in source", space, remaining);
                Ok(TransferOutcome::Split {
                    moved: space,
                    remaining,
                })
            }
        }
    }

    /// Remove one unit. The last unit unequips a passive item and empties
    /// the slot.
    pub fn remove_item(&mut self, registry: &mut PassiveEffectRegistry) -> Removal {
        let Some(mut stack) = self.contents.take() else {
            return Removal::Empty;
        };

        if stack.count > 1 {
            stack.count -= 1;
            stack.item.set_current_stack_size(stack.count);
            let remaining = stack.count;
            self.contents = Some(stack);
            return Removal::Decremented { remaining };
        }

        registry.unequip(&mut stack.item);
        stack.item.set_current_stack_size(0);
        log::debug!("Removed last '{}' from {:?} slot", stack.item.name(), self.kind);
        Removal::Cleared(stack.item)
    }

    /// Remove the whole stack, unequipping it on the way out
    pub fn discard(&mut self, registry: &mut PassiveEffectRegistry) -> Option<Item> {
        let mut stack = self.contents.take()?;
        registry.unequip(&mut stack.item);
        stack.item.set_current_stack_size(0);
        log::debug!("Discarded {} x '{}'", stack.count, stack.item.name());
        Some(stack.item)
    }

    /// Use the held item; a non-reusable item loses one unit
    pub fn on_left_click(&mut self, registry: &mut PassiveEffectRegistry) -> ClickOutcome {
        if let SlotKind::HotKey { number } = self.kind {
            log::info!("Using hotkey {}", number);
        }
        let Some(stack) = self.contents.as_mut() else {
            return ClickOutcome::Empty;
        };

        let outcome = stack.item.use_item();
        if let UseOutcome::Used { consumed: true } = outcome {
            self.remove_item(registry);
        }
        outcome.into()
    }

    /// Remove one unit
    pub fn on_right_click(&mut self, registry: &mut PassiveEffectRegistry) -> Removal {
        self.remove_item(registry)
    }

    /// Describe the held item
    pub fn on_hover(&self) -> Option<SlotTooltip> {
        let stack = self.contents.as_ref()?;
        Some(SlotTooltip {
            name: stack.item.name().to_string(),
            description: stack.item.description().to_string(),
            item_type: stack.item.item_type(),
            count: stack.count,
            limit: self.stack_limit,
        })
    }

    /// Advance the held item's cooldown and ongoing effect
    pub fn tick(&mut self, dt: f32) {
        if let Some(stack) = self.contents.as_mut() {
            stack.item.tick(dt);
        }
    }
}
