//! Item model: type categories, capabilities and item instances

use crate::effect::{EffectContext, EffectTimer, ItemEffect, NoEffect};
use kitbag_core::{Handle, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon asset referenced by items. The inventory never reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    /// Asset path
    pub path: String,
}

/// Opaque icon reference; the null handle is the empty-slot placeholder
pub type IconHandle = Handle<Icon>;

/// Item type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Usable items
    Active,
    /// Items with an effect while held
    Passive,
    /// Usable items with an effect while held
    Hybrid,
    /// Helmets, hats
    HeadEquip,
    /// Gloves, shirts
    TopEquip,
    /// Boots, trousers
    BottomEquip,
}

impl ItemType {
    /// Check if this is an equipment category
    pub fn is_equipment(&self) -> bool {
        self.region().is_some()
    }

    /// Body region for equipment categories
    pub fn region(&self) -> Option<EquipRegion> {
        match self {
            Self::HeadEquip => Some(EquipRegion::Head),
            Self::TopEquip => Some(EquipRegion::Top),
            Self::BottomEquip => Some(EquipRegion::Bottom),
            Self::Active | Self::Passive | Self::Hybrid => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Passive => "passive",
            Self::Hybrid => "hybrid",
            Self::HeadEquip => "head equipment",
            Self::TopEquip => "top equipment",
            Self::BottomEquip => "bottom equipment",
        };
        f.write_str(name)
    }
}

/// Body region an equipment slot is reserved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipRegion {
    Head,
    Top,
    Bottom,
}

impl EquipRegion {
    /// Item type that belongs in this region
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Head => ItemType::HeadEquip,
            Self::Top => ItemType::TopEquip,
            Self::Bottom => ItemType::BottomEquip,
        }
    }
}

/// How an active item behaves when used
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActiveProfile {
    /// Whether the item survives being used
    pub reusable: bool,
    /// Seconds before a reusable item can be used again
    pub cooldown: f32,
}

impl ActiveProfile {
    /// Used up on first use
    pub fn consumable() -> Self {
        Self::default()
    }

    /// Survives use
    pub fn reusable() -> Self {
        Self {
            reusable: true,
            cooldown: 0.0,
        }
    }

    /// Set cooldown in seconds
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = seconds.max(0.0);
        self
    }
}

/// Capability set of an item, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// Can be used
    Active(ActiveProfile),
    /// Has a passive effect
    Passive,
    /// Can be used and has a passive effect
    Hybrid(ActiveProfile),
    /// Has a passive effect and only fits its region's equipment slots
    Equipment(EquipRegion),
}

impl ItemKind {
    /// Type category of this kind
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Active(_) => ItemType::Active,
            Self::Passive => ItemType::Passive,
            Self::Hybrid(_) => ItemType::Hybrid,
            Self::Equipment(region) => region.item_type(),
        }
    }

    /// Active capability, if any
    pub fn active(&self) -> Option<ActiveProfile> {
        match self {
            Self::Active(profile) | Self::Hybrid(profile) => Some(*profile),
            Self::Passive | Self::Equipment(_) => None,
        }
    }

    /// Check for passive capability
    pub fn is_passive(&self) -> bool {
        matches!(self, Self::Passive | Self::Hybrid(_) | Self::Equipment(_))
    }
}

/// Result of using an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UseOutcome {
    /// The effect ran; `consumed` when one unit must leave the slot
    Used { consumed: bool },
    /// A reusable item is still cooling down
    CoolingDown { remaining: f32 },
    /// The item has no active capability
    NotUsable,
}

/// One logical item instance
pub struct Item {
    id: ItemId,
    name: String,
    description: String,
    icon: IconHandle,
    kind: ItemKind,
    max_stack_size: u32,
    current_stack_size: u32,
    cooldown_remaining: f32,
    timer: Option<EffectTimer>,
    effect: Box<dyn ItemEffect>,
}

impl Item {
    /// Create a new item with no behaviour attached
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            icon: IconHandle::null(),
            kind,
            max_stack_size: 1,
            current_stack_size: 0,
            cooldown_remaining: 0.0,
            timer: None,
            effect: Box::new(NoEffect),
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set icon
    pub fn with_icon(mut self, icon: IconHandle) -> Self {
        self.icon = icon;
        self
    }

    /// Set max stack size (1 = not stackable)
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack_size = max.max(1);
        self
    }

    /// Attach behaviour
    pub fn with_effect(mut self, effect: impl ItemEffect + 'static) -> Self {
        self.effect = Box::new(effect);
        self
    }

    /// Make the passive effect repeat every `interval` seconds while applied
    pub fn with_repeating_effect(mut self, interval: f32) -> Self {
        self.timer = Some(EffectTimer::new(interval));
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> IconHandle {
        self.icon
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    /// Units in the stack holding this item, as last set by that slot
    pub fn current_stack_size(&self) -> u32 {
        self.current_stack_size
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    pub fn is_passive(&self) -> bool {
        self.kind.is_passive()
    }

    pub fn is_equipment(&self) -> bool {
        matches!(self.kind, ItemKind::Equipment(_))
    }

    /// Whether using the item leaves it in place
    pub fn is_reusable(&self) -> bool {
        self.kind.active().map_or(false, |profile| profile.reusable)
    }

    /// Seconds left before the item can be used again
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Check if the ongoing effect timer is running
    pub fn is_effect_running(&self) -> bool {
        self.timer.as_ref().map_or(false, EffectTimer::is_running)
    }

    /// Check if two items can share a stack
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.item_type() == other.item_type() && self.name == other.name
    }

    pub(crate) fn set_current_stack_size(&mut self, count: u32) {
        self.current_stack_size = count;
    }

    pub(crate) fn use_item(&mut self) -> UseOutcome {
        let Some(profile) = self.kind.active() else {
            return UseOutcome::NotUsable;
        };
        if self.cooldown_remaining > 0.0 {
            return UseOutcome::CoolingDown {
                remaining: self.cooldown_remaining,
            };
        }

        let ctx = EffectContext {
            id: self.id,
            name: &self.name,
            stack: self.current_stack_size,
        };
        self.effect.on_use(&ctx);

        if profile.reusable {
            self.cooldown_remaining = profile.cooldown;
        }
        UseOutcome::Used {
            consumed: !profile.reusable,
        }
    }

    pub(crate) fn apply_passive_effect(&mut self) {
        if !self.kind.is_passive() {
            return;
        }
        let ctx = EffectContext {
            id: self.id,
            name: &self.name,
            stack: self.current_stack_size,
        };
        self.effect.apply(&ctx);
        if let Some(timer) = &mut self.timer {
            timer.start();
        }
    }

    pub(crate) fn remove_passive_effect(&mut self) {
        if !self.kind.is_passive() {
            return;
        }
        if let Some(timer) = &mut self.timer {
            timer.cancel();
        }
        let ctx = EffectContext {
            id: self.id,
            name: &self.name,
            stack: self.current_stack_size,
        };
        self.effect.remove(&ctx);
    }

    /// Advance cooldown and the ongoing effect by `dt` seconds
    pub(crate) fn tick(&mut self, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }

        let fires = self.timer.as_mut().map_or(0, |timer| timer.advance(dt));
        if fires == 0 {
            return;
        }
        let ctx = EffectContext {
            id: self.id,
            name: &self.name,
            stack: self.current_stack_size,
        };
        for _ in 0..fires {
            self.effect.on_tick(&ctx);
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("max_stack_size", &self.max_stack_size)
            .field("current_stack_size", &self.current_stack_size)
            .finish_non_exhaustive()
    }
}
