//! Item catalog
//!
//! Item definitions loaded from config, and the factory that turns them into
//! item instances with fresh ids, icon handles and stock effects.
//!
//! ```toml
//! [[items]]
//! name = "potion"
//! type = "active"
//! max_stack = 5
//! effect = "count"
//! icon = "icons/potion.png"
//!
//! [[items]]
//! name = "charm"
//! type = "passive"
//! effect = "color_cycle"
//! repeat = 0.5
//! ```

use crate::effects::{ColorCycle, CountingUse, LogEffect, PlayerTint};
use kitbag_core::{HandleMap, IdGenerator};
use kitbag_inventory::{ActiveProfile, EquipRegion, Icon, IconHandle, Item, ItemKind, ItemType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Stock effect attached to a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSpec {
    #[default]
    None,
    /// [`LogEffect`]
    Log,
    /// [`CountingUse`]
    Count,
    /// [`ColorCycle`]
    ColorCycle,
}

fn default_max_stack() -> u32 {
    1
}

/// One item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub description: String,
    /// Icon asset path
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Active and hybrid items only: kept after use
    #[serde(default)]
    pub reusable: bool,
    /// Seconds between uses of a reusable item
    #[serde(default)]
    pub cooldown: f32,
    #[serde(default)]
    pub effect: EffectSpec,
    /// Interval of the ongoing passive effect, in seconds
    #[serde(default)]
    pub repeat: Option<f32>,
}

impl ItemSpec {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
            description: String::new(),
            icon: None,
            max_stack: 1,
            reusable: false,
            cooldown: 0.0,
            effect: EffectSpec::None,
            repeat: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = Some(path.into());
        self
    }

    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max;
        self
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.reusable = true;
        self.cooldown = seconds;
        self
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_repeat(mut self, interval: f32) -> Self {
        self.repeat = Some(interval);
        self
    }

    /// Capability set for this definition
    pub fn kind(&self) -> ItemKind {
        let profile = if self.reusable {
            ActiveProfile::reusable().with_cooldown(self.cooldown)
        } else {
            ActiveProfile::consumable()
        };
        match self.item_type {
            ItemType::Active => ItemKind::Active(profile),
            ItemType::Passive => ItemKind::Passive,
            ItemType::Hybrid => ItemKind::Hybrid(profile),
            ItemType::HeadEquip => ItemKind::Equipment(EquipRegion::Head),
            ItemType::TopEquip => ItemKind::Equipment(EquipRegion::Top),
            ItemType::BottomEquip => ItemKind::Equipment(EquipRegion::Bottom),
        }
    }

    /// Items the runtime ships with when no config lists any
    pub fn demo_items() -> Vec<Self> {
        vec![
            Self::new("trinket", ItemType::Hybrid)
                .with_description("Hums quietly. Can be rubbed for luck.")
                .with_icon("icons/trinket.png")
                .with_cooldown(2.0)
                .with_effect(EffectSpec::Log),
            Self::new("potion", ItemType::Active)
                .with_description("Restores a little health.")
                .with_icon("icons/potion.png")
                .with_max_stack(5)
                .with_effect(EffectSpec::Count),
            Self::new("bomb", ItemType::Active)
                .with_description("Single use. Stand back.")
                .with_icon("icons/bomb.png")
                .with_effect(EffectSpec::Log),
            Self::new("gloves", ItemType::TopEquip)
                .with_description("Worn leather gloves.")
                .with_icon("icons/gloves.png"),
            Self::new("helmet", ItemType::HeadEquip)
                .with_description("Dented, but it holds.")
                .with_icon("icons/helmet.png")
                .with_effect(EffectSpec::Log),
            Self::new("boots", ItemType::BottomEquip)
                .with_description("Sturdy walking boots.")
                .with_icon("icons/boots.png"),
            Self::new("charm", ItemType::Passive)
                .with_description("Shifts the wearer's colour while held.")
                .with_icon("icons/charm.png")
                .with_effect(EffectSpec::ColorCycle)
                .with_repeat(0.5),
        ]
    }
}

/// Item factory over a fixed set of definitions
#[derive(Debug)]
pub struct ItemCatalog {
    specs: Vec<ItemSpec>,
    ids: IdGenerator,
    icons: HandleMap<Icon>,
    icon_paths: HashMap<String, IconHandle>,
    uses: HashMap<String, Arc<AtomicU32>>,
    tint: PlayerTint,
}

impl ItemCatalog {
    /// Create a catalog, loading one icon per distinct path
    pub fn new(specs: Vec<ItemSpec>) -> Self {
        let mut icons = HandleMap::new();
        let mut icon_paths = HashMap::new();
        let mut uses = HashMap::new();

        for spec in &specs {
            if let Some(path) = &spec.icon {
                icon_paths
                    .entry(path.clone())
                    .or_insert_with(|| icons.insert(Icon { path: path.clone() }));
            }
            if spec.effect == EffectSpec::Count {
                uses.entry(spec.name.clone())
                    .or_insert_with(|| Arc::new(AtomicU32::new(0)));
            }
        }

        log::debug!("Catalog: {} items, {} icons", specs.len(), icons.len());

        Self {
            specs,
            ids: IdGenerator::new(),
            icons,
            icon_paths,
            uses,
            tint: PlayerTint::new(),
        }
    }

    pub fn specs(&self) -> &[ItemSpec] {
        &self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&ItemSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Create a new instance of the item called `name`
    pub fn create(&self, name: &str) -> Option<Item> {
        let spec = self.spec(name)?;
        let mut item = Item::new(self.ids.next(), &spec.name, spec.kind())
            .with_description(&spec.description)
            .with_max_stack(spec.max_stack);

        if let Some(handle) = spec.icon.as_ref().and_then(|path| self.icon_paths.get(path)) {
            item = item.with_icon(*handle);
        }

        item = match spec.effect {
            EffectSpec::None => item,
            EffectSpec::Log => item.with_effect(LogEffect),
            EffectSpec::Count => match self.uses.get(&spec.name) {
                Some(uses) => item.with_effect(CountingUse::new(uses.clone())),
                None => item,
            },
            EffectSpec::ColorCycle => item.with_effect(ColorCycle::new(self.tint.clone())),
        };

        if let Some(interval) = spec.repeat {
            item = item.with_repeating_effect(interval);
        }
        Some(item)
    }

    /// Resolve an icon handle
    pub fn icon(&self, handle: IconHandle) -> Option<&Icon> {
        self.icons.get(handle)
    }

    /// Times items called `name` with a counting effect were used
    pub fn use_count(&self, name: &str) -> u32 {
        self.uses
            .get(name)
            .map_or(0, |uses| uses.load(Ordering::Relaxed))
    }

    /// Player tint driven by color-cycling items
    pub fn tint(&self) -> &PlayerTint {
        &self.tint
    }

    /// Number of instances created so far
    pub fn issued(&self) -> u64 {
        self.ids.issued()
    }
}
