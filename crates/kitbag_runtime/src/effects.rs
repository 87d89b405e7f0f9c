//! Stock item effects
//!
//! Effects used by catalog items. They only touch state handed to them at
//! construction (a use counter, the player tint), never the inventory.

use kitbag_inventory::{EffectContext, ItemEffect};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Logs every hook
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffect;

impl ItemEffect for LogEffect {
    fn on_use(&mut self, ctx: &EffectContext<'_>) {
        log::info!("Using '{}' ({} in stack)", ctx.name, ctx.stack);
    }

    fn apply(&mut self, ctx: &EffectContext<'_>) {
        log::info!("Applying passive effect of '{}'", ctx.name);
    }

    fn remove(&mut self, ctx: &EffectContext<'_>) {
        log::info!("Removing passive effect of '{}'", ctx.name);
    }

    fn on_tick(&mut self, ctx: &EffectContext<'_>) {
        log::debug!("'{}' effect tick", ctx.name);
    }
}

/// Counts uses in a counter shared by every instance of one catalog item
#[derive(Debug, Clone)]
pub struct CountingUse {
    uses: Arc<AtomicU32>,
}

impl CountingUse {
    pub fn new(uses: Arc<AtomicU32>) -> Self {
        Self { uses }
    }
}

impl ItemEffect for CountingUse {
    fn on_use(&mut self, ctx: &EffectContext<'_>) {
        let total = self.uses.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!("Used '{}' {} times", ctx.name, total);
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Player tint, the world state a color-cycling item drives
#[derive(Debug, Clone)]
pub struct PlayerTint {
    color: Arc<Mutex<Color>>,
}

impl PlayerTint {
    pub fn new() -> Self {
        Self {
            color: Arc::new(Mutex::new(Color::WHITE)),
        }
    }

    pub fn get(&self) -> Color {
        *self.color.lock()
    }

    pub fn set(&self, color: Color) {
        *self.color.lock() = color;
    }
}

impl Default for PlayerTint {
    fn default() -> Self {
        Self::new()
    }
}

/// Palette used by [`ColorCycle`]
pub const CYCLE_PALETTE: [Color; 6] = [
    Color::rgb(230, 57, 70),
    Color::rgb(244, 162, 97),
    Color::rgb(233, 196, 106),
    Color::rgb(42, 157, 143),
    Color::rgb(69, 123, 157),
    Color::rgb(131, 56, 236),
];

/// Passive effect that steps the player tint through [`CYCLE_PALETTE`] on
/// every timer tick and restores white when removed
#[derive(Debug, Clone)]
pub struct ColorCycle {
    tint: PlayerTint,
    next: usize,
}

impl ColorCycle {
    pub fn new(tint: PlayerTint) -> Self {
        Self { tint, next: 0 }
    }

    fn step(&mut self) -> Color {
        let color = CYCLE_PALETTE[self.next % CYCLE_PALETTE.len()];
        self.next = (self.next + 1) % CYCLE_PALETTE.len();
        self.tint.set(color);
        color
    }
}

impl ItemEffect for ColorCycle {
    fn apply(&mut self, ctx: &EffectContext<'_>) {
        self.next = 0;
        let color = self.step();
        log::info!("'{}' tints the player {}", ctx.name, color);
    }

    fn remove(&mut self, ctx: &EffectContext<'_>) {
        self.tint.set(Color::WHITE);
        log::info!("'{}' removed, player tint reset", ctx.name);
    }

    fn on_tick(&mut self, ctx: &EffectContext<'_>) {
        let color = self.step();
        log::debug!("'{}' tint -> {}", ctx.name, color);
    }
}
