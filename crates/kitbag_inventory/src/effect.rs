//! Item behaviour hooks and repeating effect timers

use kitbag_core::ItemId;

/// What an effect sees of the item it belongs to
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    /// Instance id of the item
    pub id: ItemId,
    /// Item name
    pub name: &'a str,
    /// Units in the stack that holds the item (0 when not held)
    pub stack: u32,
}

/// Behaviour attached to an item by whoever created it.
///
/// The inventory only sequences these calls. `on_use` is reached for active
/// and hybrid items, `apply`/`remove`/`on_tick` for passive, hybrid and
/// equipment items.
pub trait ItemEffect: Send {
    /// The item was used from a slot
    fn on_use(&mut self, _ctx: &EffectContext<'_>) {}

    /// The passive effect starts
    fn apply(&mut self, _ctx: &EffectContext<'_>) {}

    /// The passive effect stops
    fn remove(&mut self, _ctx: &EffectContext<'_>) {}

    /// One interval of an ongoing passive effect elapsed
    fn on_tick(&mut self, _ctx: &EffectContext<'_>) {}
}

/// Effect that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffect;

impl ItemEffect for NoEffect {}

/// Cancellable repeating timer driving an ongoing passive effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTimer {
    interval: f32,
    elapsed: f32,
    running: bool,
}

impl EffectTimer {
    /// Shortest interval accepted, in seconds
    pub const MIN_INTERVAL: f32 = 0.01;

    /// Most intervals a single advance fires
    pub const MAX_CATCH_UP: u32 = 16;

    /// Create a stopped timer firing every `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
            elapsed: 0.0,
            running: false,
        }
    }

    /// Repeat interval in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Start from a fresh interval
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Stop firing. Pending time is discarded.
    pub fn cancel(&mut self) {
        self.elapsed = 0.0;
        self.running = false;
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` seconds, returning how many intervals completed.
    ///
    /// At most [`Self::MAX_CATCH_UP`] intervals fire per call; intervals
    /// beyond that are dropped along with the time they covered.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let fires = (self.elapsed / self.interval) as u32;
        if fires > Self::MAX_CATCH_UP {
            log::debug!("Effect timer dropped {} intervals", fires - Self::MAX_CATCH_UP);
            self.elapsed %= self.interval;
            return Self::MAX_CATCH_UP;
        }
        self.elapsed -= fires as f32 * self.interval;
        fires
    }
}
