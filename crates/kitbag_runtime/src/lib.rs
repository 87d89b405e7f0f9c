//! Kitbag Runtime
//!
//! Headless host for the inventory engine: loads a layout and an item catalog
//! from TOML, attaches stock effects to catalog items and drives one
//! inventory from a line-oriented console.

pub mod catalog;
pub mod config;
pub mod console;
pub mod effects;

pub use catalog::{EffectSpec, ItemCatalog, ItemSpec};
pub use config::{ConfigError, KitbagConfig};
pub use console::{Command, CommandError, Console};
pub use effects::{Color, ColorCycle, CountingUse, LogEffect, PlayerTint};
