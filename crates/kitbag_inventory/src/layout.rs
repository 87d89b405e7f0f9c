//! Fixed slot layout of an inventory

use crate::item::EquipRegion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No hotkey slots
    #[error("layout needs at least one hotkey slot")]
    NoHotkeys,
    /// Hotkey numbers must fit in a u8
    #[error("layout has {0} hotkey slots, at most 255 are supported")]
    TooManyHotkeys(usize),
    /// No general item slots
    #[error("item grid is empty ({rows}x{columns})")]
    EmptyGrid { rows: usize, columns: usize },
    /// More general item slots than an inventory holds
    #[error("item grid {rows}x{columns} exceeds {} slots", InventoryLayout::MAX_ITEM_SLOTS)]
    GridTooLarge { rows: usize, columns: usize },
}

/// Slot groups and their sizes.
///
/// ```toml
/// hotkeys = 10
/// rows = 4
/// columns = 6
/// equipment = ["head", "top", "top", "bottom", "bottom"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryLayout {
    /// Number of hotkey slots, numbered from 1
    pub hotkeys: usize,
    /// General grid rows
    pub rows: usize,
    /// General grid columns
    pub columns: usize,
    /// Equipment slots in index order, one region each
    pub equipment: Vec<EquipRegion>,
}

impl Default for InventoryLayout {
    fn default() -> Self {
        Self {
            hotkeys: 10,
            rows: 4,
            columns: 6,
            equipment: vec![
                EquipRegion::Head,
                EquipRegion::Top,
                EquipRegion::Top,
                EquipRegion::Bottom,
                EquipRegion::Bottom,
            ],
        }
    }
}

impl InventoryLayout {
    /// Largest general item grid, in slots
    pub const MAX_ITEM_SLOTS: usize = 4096;

    /// Number of general item slots, saturating on overflow
    pub fn item_slot_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Set hotkey count
    pub fn with_hotkeys(mut self, hotkeys: usize) -> Self {
        self.hotkeys = hotkeys;
        self
    }

    /// Set general grid size
    pub fn with_grid(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Set equipment regions
    pub fn with_equipment(mut self, equipment: Vec<EquipRegion>) -> Self {
        self.equipment = equipment;
        self
    }

    /// Check the layout can back an inventory
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.hotkeys == 0 {
            return Err(LayoutError::NoHotkeys);
        }
        if self.hotkeys > u8::MAX as usize {
            return Err(LayoutError::TooManyHotkeys(self.hotkeys));
        }
        if self.item_slot_count() > Self::MAX_ITEM_SLOTS {
            return Err(LayoutError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.item_slot_count() == 0 {
            return Err(LayoutError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = InventoryLayout::default();
        assert_eq!(layout.item_slot_count(), 24);
        assert_eq!(layout.equipment.len(), 5);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            InventoryLayout::default().with_hotkeys(0).validate(),
            Err(LayoutError::NoHotkeys)
        );
        assert_eq!(
            InventoryLayout::default().with_hotkeys(300).validate(),
            Err(LayoutError::TooManyHotkeys(300))
        );
        assert_eq!(
            InventoryLayout::default().with_grid(0, 6).validate(),
            Err(LayoutError::EmptyGrid { rows: 0, columns: 6 })
        );
        assert_eq!(
            InventoryLayout::default().with_grid(65, 64).validate(),
            Err(LayoutError::GridTooLarge { rows: 65, columns: 64 })
        );
        assert!(InventoryLayout::default().with_grid(64, 64).validate().is_ok());
    }

    #[test]
    fn test_oversized_grid_does_not_overflow() {
        let layout = InventoryLayout::default().with_grid(usize::MAX, 2);
        assert_eq!(layout.item_slot_count(), usize::MAX);
        assert_eq!(
            layout.validate(),
            Err(LayoutError::GridTooLarge {
                rows: usize::MAX,
                columns: 2
            })
        );
    }

    #[test]
    fn test_parse_partial_toml() {
        let layout: InventoryLayout = toml::from_str(
            r#"
            rows = 2
            equipment = ["head", "bottom"]
            "#,
        )
        .unwrap();

        assert_eq!(layout.hotkeys, 10);
        assert_eq!(layout.item_slot_count(), 12);
        assert_eq!(layout.equipment, vec![EquipRegion::Head, EquipRegion::Bottom]);
    }
}
