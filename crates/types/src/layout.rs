//! Slot arrangement on the display surface

use serde::{Deserialize, Serialize};

/// Grid configuration; slots fill rows left to right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { columns: 2 }
    }
}

impl GridConfig {
    /// Grid cell of a slot index (row-major)
    pub fn position(&self, slot: usize) -> SlotPosition {
        let columns = self.columns.max(1) as usize;
        SlotPosition {
            slot,
            row: (slot / columns) as u32,
            column: (slot % columns) as u32,
        }
    }
}

/// Where a display slot sits in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPosition {
    pub slot: usize,
    pub row: u32,
    pub column: u32,
}

impl std::fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.column)
    }
}
