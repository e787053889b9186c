use core::fmt;

use serde::{Deserialize, Serialize};

/// Immutable content of a board cell, fixed when the board is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Number of mines among the neighbors, `0..=8`.
    Count(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Safe cell with no adjacent mines, digging it cascades.
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }

    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Count(count) => Some(count),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mine => f.write_str("*"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// What a player is allowed to see of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Revealed(CellValue),
}

impl CellView {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
