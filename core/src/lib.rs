#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

/// Dimensions and mine count of a game, always satisfying
/// `rows, cols >= 1` and `mines < rows * cols`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig", into = "RawGameConfig")]
pub struct GameConfig {
    size: Coord2,
    mines: CellCount,
}

impl GameConfig {
    /// The reference setup, 10x10 with 20 mines.
    pub const CLASSIC: Self = Self::new_unchecked((10, 10), 20);

    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, cols): Coord2, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(rows, cols) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked((rows, cols), mines))
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Unvalidated mirror of [`GameConfig`] used on the serde boundary.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGameConfig {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new((raw.rows, raw.cols), raw.mines)
    }
}

impl From<GameConfig> for RawGameConfig {
    fn from(config: GameConfig) -> Self {
        Self {
            rows: config.rows(),
            cols: config.cols(),
            mines: config.mines(),
        }
    }
}

/// Mine placement together with the neighbor counts derived from it.
///
/// Built once per game and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct MineLayout {
    values: Array2<CellValue>,
    size: Coord2,
    mine_count: CellCount,
}

impl MineLayout {
    /// Derives every cell value from a mine mask.
    ///
    /// Callers guarantee the mask has `Coord` sized dimensions and at least one
    /// safe cell.
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let (rows, cols) = mine_mask.dim();
        let size = (rows as Coord, cols as Coord);

        let values = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[[row, col]] {
                CellValue::Mine
            } else {
                let coords = (row as Coord, col as Coord);
                let count = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                // at most eight neighbors
                CellValue::Count(count as u8)
            }
        });
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;

        log::trace!("derived values for {size:?} layout with {mine_count} mines");
        Self {
            values,
            size,
            mine_count,
        }
    }

    /// Builds a layout with mines at exactly `mine_coords`, duplicates are
    /// counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        if mine_mask.iter().all(|&is_mine| is_mine) {
            return Err(GameError::TooManyMines);
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    /// Random layout drawn from `rng`.
    pub fn random<R: RandomSource + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        SamplingGenerator::new(rng).generate(config)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    /// Every cell with its value, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, CellValue)> + '_ {
        self.values
            .indexed_iter()
            .map(|((row, col), &value)| ((row as Coord, col as Coord), value))
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells()
            .filter(|(_, value)| value.is_mine())
            .map(|(coords, _)| coords)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = CellValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.values[coords.to_nd_index()]
    }
}
