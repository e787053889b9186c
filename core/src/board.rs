use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DigOutcome {
    Continue,
    Loss,
}

impl DigOutcome {
    pub const fn is_loss(self) -> bool {
        matches!(self, Self::Loss)
    }
}

/// Result of a single dig.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dig {
    pub outcome: DigOutcome,
    /// The dug cell first, then every cell the cascade revealed, in no
    /// particular order.
    pub revealed: Vec<Coord2>,
}

impl Dig {
    pub const fn is_loss(&self) -> bool {
        self.outcome.is_loss()
    }
}

/// One game session: a fixed mine layout plus the cells dug so far.
///
/// Only [`Board::dig`] (and its checked twin) grows the revealed set. The
/// game is won once every safe cell is revealed; flags are a presentation
/// concern and never reach the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    layout: MineLayout,
    revealed: BTreeSet<Coord2>,
}

impl Board {
    /// Places `config.mines()` mines uniformly at random and derives the
    /// neighbor counts.
    pub fn new<R: RandomSource + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        Self::with_layout(MineLayout::random(config, rng))
    }

    /// Starts a session on a prepared layout.
    pub fn with_layout(layout: MineLayout) -> Self {
        log::debug!(
            "new board {:?} with {} mines",
            layout.size(),
            layout.mine_count()
        );
        Self {
            layout,
            revealed: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.layout.safe_cell_count()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.layout.validate_coords(coords)
    }

    /// Value stored at `coords`, whether revealed or not.
    ///
    /// # Panics
    ///
    /// When `coords` lies outside the board.
    pub fn cell(&self, coords: Coord2) -> CellValue {
        self.assert_in_bounds(coords);
        self.layout[coords]
    }

    pub fn try_cell(&self, coords: Coord2) -> Result<CellValue> {
        let coords = self.validate_coords(coords)?;
        Ok(self.layout[coords])
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed.contains(&coords)
    }

    pub fn revealed(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.revealed.iter().copied()
    }

    /// Player-visible state of a cell.
    ///
    /// # Panics
    ///
    /// When `coords` lies outside the board.
    pub fn view(&self, coords: Coord2) -> CellView {
        let value = self.cell(coords);
        if self.is_revealed(coords) {
            CellView::Revealed(value)
        } else {
            CellView::Hidden
        }
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.layout.mines()
    }

    /// Reveals `coords`, cascading through neighbors when it has no adjacent
    /// mines.
    ///
    /// Digging a mine loses and reveals nothing else. Digging an already
    /// revealed cell is harmless: it is reported again but the revealed set
    /// does not change.
    ///
    /// # Panics
    ///
    /// When `coords` lies outside the board.
    pub fn dig(&mut self, coords: Coord2) -> Dig {
        self.assert_in_bounds(coords);

        self.revealed.insert(coords);
        let mut revealed = vec![coords];

        let value = self.layout[coords];
        let outcome = if value.is_mine() {
            DigOutcome::Loss
        } else {
            if value.is_zero() {
                self.cascade(coords, &mut revealed);
            }
            DigOutcome::Continue
        };

        log::debug!(
            "dig {coords:?}: {outcome:?}, {} cells reported",
            revealed.len()
        );
        Dig { outcome, revealed }
    }

    /// Same as [`Board::dig`], rejecting out of range coordinates instead of
    /// panicking.
    pub fn try_dig(&mut self, coords: Coord2) -> Result<Dig> {
        match self.validate_coords(coords) {
            Ok(coords) => Ok(self.dig(coords)),
            Err(err) => {
                log::warn!("rejected dig at {coords:?}: {err}");
                Err(err)
            }
        }
    }

    /// Whether every safe cell has been revealed. Mines never need to be
    /// touched to win.
    pub fn is_end_game(&self) -> bool {
        self.layout
            .cells()
            .all(|(coords, value)| value.is_mine() || self.revealed.contains(&coords))
    }

    /// Whether a mine has been dug.
    pub fn is_lost(&self) -> bool {
        self.revealed
            .iter()
            .any(|&coords| self.layout.contains_mine(coords))
    }

    /// Flood fill out of a zero cell. Checks the revealed set as it grows, so
    /// each cell is visited at most once and mines are never opened.
    fn cascade(&mut self, origin: Coord2, revealed: &mut Vec<Coord2>) {
        let mut to_visit = VecDeque::from([origin]);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.layout.iter_neighbors(visit_coords) {
                let value = self.layout[pos];
                if value.is_mine() || !self.revealed.insert(pos) {
                    continue;
                }

                log::trace!("cascade reveals {pos:?} ({value})");
                revealed.push(pos);
                if value.is_zero() {
                    to_visit.push_back(pos);
                }
            }
        }
    }

    fn assert_in_bounds(&self, coords: Coord2) {
        assert!(
            self.layout.in_bounds(coords),
            "coordinates {coords:?} outside of {:?} board",
            self.size()
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use rand::prelude::*;

    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::with_layout(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn as_set(coords: &[Coord2]) -> BTreeSet<Coord2> {
        coords.iter().copied().collect()
    }

    #[test]
    fn empty_board_cascades_from_corner() {
        let mut board = board((3, 3), &[]);
        assert!(board.layout().cells().all(|(_, value)| value == CellValue::Count(0)));

        let dig = board.dig((0, 0));

        assert_eq!(dig.outcome, DigOutcome::Continue);
        assert_eq!(dig.revealed.len(), 9);
        assert_eq!(dig.revealed[0], (0, 0));
        assert_eq!(board.revealed_count(), 9);
        assert!(board.is_end_game());
    }

    #[test]
    fn two_by_one_with_single_mine() {
        let mut board = board((2, 1), &[(0, 0)]);
        assert_eq!(board.cell((0, 0)), CellValue::Mine);
        assert_eq!(board.cell((1, 0)), CellValue::Count(1));

        let dig = board.dig((1, 0));
        assert_eq!(dig.outcome, DigOutcome::Continue);
        assert_eq!(dig.revealed, [(1, 0)]);
        assert!(board.is_end_game());

        let dig = board.dig((0, 0));
        assert_eq!(dig.outcome, DigOutcome::Loss);
        assert_eq!(dig.revealed, [(0, 0)]);
        assert!(board.is_lost());
    }

    #[test]
    fn digging_mine_reveals_only_that_cell() {
        let mut board = board((3, 3), &[(1, 1)]);

        let dig = board.dig((1, 1));

        assert!(dig.is_loss());
        assert_eq!(dig.revealed, [(1, 1)]);
        assert_eq!(board.revealed().collect::<Vec<_>>(), [(1, 1)]);
        assert_eq!(board.view((1, 1)), CellView::Revealed(CellValue::Mine));
        assert!(!board.is_end_game());
    }

    #[test]
    fn digging_numbered_cell_does_not_cascade() {
        let mut board = board((3, 3), &[(0, 0)]);

        let dig = board.dig((1, 1));

        assert_eq!(dig.outcome, DigOutcome::Continue);
        assert_eq!(dig.revealed, [(1, 1)]);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.view((0, 1)), CellView::Hidden);
    }

    #[test]
    fn zero_region_stops_at_numbered_border() {
        //  0 0 0 0
        //  1 1 0 0
        //  * 1 0 0
        //  1 1 0 0
        let mut board = board((4, 4), &[(2, 0)]);

        let dig = board.dig((0, 3));

        assert_eq!(dig.outcome, DigOutcome::Continue);
        let expected: BTreeSet<Coord2> = board
            .layout()
            .cells()
            .filter(|&(coords, value)| !value.is_mine() && coords != (3, 0))
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(as_set(&dig.revealed), expected);
        assert_eq!(dig.revealed.len(), 14);
        // (3, 0) only touches numbered cells and the mine
        assert!(!board.is_revealed((3, 0)));
        assert!(!board.is_revealed((2, 0)));
        assert!(!board.is_end_game());

        let dig = board.dig((3, 0));
        assert_eq!(dig.revealed, [(3, 0)]);
        assert!(board.is_end_game());
    }

    #[test]
    fn cascade_leaves_separated_regions_hidden() {
        //  0 2 * 2 0
        //  0 3 * 3 0
        //  0 2 * 2 0
        let mut board = board((3, 5), &[(0, 2), (1, 2), (2, 2)]);

        let dig = board.dig((1, 0));

        assert_eq!(
            as_set(&dig.revealed),
            as_set(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)])
        );
        assert!(!board.is_revealed((1, 4)));
        assert!(!board.is_end_game());

        let dig = board.dig((1, 4));
        assert_eq!(dig.revealed.len(), 6);
        assert!(board.is_end_game());
        assert!(!board.is_lost());
    }

    #[test]
    fn redigging_never_duplicates() {
        let mut board = board((4, 4), &[(3, 3)]);

        let first = board.dig((0, 0));
        let count = board.revealed_count();
        let second = board.dig((0, 0));

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(second.revealed, [(0, 0)]);
        assert_eq!(board.revealed_count(), count);
        assert_eq!(as_set(&first.revealed).len(), first.revealed.len());
    }

    #[test]
    fn end_game_needs_every_safe_cell() {
        let mut board = board((1, 3), &[(0, 1)]);
        assert!(!board.is_end_game());

        let _ = board.dig((0, 0));
        assert!(!board.is_end_game());

        let _ = board.dig((0, 2));
        assert!(board.is_end_game());
        assert_eq!(board.revealed_count(), usize::from(board.safe_cell_count()));
    }

    #[test]
    fn try_dig_rejects_out_of_range() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.try_dig((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.try_cell((0, 2)), Err(GameError::InvalidCoords));
        assert_eq!(board.revealed_count(), 0);
        assert_eq!(board.try_dig((1, 1)).map(|dig| dig.outcome), Ok(DigOutcome::Continue));
    }

    #[test]
    #[should_panic(expected = "outside of")]
    fn dig_panics_out_of_range() {
        let mut board = board((2, 2), &[]);
        let _ = board.dig((0, 5));
    }

    #[test]
    fn random_zero_digs_never_open_mines() {
        let mut rng = SmallRng::seed_from_u64(99);

        for _ in 0..50 {
            let mut board = Board::new(GameConfig::CLASSIC, &mut rng);
            let Some((zero, _)) = board.layout().cells().find(|(_, value)| value.is_zero())
            else {
                continue;
            };

            let dig = board.dig(zero);

            assert_eq!(dig.outcome, DigOutcome::Continue);
            assert!(!board.is_lost());
            assert_eq!(as_set(&dig.revealed).len(), dig.revealed.len());
            // every revealed zero has all of its neighbors revealed
            for coords in board.revealed() {
                if board.cell(coords).is_zero() {
                    assert!(board.layout().iter_neighbors(coords).all(|pos| board.is_revealed(pos)));
                }
            }
        }
    }
}
