use crate::*;
pub use random::*;

mod random;

/// Source of uniform randomness used to place mines.
///
/// Every [`rand::Rng`] is a `RandomSource`; tests can plug in scripted
/// sources to pin a layout down.
pub trait RandomSource {
    /// Uniformly picks an index in `0..upper`, `upper` is never zero.
    fn pick_index(&mut self, upper: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn pick_index(&mut self, upper: usize) -> usize {
        self.random_range(0..upper)
    }
}

/// Strategy producing the mine layout of a fresh board.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}
