use alloc::vec::Vec;

use super::*;

/// Purely random placement driven by a borrowed [`RandomSource`].
#[derive(Debug)]
pub struct SamplingGenerator<'a, R: ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: RandomSource + ?Sized> SamplingGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: RandomSource + ?Sized> LayoutGenerator for SamplingGenerator<'_, R> {
    fn generate(self, config: GameConfig) -> MineLayout {
        MineLayout::from_mine_mask(plant_mines(config, self.rng))
    }
}

/// Random placement that is reproducible from a seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SeededGenerator {
    seed: u64,
}

impl SeededGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for SeededGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        SamplingGenerator::new(&mut rng).generate(config)
    }
}

/// Samples `config.mines()` distinct cells without replacement.
///
/// Each round draws a uniform index into the cells that are still free and
/// takes that cell out of the pool, so every placement is equally likely.
fn plant_mines<R: RandomSource + ?Sized>(config: GameConfig, rng: &mut R) -> Array2<bool> {
    let (rows, cols) = config.size();
    let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());

    let mut available: Vec<Coord2> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .collect();

    for _ in 0..config.mines() {
        // a valid config always leaves at least one cell free
        let index = rng.pick_index(available.len());
        let coords = available.remove(index);
        mines[coords.to_nd_index()] = true;
    }

    mines
}
