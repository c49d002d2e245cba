use rand::prelude::*;

use super::*;

/// Generation strategy that turns every block except the safe one into a mine with the same independent probability.
///
/// The total mine count is therefore not fixed, it only averages out to `probability * (cells - 1)`.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
    probability: f64,
}

impl RandomMineGenerator {
    /// `probability` must lie in `(0, 1)`, which `GameOptions::validate` guarantees.
    pub fn new(seed: u64, probability: f64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn from_options(options: &ValidOptions) -> Self {
        Self::new(options.seed(), options.mine_probability)
    }
}

impl MineGenerator for RandomMineGenerator {
    fn place_mines(&mut self, board: &mut Board, safe: Coord2) -> CellCount {
        let mut placed = 0;
        for (coords, block) in board.iter_mut() {
            block.mine = coords != safe && self.rng.random_bool(self.probability);
            if block.mine {
                placed += 1;
            }
        }
        placed
    }
}
