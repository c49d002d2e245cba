use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Strategy that lays mines on an untouched board once the first action picks its safe block.
pub trait MineGenerator {
    /// Overwrites the mine flag of every block, `safe` always ends up mine-free. Returns the number of mines placed.
    fn place_mines(&mut self, board: &mut Board, safe: Coord2) -> CellCount;
}

/// Places a predetermined set of mines, used for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn place_mines(&mut self, board: &mut Board, safe: Coord2) -> CellCount {
        for (_, block) in board.iter_mut() {
            block.mine = false;
        }

        let mut placed = 0;
        for &coords in &self.mines {
            if coords == safe {
                log::debug!("Skipping mine at {:?}, it is the safe block", coords);
                continue;
            }
            match board.get_mut(coords) {
                Some(block) if !block.mine => {
                    block.mine = true;
                    placed += 1;
                }
                Some(_) => {}
                None => log::warn!("Mine {:?} is outside the board, ignored", coords),
            }
        }
        placed
    }
}
