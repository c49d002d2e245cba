use core::ops::{Index, IndexMut};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::*;

/// Row-major grid of blocks, dimensions are fixed once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    blocks: Array2<Block>,
}

impl Board {
    pub(crate) fn new(options: &ValidOptions) -> Self {
        let (width, height) = options.size();
        Self {
            blocks: Array2::from_shape_fn((usize::from(height), usize::from(width)), |_| {
                options.unrevealed_block()
            }),
        }
    }

    /// `(width, height)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.blocks.dim();
        (
            cols.try_into().unwrap_or(Coord::MAX),
            rows.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.size();
        x < width && y < height
    }

    /// Looks up a block, `None` when `coords` falls outside the grid.
    pub fn get(&self, coords: Coord2) -> Option<&Block> {
        self.blocks.get(coords.to_nd_index())
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Option<&mut Block> {
        self.blocks.get_mut(coords.to_nd_index())
    }

    /// Marks or clears a mine, for [`MineGenerator`] implementations. Returns `false` when `coords` is off the board.
    pub fn set_mine(&mut self, coords: Coord2, mine: bool) -> bool {
        match self.get_mut(coords) {
            Some(block) => {
                block.mine = mine;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Block>> {
        self.blocks.rows().into_iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Block)> {
        self.blocks
            .indexed_iter()
            .map(|((y, x), block)| ((x as Coord, y as Coord), block))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (Coord2, &mut Block)> {
        self.blocks
            .indexed_iter_mut()
            .map(|((y, x), block)| ((x as Coord, y as Coord), block))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].mine)
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    /// True while no block has ever been revealed or flagged, mines are only placed after that.
    pub fn is_untouched(&self) -> bool {
        self.blocks.iter().all(|block| block.status.is_unrevealed())
    }

    /// Won once every safe block is revealed, or once exactly the mines are flagged.
    pub fn is_won(&self) -> bool {
        let mut safe_all_revealed = true;
        let mut safe_any_flagged = false;
        let mut mines_all_flagged = true;

        for block in self.blocks.iter() {
            match (block.mine, block.status) {
                (true, BlockStatus::Flagged) => {}
                (true, _) => mines_all_flagged = false,
                (false, BlockStatus::Revealed) => {}
                (false, BlockStatus::Flagged) => {
                    safe_all_revealed = false;
                    safe_any_flagged = true;
                }
                (false, BlockStatus::Unrevealed) => safe_all_revealed = false,
            }
        }

        safe_all_revealed || (mines_all_flagged && !safe_any_flagged)
    }

    pub fn mine_count(&self) -> CellCount {
        self.count(|block| block.mine)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count(|block| block.status.is_flagged())
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count(|block| block.status.is_revealed())
    }

    fn count(&self, predicate: impl Fn(&Block) -> bool) -> CellCount {
        self.blocks
            .iter()
            .filter(|block| predicate(block))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

impl Index<Coord2> for Board {
    type Output = Block;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.blocks[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.blocks[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(width: Coord, height: Coord) -> ValidOptions {
        GameOptions {
            width,
            height,
            ..Default::default()
        }
        .validated()
        .unwrap()
    }

    #[test]
    fn new_board_is_untouched_and_mine_free() {
        let board = Board::new(&options(5, 3));

        assert_eq!(board.size(), (5, 3));
        assert_eq!(board.total_cells(), 15);
        assert_eq!(board.rows().count(), 3);
        assert!(board.is_untouched());
        assert_eq!(board.mine_count(), 0);
        assert!(board.iter().all(|(_, block)| block.text() == "❓"));
    }

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let board = Board::new(&options(2, 2));

        assert!(board.get((1, 1)).is_some());
        assert!(board.get((2, 0)).is_none());
        assert!(board.get((0, 2)).is_none());
        assert!(!board.contains((2, 2)));
    }

    #[test]
    fn set_mine_rejects_off_board_coordinates() {
        let mut board = Board::new(&options(2, 2));

        assert!(board.set_mine((1, 0), true));
        assert!(!board.set_mine((2, 0), true));
        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn iter_yields_xy_coordinates() {
        let board = Board::new(&options(3, 2));
        let last = board.iter().last().map(|(coords, _)| coords);

        assert_eq!(last, Some((2, 1)));
    }

    #[test]
    fn adjacent_count_ignores_the_cell_itself() {
        let mut board = Board::new(&options(3, 3));
        board[(1, 1)].mine = true;
        board[(0, 0)].mine = true;

        assert_eq!(board.adjacent_mine_count((1, 1)), 1);
        assert_eq!(board.adjacent_mine_count((1, 0)), 2);
        assert_eq!(board.adjacent_mine_count((2, 2)), 1);
    }

    #[test]
    fn won_when_all_safe_blocks_revealed_regardless_of_flags() {
        let mut board = Board::new(&options(2, 1));
        board[(0, 0)].mine = true;
        board[(1, 0)].status = BlockStatus::Revealed;

        assert!(board.is_won());
        board[(0, 0)].status = BlockStatus::Flagged;
        assert!(board.is_won());
    }

    #[test]
    fn won_when_exactly_the_mines_are_flagged() {
        let mut board = Board::new(&options(3, 1));
        board[(0, 0)].mine = true;
        assert!(!board.is_won());

        board[(0, 0)].status = BlockStatus::Flagged;
        assert!(board.is_won());

        board[(2, 0)].status = BlockStatus::Flagged;
        assert!(!board.is_won());
    }

    #[test]
    fn flagging_marks_board_as_touched() {
        let mut board = Board::new(&options(2, 2));
        board[(0, 1)].status = BlockStatus::Flagged;

        assert!(!board.is_untouched());
        assert_eq!(board.flag_count(), 1);
    }
}
