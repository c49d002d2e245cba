use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Interaction state of a single block, governs which actions are legal on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    Unrevealed,
    Revealed,
    Flagged,
}

impl BlockStatus {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Unrevealed)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for BlockStatus {
    fn default() -> Self {
        Self::Unrevealed
    }
}

/// One cell of the board.
///
/// `text` and `class` are presentation payload kept in sync with the status, the engine never reads them back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) mine: bool,
    pub(crate) status: BlockStatus,
    pub(crate) adjacent_mines: u8,
    pub(crate) text: String,
    pub(crate) class: String,
}

impl Block {
    pub(crate) fn new(text: String, class: String) -> Self {
        Self {
            mine: false,
            status: BlockStatus::Unrevealed,
            adjacent_mines: 0,
            text,
            class,
        }
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn status(&self) -> BlockStatus {
        self.status
    }

    /// Number of mines around this block, only known once it has been revealed.
    pub const fn adjacent_mines(&self) -> Option<u8> {
        match self.status {
            BlockStatus::Revealed if !self.mine => Some(self.adjacent_mines),
            _ => None,
        }
    }

    /// Whether this block is a mine the player is allowed to see.
    pub const fn visible_mine(&self) -> bool {
        self.mine && self.status.is_revealed()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn class(&self) -> &str {
        &self.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_block_exposes_nothing() {
        let mut block = Block::new("?".into(), "block".into());
        block.mine = true;

        assert_eq!(block.adjacent_mines(), None);
        assert!(!block.visible_mine());
    }

    #[test]
    fn revealed_safe_block_exposes_count() {
        let mut block = Block::new("?".into(), "block".into());
        block.status = BlockStatus::Revealed;
        block.adjacent_mines = 3;

        assert_eq!(block.adjacent_mines(), Some(3));
        assert!(!block.visible_mine());
    }
}
