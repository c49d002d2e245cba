use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// What a single action did to the game, lets the presentation layer skip redraws.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    NoChange,
    Changed,
    Won,
    Lost,
}

impl Outcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Minesweeper rules engine, owns the board and the game status.
///
/// Every mutating call runs to completion, writes the new state through to `storage` and only then fires the
/// terminal hooks.
pub struct Minesweeper<S: Storage = MemoryStorage> {
    options: ValidOptions,
    board: Board,
    status: GameStatus,
    generator: Box<dyn MineGenerator>,
    hooks: GameHooks,
    storage: S,
    revision: u64,
}

impl<S: Storage> Minesweeper<S> {
    /// Validates `options` and restores the previous session from `storage` when there is one.
    pub fn new(options: GameOptions, hooks: GameHooks, storage: S) -> Result<Self> {
        let options = options.validated()?;
        let generator = RandomMineGenerator::from_options(&options);
        Ok(Self::with_generator(options, hooks, storage, generator))
    }

    pub fn with_generator(
        options: ValidOptions,
        hooks: GameHooks,
        storage: S,
        generator: impl MineGenerator + 'static,
    ) -> Self {
        let (board, status) = restore(&options, &storage);
        Self {
            options,
            board,
            status,
            generator: Box::new(generator),
            hooks,
            storage,
            revision: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn options(&self) -> &ValidOptions {
        &self.options
    }

    pub fn block(&self, x: Coord, y: Coord) -> Option<&Block> {
        self.board.get((x, y))
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Bumped on every state change, for observers that poll.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mines on the board, zero until the first action places them.
    pub fn mine_count(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.board.flag_count()
    }

    pub fn mines_left(&self) -> i64 {
        i64::from(self.board.mine_count()) - i64::from(self.board.flag_count())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn reveal(&mut self, x: Coord, y: Coord) -> Outcome {
        let coords = (x, y);
        if !self.status.is_playing() {
            log::trace!("Ignoring reveal at {:?}, game is {:?}", coords, self.status);
            return Outcome::NoChange;
        }
        if !self.board.get(coords).is_some_and(|block| block.status.is_unrevealed()) {
            log::trace!("Ignoring reveal at {:?}", coords);
            return Outcome::NoChange;
        }

        self.ensure_mines(coords);

        let outcome = if self.board[coords].mine {
            self.explode()
        } else {
            self.flood_reveal(coords);
            self.evaluate()
        };
        self.commit(outcome)
    }

    pub fn toggle_flag(&mut self, x: Coord, y: Coord) -> Outcome {
        let coords = (x, y);
        if !self.status.is_playing() {
            log::trace!("Ignoring flag at {:?}, game is {:?}", coords, self.status);
            return Outcome::NoChange;
        }
        if !self.board.get(coords).is_some_and(|block| !block.status.is_revealed()) {
            log::trace!("Ignoring flag at {:?}", coords);
            return Outcome::NoChange;
        }

        self.ensure_mines(coords);

        let (status, (text, class)) = match self.board[coords].status {
            BlockStatus::Flagged => (
                BlockStatus::Unrevealed,
                self.options.unrevealed_presentation(),
            ),
            _ => (BlockStatus::Flagged, self.options.flag_presentation()),
        };
        let block = &mut self.board[coords];
        block.status = status;
        block.text = text;
        block.class = class;

        let outcome = self.evaluate();
        self.commit(outcome)
    }

    /// Starts over with an untouched board of the same size, allowed in any state.
    pub fn reset(&mut self) -> Outcome {
        log::debug!("Resetting {}x{} board", self.options.width, self.options.height);
        self.board = Board::new(&self.options);
        self.status = GameStatus::Playing;
        self.commit(Outcome::Changed)
    }

    fn ensure_mines(&mut self, safe: Coord2) {
        if !self.board.is_untouched() {
            return;
        }
        let placed = self.generator.place_mines(&mut self.board, safe);
        log::debug!("Placed {} mines, safe block {:?}", placed, safe);
    }

    /// Breadth-first reveal starting at `start`, zero blocks push their unrevealed neighbors to the frontier.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut frontier = VecDeque::from([start]);
        let mut revealed = 0;

        while let Some(coords) = frontier.pop_front() {
            // a block can sit in the frontier twice when two zero neighbors saw it
            if self.board[coords].status.is_revealed() {
                continue;
            }

            let adjacent_mines = self.board.adjacent_mine_count(coords);
            let (text, class) = self.options.number_presentation(adjacent_mines);
            let block = &mut self.board[coords];
            block.status = BlockStatus::Revealed;
            block.adjacent_mines = adjacent_mines;
            block.text = text;
            block.class = class;
            revealed += 1;

            if adjacent_mines == 0 {
                let board = &self.board;
                frontier.extend(
                    board
                        .iter_neighbors(coords)
                        .filter(|&pos| board[pos].status.is_unrevealed()),
                );
            }
        }

        log::trace!("Revealed {} blocks from {:?}", revealed, start);
    }

    /// Reveals every mine, leaves the safe blocks as they are.
    fn explode(&mut self) -> Outcome {
        let (text, class) = self.options.boom_presentation();
        for (_, block) in self.board.iter_mut().filter(|(_, block)| block.mine) {
            block.status = BlockStatus::Revealed;
            block.text = text.clone();
            block.class = class.clone();
        }
        self.status = GameStatus::Lost;
        log::info!("Mine hit, game lost");
        Outcome::Lost
    }

    fn evaluate(&mut self) -> Outcome {
        if !self.status.is_playing() {
            return Outcome::Changed;
        }
        if self.board.is_won() {
            self.status = GameStatus::Won;
            log::info!("Board solved, game won");
            Outcome::Won
        } else {
            Outcome::Changed
        }
    }

    fn commit(&mut self, outcome: Outcome) -> Outcome {
        if outcome.has_update() {
            self.revision += 1;
            self.persist();
        }
        match outcome {
            Outcome::Won => self.hooks.won(),
            Outcome::Lost => self.hooks.lost(),
            Outcome::NoChange | Outcome::Changed => {}
        }
        outcome
    }

    fn persist(&mut self) {
        let board_key = self.options.board_key();
        let status_key = self.options.status_key();
        let result = save(&mut self.storage, &board_key, &self.board)
            .and_then(|()| save(&mut self.storage, &status_key, &self.status));
        if let Err(err) = result {
            log::error!("Could not save game to storage: {err}");
        }
    }
}

impl<S: Storage + fmt::Debug> fmt::Debug for Minesweeper<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Minesweeper")
            .field("options", &self.options)
            .field("board", &self.board)
            .field("status", &self.status)
            .field("storage", &self.storage)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Picks up the persisted session, or a fresh board when there is none that fits `options`.
fn restore(options: &ValidOptions, storage: &impl Storage) -> (Board, GameStatus) {
    let fresh = || (Board::new(options), GameStatus::Playing);

    match try_load::<Board>(storage, &options.board_key()) {
        Ok(Some(board)) if board.size() == options.size() => {
            let status = load_or(storage, &options.status_key(), GameStatus::Playing);
            log::debug!("Restored {:?} game from {}", status, options.board_key());
            (board, status)
        }
        Ok(Some(board)) => {
            log::warn!(
                "Stored board is {:?} but options ask for {:?}, starting over",
                board.size(),
                options.size()
            );
            fresh()
        }
        Ok(None) => fresh(),
        Err(err) => {
            log::warn!("{err}, starting over");
            fresh()
        }
    }
}
