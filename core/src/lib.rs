#![no_std]

//! Rules engine for a game of Minesweeper: board, lazy mine placement, flood-fill reveal, flagging and win/loss
//! detection. Rendering and input handling are left to the caller, which talks to [`Minesweeper`] in board
//! coordinates and observes [`Board`] and [`GameStatus`].

extern crate alloc;

pub use block::*;
pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use options::*;
pub use storage::*;
pub use types::*;

mod block;
mod board;
mod engine;
mod error;
mod generator;
mod options;
mod storage;
mod types;
