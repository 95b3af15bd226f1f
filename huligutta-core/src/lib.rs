//! Huligutta (Goats and Tigers) rules engine.
//!
//! # Board
//!
//! 23 cells on an irregular graph (see [`address`] for the layout). Three
//! tigers move along the lines and capture by jumping an adjacent goat into
//! the empty cell directly behind it. Up to fifteen goats are placed one at a
//! time and then moved, trying to leave the tigers without a legal move.
//!
//! # Phases
//!
//! ```text
//! PlacingTigers  fewer than 3 tigers on the board
//! PlacingGoats   3 tigers, fewer than 15 goats placed so far
//! Moving         everything placed
//! ```
//!
//! Phases are derived from the piece counts on demand; nothing stores them.
//! The tigers win after five captures, the goats win when the three tigers
//! have no move left.
//!
//! # Undo
//!
//! Every successful turn appends its notation and a full copy of the board
//! to the history, so undoing `n` turns is a snapshot restore followed by a
//! truncation.

use serde::{Deserialize, Serialize};

pub mod address;
pub mod board;
pub mod error;
pub mod history;
pub mod notation;
pub mod piece;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use address::{Address, CELL_COUNT};
pub use board::{Board, Outcome, Phase, CAPTURES_TO_WIN, MAX_GOATS, MAX_TIGERS};
pub use error::{AddressError, BoardError, NotationError};
pub use history::{History, HistoryEntry, Snapshot};
pub use notation::Turn;
pub use piece::Jump;

/// The two kinds of piece. An empty cell is `None` wherever a cell's
/// occupant is an `Option<Piece>`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    Goat,
    Tiger,
}

impl Piece {
    /// Character used when printing the board.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Piece::Goat => 'O',
            Piece::Tiger => 'X',
        }
    }
}
