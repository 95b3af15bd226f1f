//! Per-piece movement rules.
//!
//! Goats step to an adjacent empty cell. Tigers step the same way or jump:
//! an adjacent goat is captured when the cell two steps away, on the same
//! line, is on the board, empty and not a corner.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::board::Board;
use crate::error::BoardError;
use crate::notation::Turn;
use crate::Piece;

/// A capture available to a tiger.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Jump {
    /// Where the tiger stands.
    pub tiger: Address,
    /// The goat that would be removed.
    pub goat: Address,
    /// Where the tiger ends up.
    pub landing: Address,
}

impl From<Jump> for Turn {
    fn from(jump: Jump) -> Turn {
        Turn::Capture {
            from: jump.tiger,
            captured: jump.goat,
            to: jump.landing,
        }
    }
}

impl Piece {
    /// Every cell a piece of this kind standing on `from` can reach this turn.
    pub fn valid_moves(self, board: &Board, from: Address) -> Vec<Address> {
        let mut moves = step_targets(board, from);
        if self == Piece::Tiger {
            moves.extend(jumps(board, from).into_iter().map(|jump| jump.landing));
        }
        moves
    }

    /// Landing cells of every capture open to this piece. Always empty for
    /// goats.
    pub fn capturing_moves(self, board: &Board, from: Address) -> Vec<Address> {
        match self {
            Piece::Goat => Vec::new(),
            Piece::Tiger => jumps(board, from).into_iter().map(|jump| jump.landing).collect(),
        }
    }

    /// Work out which turn moving this piece from `from` to `to` would be.
    ///
    /// A tiger prefers a capture landing on `to` over a plain step. Nothing
    /// is mutated; the returned turn still goes through `Board::apply`.
    pub fn plan_move(self, board: &Board, from: Address, to: Address) -> Result<Turn, BoardError> {
        if self == Piece::Tiger {
            if let Some(jump) = jumps(board, from).into_iter().find(|jump| jump.landing == to) {
                return Ok(jump.into());
            }
        }

        if from.is_adjacent(to) && board.is_empty(to) {
            Ok(Turn::Step { from, to })
        } else {
            Err(BoardError::IllegalMove { from, to })
        }
    }
}

/// Adjacent empty cells.
pub fn step_targets(board: &Board, from: Address) -> Vec<Address> {
    from.adjacent().filter(|&to| board.is_empty(to)).collect()
}

/// Captures available to a tiger standing on `tiger`.
pub fn jumps(board: &Board, tiger: Address) -> Vec<Jump> {
    tiger
        .adjacent()
        .filter(|&goat| board.piece_at(goat) == Some(Piece::Goat))
        .filter_map(|goat| {
            landing_for(board, tiger, goat).map(|landing| Jump { tiger, goat, landing })
        })
        .collect()
}

/// Landing cell for a tiger on `tiger` jumping whatever stands on `goat`.
///
/// Only geometry and the landing cell are checked, so this also answers
/// "could a goat placed here be taken".
pub fn landing_for(board: &Board, tiger: Address, goat: Address) -> Option<Address> {
    if !tiger.is_adjacent(goat) {
        return None;
    }

    let landing = tiger.step_toward(goat, 2).ok()??;
    if landing.is_corner() || !board.is_empty(landing) {
        return None;
    }

    // rules out bends through the origin
    match tiger.displacement(landing) {
        (0, 2) | (0, -2) | (2, 0) | (-2, 0) => Some(landing),
        _ => None,
    }
}
