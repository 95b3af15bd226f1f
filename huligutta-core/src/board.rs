//! The game board: cell occupancy, counters, turn application and queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::BoardError;
use crate::history::{History, Snapshot};
use crate::notation::Turn;
use crate::piece::{self, Jump};
use crate::Piece;

/// Tigers in a full set.
pub const MAX_TIGERS: usize = 3;
/// Goats in a full set.
pub const MAX_GOATS: usize = 15;
/// Captures that win the game for the tigers.
pub const CAPTURES_TO_WIN: u8 = 5;

/// Which part of the game the piece counts put us in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PlacingTigers,
    PlacingGoats,
    Moving,
}

/// Finished game result.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// All three tigers are on the board and none can move.
    GoatsWin,
    /// Enough goats have been captured.
    TigersWin,
}

/// Owns every cell, the capture/placement counters and the turn history.
///
/// All mutations are all-or-nothing: a rejected turn returns an error and
/// leaves cells, counters and history exactly as they were.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Board {
    state: Snapshot,
    history: History,
}

impl Board {
    /// Create a cleared board.
    pub fn new() -> Board {
        Board::default()
    }

    /// Empty every cell, zero the counters and forget the history.
    pub fn clear(&mut self) {
        self.state = Snapshot::EMPTY;
        self.history.clear();
    }

    // ========== Cells ==========

    /// The piece on `addr`, if any.
    #[inline]
    pub fn piece_at(&self, addr: Address) -> Option<Piece> {
        self.state.piece_at(addr)
    }

    #[inline]
    pub fn is_empty(&self, addr: Address) -> bool {
        self.piece_at(addr).is_none()
    }

    /// Every cell with its occupant, in address index order.
    pub fn positions(&self) -> impl Iterator<Item = (Address, Option<Piece>)> + '_ {
        Address::all().map(move |addr| (addr, self.piece_at(addr)))
    }

    pub fn tiger_positions(&self) -> Vec<Address> {
        self.cells_holding(Some(Piece::Tiger))
    }

    pub fn goat_positions(&self) -> Vec<Address> {
        self.cells_holding(Some(Piece::Goat))
    }

    pub fn empty_positions(&self) -> Vec<Address> {
        self.cells_holding(None)
    }

    fn cells_holding(&self, occupant: Option<Piece>) -> Vec<Address> {
        self.positions()
            .filter(|&(_, cell)| cell == occupant)
            .map(|(addr, _)| addr)
            .collect()
    }

    /// Current state as a value.
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    // ========== Counters ==========

    pub fn tiger_count(&self) -> usize {
        self.state.count(Piece::Tiger)
    }

    pub fn goat_count(&self) -> usize {
        self.state.count(Piece::Goat)
    }

    /// Goats removed from play.
    pub fn num_captured(&self) -> u8 {
        self.state.captured
    }

    /// Goats placed since the last clear, including captured ones.
    pub fn goats_placed(&self) -> usize {
        self.state.goats_placed as usize
    }

    /// Latched once the fifteenth goat has been placed.
    pub fn is_placement_complete(&self) -> bool {
        self.goats_placed() >= MAX_GOATS
    }

    /// Turns that moved a piece already on the board.
    pub fn num_moves(&self) -> usize {
        self.history
            .entries()
            .iter()
            .filter(|entry| !entry.turn.is_placement())
            .count()
    }

    // ========== History ==========

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Notation of the most recent turn.
    pub fn last_move(&self) -> Option<String> {
        self.history.last().map(|entry| entry.notation())
    }

    // ========== Turns ==========

    /// Put a tiger on an empty cell.
    pub fn place_tiger(&mut self, at: Address) -> Result<Turn, BoardError> {
        self.apply(Turn::Place { piece: Piece::Tiger, at })
    }

    /// Put a goat on an empty cell.
    pub fn place_goat(&mut self, at: Address) -> Result<Turn, BoardError> {
        self.apply(Turn::Place { piece: Piece::Goat, at })
    }

    /// Move the piece on `from` to `to`.
    ///
    /// For a tiger, `to` may be a capture landing, in which case the jumped
    /// goat is removed. Returns the turn that was played.
    pub fn move_piece(&mut self, from: Address, to: Address) -> Result<Turn, BoardError> {
        let planned = match self.piece_at(from) {
            Some(piece) => piece.plan_move(self, from, to),
            None => Err(BoardError::Empty(from)),
        };

        match planned {
            Ok(turn) => self.apply(turn),
            Err(err) => {
                tracing::debug!(%from, %to, %err, "move rejected");
                Err(err)
            }
        }
    }

    /// Validate and play a turn, e.g. one parsed back from a game log.
    pub fn apply(&mut self, turn: Turn) -> Result<Turn, BoardError> {
        if let Err(err) = self.check(&turn) {
            tracing::debug!(%turn, %err, "turn rejected");
            return Err(err);
        }

        self.commit(turn);
        tracing::trace!(%turn, captured = self.state.captured, "turn played");
        Ok(turn)
    }

    /// Undo the last `n` turns.
    ///
    /// `n == 0` does nothing. Undoing more turns than were recorded fails
    /// with `NotEnoughHistory` and changes nothing. Undone turns cannot be
    /// redone.
    pub fn undo_move(&mut self, n: usize) -> Result<(), BoardError> {
        if n == 0 {
            return Ok(());
        }

        match self.history.rewind(n) {
            Ok(snapshot) => {
                self.state = snapshot;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(n, %err, "undo rejected");
                Err(err)
            }
        }
    }

    fn check(&self, turn: &Turn) -> Result<(), BoardError> {
        match *turn {
            Turn::Place { piece, at } => {
                match piece {
                    Piece::Tiger if self.tiger_count() >= MAX_TIGERS => {
                        return Err(BoardError::TigerLimit)
                    }
                    Piece::Goat if self.is_placement_complete() => {
                        return Err(BoardError::GoatLimit)
                    }
                    _ => {}
                }
                if !self.is_empty(at) {
                    return Err(BoardError::Occupied(at));
                }
                Ok(())
            }
            Turn::Step { from, to } => {
                if self.is_empty(from) {
                    return Err(BoardError::Empty(from));
                }
                if !from.is_adjacent(to) || !self.is_empty(to) {
                    return Err(BoardError::IllegalMove { from, to });
                }
                Ok(())
            }
            Turn::Capture { from, captured, to } => {
                match self.piece_at(from) {
                    None => return Err(BoardError::Empty(from)),
                    Some(Piece::Goat) => return Err(BoardError::IllegalMove { from, to }),
                    Some(Piece::Tiger) => {}
                }
                let consistent = self.piece_at(captured) == Some(Piece::Goat)
                    && piece::landing_for(self, from, captured) == Some(to);
                if !consistent {
                    return Err(BoardError::IllegalMove { from, to });
                }
                Ok(())
            }
        }
    }

    fn commit(&mut self, turn: Turn) {
        let cells = &mut self.state.cells;
        match turn {
            Turn::Place { piece, at } => {
                cells[at.index()] = Some(piece);
                if piece == Piece::Goat {
                    self.state.goats_placed += 1;
                }
            }
            Turn::Step { from, to } => {
                cells[to.index()] = cells[from.index()].take();
            }
            Turn::Capture { from, captured, to } => {
                cells[from.index()] = None;
                cells[captured.index()] = None;
                cells[to.index()] = Some(Piece::Tiger);
                self.state.captured += 1;
            }
        }
        self.history.push(turn, self.state);
    }

    // ========== Move Queries ==========

    /// Cells the piece on `addr` can reach. Empty when `addr` is empty.
    pub fn valid_moves(&self, addr: Address) -> Vec<Address> {
        self.piece_at(addr)
            .map(|piece| piece.valid_moves(self, addr))
            .unwrap_or_default()
    }

    /// Capture landings for the piece on `addr`. Empty unless it is a tiger.
    pub fn capturing_moves(&self, addr: Address) -> Vec<Address> {
        self.piece_at(addr)
            .map(|piece| piece.capturing_moves(self, addr))
            .unwrap_or_default()
    }

    /// Every `(from, to)` any tiger can play, captures included. Placement
    /// is not a move.
    pub fn tiger_possible_moves(&self) -> Vec<(Address, Address)> {
        self.possible_moves(Piece::Tiger)
    }

    /// Every `(from, to)` any goat can play.
    pub fn goat_possible_moves(&self) -> Vec<(Address, Address)> {
        self.possible_moves(Piece::Goat)
    }

    fn possible_moves(&self, piece: Piece) -> Vec<(Address, Address)> {
        self.cells_holding(Some(piece))
            .into_iter()
            .flat_map(|from| {
                piece
                    .valid_moves(self, from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Every capture any tiger can make right now.
    pub fn tiger_capturing_moves(&self) -> Vec<Jump> {
        self.tiger_positions()
            .into_iter()
            .flat_map(|tiger| piece::jumps(self, tiger))
            .collect()
    }

    /// Whether a goat on `addr` would be out of reach of every tiger.
    ///
    /// Checked whether or not a goat stands there, so it can vet a
    /// placement or a destination before playing it.
    pub fn is_square_safe(&self, addr: Address) -> bool {
        self.tiger_positions()
            .into_iter()
            .all(|tiger| piece::landing_for(self, tiger, addr).is_none())
    }

    /// Whether a piece on `addr` would stand next to a tiger and so take
    /// away one of its steps.
    pub fn is_square_blocking(&self, addr: Address) -> bool {
        self.tiger_positions()
            .into_iter()
            .any(|tiger| tiger.is_adjacent(addr))
    }

    // ========== Game Status ==========

    pub fn phase(&self) -> Phase {
        if self.tiger_count() < MAX_TIGERS {
            Phase::PlacingTigers
        } else if !self.is_placement_complete() {
            Phase::PlacingGoats
        } else {
            Phase::Moving
        }
    }

    /// The result, if the game is over.
    ///
    /// Captures are checked first: the move that takes the fifth goat wins
    /// for the tigers even if it also leaves them boxed in.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.num_captured() >= CAPTURES_TO_WIN {
            Some(Outcome::TigersWin)
        } else if self.tiger_count() == MAX_TIGERS && self.tiger_possible_moves().is_empty() {
            Some(Outcome::GoatsWin)
        } else {
            None
        }
    }
}

/// Text picture of the board: `X` tiger, `O` goat, `-` empty.
///
/// ```text
///       -
/// -  -  -  -  -  -
/// -  -  -  -  -  -
/// -  -  -  -  -  -
///    -  -  -  -
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |col: i8, row: i8| -> char {
            Address::from_col_row(col, row)
                .and_then(|addr| self.piece_at(addr))
                .map_or('-', Piece::symbol)
        };

        writeln!(f, "      {}", cell(1, 0))?;
        for row in 1..=4 {
            let line: Vec<String> = (0..6)
                .map(|col| match Address::from_col_row(col, row) {
                    Some(_) => cell(col, row).to_string(),
                    None => " ".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }
}
