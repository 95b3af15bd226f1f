//! Turn log with full board snapshots.

use serde::{Deserialize, Serialize};

use crate::address::{Address, CELL_COUNT};
use crate::error::BoardError;
use crate::notation::Turn;
use crate::Piece;

/// Complete game state at one point in time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    /// Occupant of every cell, indexed by `Address::index()`.
    pub cells: [Option<Piece>; CELL_COUNT],
    /// Goats removed from play.
    pub captured: u8,
    /// Goats placed since the last clear, captured ones included.
    pub goats_placed: u8,
}

impl Snapshot {
    /// The cleared board.
    pub const EMPTY: Snapshot = Snapshot {
        cells: [None; CELL_COUNT],
        captured: 0,
        goats_placed: 0,
    };

    #[inline]
    pub fn piece_at(&self, addr: Address) -> Option<Piece> {
        self.cells[addr.index()]
    }

    /// Number of cells holding `piece`.
    pub fn count(&self, piece: Piece) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(piece)).count()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One successful turn and the state right after it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: Turn,
    pub snapshot: Snapshot,
}

impl HistoryEntry {
    /// Log text for this turn.
    pub fn notation(&self) -> String {
        self.turn.to_string()
    }
}

/// Append-only turn log. Undo truncates from the tail; there is no redo.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn push(&mut self, turn: Turn, snapshot: Snapshot) {
        self.entries.push(HistoryEntry { turn, snapshot });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Notation of every turn, oldest first.
    pub fn notations(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(HistoryEntry::notation)
    }

    /// Drop the last `n` entries and return the state from before them.
    ///
    /// Dropping every entry returns the cleared board. Asking for more than
    /// is recorded fails and leaves the log untouched.
    pub fn rewind(&mut self, n: usize) -> Result<Snapshot, BoardError> {
        let available = self.entries.len();
        if n > available {
            return Err(BoardError::NotEnoughHistory { requested: n, available });
        }

        let keep = available - n;
        let snapshot = match keep {
            0 => Snapshot::EMPTY,
            _ => self.entries[keep - 1].snapshot,
        };
        self.entries.truncate(keep);
        Ok(snapshot)
    }
}
