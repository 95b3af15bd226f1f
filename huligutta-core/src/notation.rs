//! Turn values and their text notation.
//!
//! ```text
//! Tb1                 place a tiger on b1
//! Gc3                 place a goat on c3
//! b1,<TAB>b2          move the piece on b1 to b2
//! b1,<TAB>xc1,<TAB>d1 tiger on b1 jumps the goat on c1 and lands on d1
//! ```
//!
//! This text is what ends up in game logs, so `Display` must keep producing
//! exactly these shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::NotationError;
use crate::Piece;

/// A single successful placement or move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// A new piece enters the board.
    Place { piece: Piece, at: Address },
    /// A piece slides to an adjacent empty cell.
    Step { from: Address, to: Address },
    /// A tiger jumps a goat, removing it.
    Capture { from: Address, captured: Address, to: Address },
}

impl Turn {
    /// Cell the moving or entering piece ends on.
    #[inline]
    pub fn to(&self) -> Address {
        match *self {
            Turn::Place { at, .. } => at,
            Turn::Step { to, .. } | Turn::Capture { to, .. } => to,
        }
    }

    /// Cell the piece left, or `None` for a placement.
    #[inline]
    pub fn source(&self) -> Option<Address> {
        match *self {
            Turn::Place { .. } => None,
            Turn::Step { from, .. } | Turn::Capture { from, .. } => Some(from),
        }
    }

    #[inline]
    pub fn is_placement(&self) -> bool {
        matches!(self, Turn::Place { .. })
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self, Turn::Capture { .. })
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Place { piece: Piece::Tiger, at } => write!(f, "T{at}"),
            Turn::Place { piece: Piece::Goat, at } => write!(f, "G{at}"),
            Turn::Step { from, to } => write!(f, "{from},\t{to}"),
            Turn::Capture { from, captured, to } => write!(f, "{from},\tx{captured},\t{to}"),
        }
    }
}

impl FromStr for Turn {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let unrecognized = || NotationError::Unrecognized(s.to_string());

        if let Some(rest) = text.strip_prefix('T') {
            return Ok(Turn::Place { piece: Piece::Tiger, at: rest.parse()? });
        }
        if let Some(rest) = text.strip_prefix('G') {
            return Ok(Turn::Place { piece: Piece::Goat, at: rest.parse()? });
        }

        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [from, to] => Ok(Turn::Step {
                from: from.parse()?,
                to: to.parse()?,
            }),
            [from, captured, to] => {
                let captured = captured.strip_prefix('x').ok_or_else(unrecognized)?;
                Ok(Turn::Capture {
                    from: from.parse()?,
                    captured: captured.parse()?,
                    to: to.parse()?,
                })
            }
            _ => Err(unrecognized()),
        }
    }
}
