//! Board addresses and the adjacency topology.
//!
//! # Layout
//!
//! ```text
//!              b0                  (origin: b0 = c0 = d0 = e0)
//!   a1    b1    c1    d1    e1    f1
//!   a2    b2    c2    d2    e2    f2
//!   a3    b3    c3    d3    e3    f3
//!         b4    c4    d4    e4
//! ```
//!
//! Columns a-f map to indices 0-5, rows to 0-4. The origin has no column of
//! its own; it always normalizes to `(1, 0)` and is adjacent to b1, c1, d1
//! and e1.
//!
//! # Cell indices
//!
//! ```text
//!   a1=0  a2=1  a3=2
//!   b0=3  b1=4  b2=5  b3=6  b4=7
//!   c1=8  c2=9  c3=10 c4=11
//!   d1=12 d2=13 d3=14 d4=15
//!   e1=16 e2=17 e3=18 e4=19
//!   f1=20 f2=21 f3=22
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Number of distinct cells on the board.
pub const CELL_COUNT: usize = 23;

/// Column letters, index = column.
const LETTERS: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];

/// `(col, row)` for every cell index.
#[rustfmt::skip]
const COORDS: [(u8, u8); CELL_COUNT] = [
    (0, 1), (0, 2), (0, 3),
    (1, 0), (1, 1), (1, 2), (1, 3), (1, 4),
    (2, 1), (2, 2), (2, 3), (2, 4),
    (3, 1), (3, 2), (3, 3), (3, 4),
    (4, 1), (4, 2), (4, 3), (4, 4),
    (5, 1), (5, 2), (5, 3),
];

/// One of the 23 board cells.
///
/// Always valid once constructed. Equality and hashing use the canonical
/// cell, so `c0` and `e0` compare equal to `b0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(u8);

impl Address {
    /// The shared row-0 cell.
    pub const ORIGIN: Address = Address(3);

    /// Build an address from column (0-5) and row (0-4) indices.
    ///
    /// Any column in b-e with row 0 yields the origin. Returns `None` for
    /// coordinates that are not on the board.
    pub fn from_col_row(col: i8, row: i8) -> Option<Address> {
        match (col, row) {
            (0 | 5, 1..=3) => Some(Address(Self::index_of(col as u8, row as u8))),
            (1..=4, 0) => Some(Self::ORIGIN),
            (1..=4, 1..=4) => Some(Address(Self::index_of(col as u8, row as u8))),
            _ => None,
        }
    }

    /// Cell index for coordinates already known to be valid and not row 0.
    const fn index_of(col: u8, row: u8) -> u8 {
        match col {
            0 => row - 1,
            1 => 3 + row,
            5 => 20 + row - 1,
            _ => 8 + (col - 2) * 4 + row - 1,
        }
    }

    /// Build an address from its dense index (0-22).
    #[inline]
    pub fn from_index(idx: usize) -> Option<Address> {
        if idx < CELL_COUNT {
            Some(Address(idx as u8))
        } else {
            None
        }
    }

    /// Dense index (0-22) used for board storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Column index (0-5). The origin reports column 1.
    #[inline]
    pub fn col(self) -> i8 {
        COORDS[self.index()].0 as i8
    }

    /// Row index (0-4).
    #[inline]
    pub fn row(self) -> i8 {
        COORDS[self.index()].1 as i8
    }

    /// Normalized `(col, row)` coordinates.
    #[inline]
    pub fn to_coordinates(self) -> (i8, i8) {
        (self.col(), self.row())
    }

    #[inline]
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }

    /// Iterate over all 23 cells in index order.
    pub fn all() -> impl Iterator<Item = Address> {
        (0..CELL_COUNT).filter_map(Address::from_index)
    }

    /// Displacement `(dcol, drow)` from `self` to `to`.
    ///
    /// Row 0 has no single column, so the column difference is dropped when
    /// exactly one end is the origin and both columns are in b-e. Two origin
    /// ends give `(0, 0)`.
    pub fn displacement(self, to: Address) -> (i8, i8) {
        let (x1, y1) = self.to_coordinates();
        let (x2, y2) = to.to_coordinates();

        if y1 == 0 && y2 == 0 {
            return (0, 0);
        }

        let inner = |x: i8| (1..=4).contains(&x);
        if inner(x1) && inner(x2) && (y1 == 0 || y2 == 0) {
            return (0, y2 - y1);
        }

        (x2 - x1, y2 - y1)
    }

    /// Whether `self` and `other` are joined by a line on the board.
    pub fn is_adjacent(self, other: Address) -> bool {
        let (dx, dy) = self.displacement(other);
        dx.abs() + dy.abs() == 1
    }

    /// All cells adjacent to this one.
    pub fn adjacent(self) -> impl Iterator<Item = Address> {
        Address::all().filter(move |&other| self.is_adjacent(other))
    }

    /// Walk `steps` cells from `self` toward `to` along their shared row or
    /// column.
    ///
    /// Returns `Ok(None)` when the destination falls off the board, and
    /// `Err(AddressError::NotInLine)` when the two cells share neither a row
    /// nor a column. Leaving the origin takes the column of `to`; arriving in
    /// row 0 lands on the origin.
    pub fn step_toward(self, to: Address, steps: u8) -> Result<Option<Address>, AddressError> {
        let (dx, dy) = self.displacement(to);
        if dx != 0 && dy != 0 {
            return Err(AddressError::NotInLine { from: self, to });
        }

        if steps == 0 {
            return Ok(Some(self));
        }

        let steps = i16::from(steps);
        let col = if self.is_origin() {
            i16::from(to.col())
        } else {
            i16::from(self.col()) + i16::from(dx.signum()) * steps
        };
        let row = i16::from(self.row()) + i16::from(dy.signum()) * steps;

        match (i8::try_from(col), i8::try_from(row)) {
            (Ok(col), Ok(row)) => Ok(Address::from_col_row(col, row)),
            _ => Ok(None),
        }
    }

    /// Corner cells: a capture can never land here.
    pub fn is_corner(self) -> bool {
        const CORNERS: [Address; 7] = [
            Address(0),  // a1
            Address(2),  // a3
            Address(3),  // b0 (c0, d0, e0)
            Address(7),  // b4
            Address(19), // e4
            Address(20), // f1
            Address(22), // f3
        ];
        CORNERS.contains(&self)
    }
}

/// Whether `text` names a cell on the board.
pub fn is_valid(text: &str) -> bool {
    text.parse::<Address>().is_ok()
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::Invalid(s.to_string());

        let mut chars = s.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let letter = letter.to_ascii_lowercase();
        let col = LETTERS.iter().position(|&c| c == letter).ok_or_else(invalid)?;
        let row = digit.to_digit(10).ok_or_else(invalid)?;
        if row > 4 {
            return Err(invalid());
        }

        Address::from_col_row(col as i8, row as i8).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> String {
        addr.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (col, row) = COORDS[self.index()];
        write!(f, "{}{}", LETTERS[col as usize], row)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_all_cells_round_trip_text() {
        let names: Vec<String> = Address::all().map(|a| a.to_string()).collect();
        assert_eq!(
            names,
            [
                "a1", "a2", "a3", "b0", "b1", "b2", "b3", "b4", "c1", "c2", "c3", "c4", "d1",
                "d2", "d3", "d4", "e1", "e2", "e3", "e4", "f1", "f2", "f3",
            ]
        );
        for a in Address::all() {
            assert_eq!(addr(&a.to_string()), a);
        }
    }

    #[test]
    fn test_index_matches_coordinates() {
        for (idx, a) in Address::all().enumerate() {
            assert_eq!(a.index(), idx);
            assert_eq!(Address::from_col_row(a.col(), a.row()), Some(a));
        }
        assert_eq!(Address::from_index(CELL_COUNT), None);
    }

    #[test]
    fn test_origin_aliases() {
        for alias in ["b0", "c0", "d0", "e0", "C0", "E0"] {
            assert_eq!(addr(alias), Address::ORIGIN);
        }
        assert_eq!(addr("d0").to_coordinates(), (1, 0));
        assert_eq!(Address::ORIGIN.to_string(), "b0");
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in ["", "a", "a0", "f0", "a4", "f4", "b5", "g1", "11", "b", "b1 ", "bb", "b12"] {
            assert!(!is_valid(bad), "{bad:?} should be invalid");
        }
        assert!(matches!(
            "z9".parse::<Address>(),
            Err(AddressError::Invalid(s)) if s == "z9"
        ));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(addr("B1"), addr("b1"));
        assert_eq!(addr("F3"), addr("f3"));
    }

    #[test]
    fn test_displacement_special_cases() {
        assert_eq!(addr("b0").displacement(addr("e0")), (0, 0));
        assert_eq!(addr("b0").displacement(addr("d2")), (0, 2));
        assert_eq!(addr("e3").displacement(addr("b0")), (0, -3));
        // a and f are outside the origin's column span
        assert_eq!(addr("b0").displacement(addr("a1")), (-1, 1));
        assert_eq!(addr("b0").displacement(addr("f1")), (4, 1));
        assert_eq!(addr("a1").displacement(addr("c3")), (2, 2));
    }

    #[test]
    fn test_adjacent_of_origin() {
        let adj: Vec<String> = Address::ORIGIN.adjacent().map(|a| a.to_string()).collect();
        assert_eq!(adj, ["b1", "c1", "d1", "e1"]);
    }

    #[test]
    fn test_adjacent_examples() {
        let names =
            |s: &str| -> Vec<String> { addr(s).adjacent().map(|a| a.to_string()).collect() };
        assert_eq!(names("a1"), ["a2", "b1"]);
        assert_eq!(names("b1"), ["a1", "b0", "b2", "c1"]);
        assert_eq!(names("c2"), ["b2", "c1", "c3", "d2"]);
        assert_eq!(names("e4"), ["d4", "e3"]);
        assert_eq!(names("f2"), ["e2", "f1", "f3"]);
    }

    #[test]
    fn test_adjacency_is_symmetric_and_irreflexive() {
        for a in Address::all() {
            assert!(!a.is_adjacent(a));
            for b in Address::all() {
                assert_eq!(a.is_adjacent(b), b.is_adjacent(a), "{a} / {b}");
            }
        }
    }

    #[test]
    fn test_degrees_between_two_and_four() {
        for a in Address::all() {
            let degree = a.adjacent().count();
            assert!((2..=4).contains(&degree), "{a} has degree {degree}");
        }
    }

    #[test]
    fn test_step_toward() {
        assert_eq!(addr("b1").step_toward(addr("c1"), 2), Ok(Some(addr("d1"))));
        assert_eq!(addr("c3").step_toward(addr("c2"), 2), Ok(Some(addr("c1"))));
        assert_eq!(addr("c2").step_toward(addr("c1"), 2), Ok(Some(Address::ORIGIN)));
        assert_eq!(Address::ORIGIN.step_toward(addr("d1"), 2), Ok(Some(addr("d2"))));
        assert_eq!(addr("b2").step_toward(addr("a2"), 2), Ok(None));
        assert_eq!(addr("b3").step_toward(addr("b4"), 2), Ok(None));
        assert_eq!(addr("a2").step_toward(addr("c2"), 0), Ok(Some(addr("a2"))));
    }

    #[test]
    fn test_step_toward_long_walks_fall_off() {
        assert_eq!(addr("b1").step_toward(addr("b2"), 127), Ok(None));
        assert_eq!(addr("b4").step_toward(addr("b3"), u8::MAX), Ok(None));
        assert_eq!(addr("a2").step_toward(addr("b2"), u8::MAX), Ok(None));
        assert_eq!(Address::ORIGIN.step_toward(addr("c1"), u8::MAX), Ok(None));
        // walking back to row 0 still lands on the origin
        assert_eq!(addr("d4").step_toward(addr("d3"), 4), Ok(Some(Address::ORIGIN)));
    }

    #[test]
    fn test_step_toward_rejects_diagonals() {
        assert_eq!(
            addr("b1").step_toward(addr("c2"), 2),
            Err(AddressError::NotInLine { from: addr("b1"), to: addr("c2") })
        );
    }

    #[test]
    fn test_corners() {
        let corners: Vec<String> = Address::all()
            .filter(|a| a.is_corner())
            .map(|a| a.to_string())
            .collect();
        assert_eq!(corners, ["a1", "a3", "b0", "b4", "e4", "f1", "f3"]);
        for alias in ["c0", "d0", "e0"] {
            assert!(addr(alias).is_corner());
        }
        assert!(!addr("c4").is_corner());
    }
}
