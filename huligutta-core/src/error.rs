use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address: {0:?}")]
    Invalid(String),
    #[error("{from} and {to} share neither a row nor a column")]
    NotInLine { from: Address, to: Address },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("{0} is already occupied")]
    Occupied(Address),
    #[error("there is no piece at {0}")]
    Empty(Address),
    #[error("cannot move from {from} to {to}")]
    IllegalMove { from: Address, to: Address },
    #[error("all tigers are already on the board")]
    TigerLimit,
    #[error("all goats have already been placed")]
    GoatLimit,
    #[error("cannot undo {requested} turn(s), only {available} recorded")]
    NotEnoughHistory { requested: usize, available: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unrecognized turn notation: {0:?}")]
    Unrecognized(String),
    #[error(transparent)]
    Address(#[from] AddressError),
}
