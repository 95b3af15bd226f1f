//! WASM bindings for huligutta-core
//!
//! Addresses cross the boundary as strings ("b1", "e0", ...). Failed turns
//! throw with the error message.

use wasm_bindgen::prelude::*;

use crate::{Address, Board, Outcome, Phase, Piece, Turn};

/// WASM-friendly wrapper around Board
#[wasm_bindgen]
pub struct WasmBoard {
    inner: Board,
}

fn parse(addr: &str) -> Result<Address, JsError> {
    Ok(addr.parse::<Address>()?)
}

fn names(addrs: &[Address]) -> Vec<String> {
    addrs.iter().map(Address::to_string).collect()
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a new empty board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmBoard {
        WasmBoard { inner: Board::new() }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// "tiger", "goat" or undefined
    #[wasm_bindgen(js_name = pieceAt)]
    pub fn piece_at(&self, addr: &str) -> Result<Option<String>, JsError> {
        let piece = self.inner.piece_at(parse(addr)?);
        Ok(piece.map(|p| match p {
            Piece::Tiger => "tiger".to_string(),
            Piece::Goat => "goat".to_string(),
        }))
    }

    #[wasm_bindgen(js_name = tigerPositions)]
    pub fn tiger_positions(&self) -> Vec<String> {
        names(&self.inner.tiger_positions())
    }

    #[wasm_bindgen(js_name = goatPositions)]
    pub fn goat_positions(&self) -> Vec<String> {
        names(&self.inner.goat_positions())
    }

    #[wasm_bindgen(js_name = numCaptured)]
    pub fn num_captured(&self) -> u8 {
        self.inner.num_captured()
    }

    #[wasm_bindgen(js_name = goatsPlaced)]
    pub fn goats_placed(&self) -> usize {
        self.inner.goats_placed()
    }

    /// Place a tiger. Returns the turn notation.
    #[wasm_bindgen(js_name = placeTiger)]
    pub fn place_tiger(&mut self, addr: &str) -> Result<String, JsError> {
        let turn = self.inner.place_tiger(parse(addr)?)?;
        Ok(turn.to_string())
    }

    /// Place a goat. Returns the turn notation.
    #[wasm_bindgen(js_name = placeGoat)]
    pub fn place_goat(&mut self, addr: &str) -> Result<String, JsError> {
        let turn = self.inner.place_goat(parse(addr)?)?;
        Ok(turn.to_string())
    }

    /// Move a piece, capturing if a tiger lands beyond a goat.
    /// Returns the turn notation.
    #[wasm_bindgen(js_name = movePiece)]
    pub fn move_piece(&mut self, from: &str, to: &str) -> Result<String, JsError> {
        let turn = self.inner.move_piece(parse(from)?, parse(to)?)?;
        Ok(turn.to_string())
    }

    /// Replay one line of notation.
    #[wasm_bindgen(js_name = applyNotation)]
    pub fn apply_notation(&mut self, text: &str) -> Result<(), JsError> {
        let turn: Turn = text.parse()?;
        self.inner.apply(turn)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = undoMove)]
    pub fn undo_move(&mut self, n: usize) -> Result<(), JsError> {
        self.inner.undo_move(n)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self, addr: &str) -> Result<Vec<String>, JsError> {
        Ok(names(&self.inner.valid_moves(parse(addr)?)))
    }

    #[wasm_bindgen(js_name = capturingMoves)]
    pub fn capturing_moves(&self, addr: &str) -> Result<Vec<String>, JsError> {
        Ok(names(&self.inner.capturing_moves(parse(addr)?)))
    }

    /// All tiger moves as [[from, to], ...]
    #[wasm_bindgen(js_name = tigerMoves)]
    pub fn tiger_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.tiger_possible_moves())?)
    }

    /// All goat moves as [[from, to], ...]
    #[wasm_bindgen(js_name = goatMoves)]
    pub fn goat_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.goat_possible_moves())?)
    }

    /// Available captures as [{ tiger, goat, landing }, ...]
    #[wasm_bindgen(js_name = capturingTigerMoves)]
    pub fn capturing_tiger_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.tiger_capturing_moves())?)
    }

    #[wasm_bindgen(js_name = isSquareSafe)]
    pub fn is_square_safe(&self, addr: &str) -> Result<bool, JsError> {
        Ok(self.inner.is_square_safe(parse(addr)?))
    }

    #[wasm_bindgen(js_name = isSquareBlocking)]
    pub fn is_square_blocking(&self, addr: &str) -> Result<bool, JsError> {
        Ok(self.inner.is_square_blocking(parse(addr)?))
    }

    #[wasm_bindgen(js_name = lastMove)]
    pub fn last_move(&self) -> Option<String> {
        self.inner.last_move()
    }

    /// Notation of every turn so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.inner.history().notations().collect()
    }

    /// "placing_tigers", "placing_goats" or "moving"
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            Phase::PlacingTigers => "placing_tigers",
            Phase::PlacingGoats => "placing_goats",
            Phase::Moving => "moving",
        }
        .to_string()
    }

    /// "ongoing", "tigers_win" or "goats_win"
    pub fn result(&self) -> String {
        match self.inner.outcome() {
            None => "ongoing",
            Some(Outcome::TigersWin) => "tigers_win",
            Some(Outcome::GoatsWin) => "goats_win",
        }
        .to_string()
    }

    /// Board picture with X for tigers and O for goats
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    /// Clone the board
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_board(&self) -> WasmBoard {
        WasmBoard { inner: self.inner.clone() }
    }
}

impl Default for WasmBoard {
    fn default() -> Self {
        Self::new()
    }
}
