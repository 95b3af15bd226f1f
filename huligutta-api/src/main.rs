//! Huligutta Web API
//!
//! Serves a single game session over JSON. All rules live in huligutta-core;
//! this crate only parses requests, holds the board behind a mutex and turns
//! rule errors into `400` responses.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use huligutta_core::{Address, Board, HistoryEntry, Jump, Outcome, Phase, Piece, Turn};

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_FILTER: &str = "huligutta_api=info,huligutta_core=info";

// =============================================================================
// Config
// =============================================================================

struct Config {
    /// Listen address, from `HULIGUTTA_ADDR`.
    addr: String,
}

impl Config {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = lookup("HULIGUTTA_ADDR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        Config { addr }
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Shared application state
struct AppStateInner {
    board: Mutex<Board>,
}

type AppState = Arc<AppStateInner>;

impl AppStateInner {
    fn new() -> Self {
        AppStateInner { board: Mutex::new(Board::new()) }
    }

    /// Every mutation is all-or-nothing, so a poisoned board is still valid.
    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Debug, Serialize)]
struct CellModel {
    addr: Address,
    piece: Option<Piece>,
}

#[derive(Debug, Serialize)]
struct GameStateModel {
    cells: Vec<CellModel>,
    tigers: usize,
    goats: usize,
    goats_placed: usize,
    captured: u8,
    phase: Phase,
    outcome: Option<Outcome>,
    last_move: Option<String>,
    num_moves: usize,
    can_undo: bool,
    /// Text picture of the board
    render: String,
}

#[derive(Serialize)]
struct MovesModel {
    tiger_moves: Vec<(Address, Address)>,
    goat_moves: Vec<(Address, Address)>,
    captures: Vec<Jump>,
}

#[derive(Serialize)]
struct SquareModel {
    addr: Address,
    piece: Option<Piece>,
    safe: bool,
    blocking: bool,
    valid_moves: Vec<Address>,
    capturing_moves: Vec<Address>,
}

#[derive(Deserialize)]
struct PlaceRequest {
    piece: Piece,
    addr: String,
}

#[derive(Deserialize)]
struct MoveRequest {
    from: String,
    to: String,
}

/// Body of `POST /undo`. An empty body undoes one turn.
#[derive(Deserialize)]
struct UndoRequest {
    #[serde(default = "one")]
    n: usize,
}

fn one() -> usize {
    1
}

impl UndoRequest {
    fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(UndoRequest { n: one() });
        }
        serde_json::from_slice(body).map_err(bad_request)
    }
}

#[derive(Serialize)]
struct HistoryEntryModel {
    index: usize,
    notation: String,
    /// `None` for placements
    from: Option<Address>,
    to: Address,
    turn: Turn,
}

#[derive(Serialize)]
struct HistoryModel {
    moves: Vec<HistoryEntryModel>,
    total_moves: usize,
}

#[derive(Serialize)]
struct ExportModel {
    notation: String,
}

#[derive(Deserialize)]
struct ImportRequest {
    notation: String,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Debug, Serialize)]
struct ErrorModel {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);

fn bad_request(detail: impl fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel { detail: detail.to_string() }),
    )
}

fn parse_addr(text: &str) -> Result<Address, ApiError> {
    text.parse().map_err(bad_request)
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn board_to_model(board: &Board) -> GameStateModel {
    GameStateModel {
        cells: board
            .positions()
            .map(|(addr, piece)| CellModel { addr, piece })
            .collect(),
        tigers: board.tiger_count(),
        goats: board.goat_count(),
        goats_placed: board.goats_placed(),
        captured: board.num_captured(),
        phase: board.phase(),
        outcome: board.outcome(),
        last_move: board.last_move(),
        num_moves: board.num_moves(),
        can_undo: !board.history().is_empty(),
        render: board.to_string(),
    }
}

fn entry_to_model(index: usize, entry: &HistoryEntry) -> HistoryEntryModel {
    HistoryEntryModel {
        index,
        notation: entry.notation(),
        from: entry.turn.source(),
        to: entry.turn.to(),
        turn: entry.turn,
    }
}

/// Replay a newline-separated notation log onto a fresh board.
fn replay_log(text: &str) -> Result<Board, String> {
    let mut board = Board::new();
    let lines = text.lines().filter(|line| !line.trim().is_empty());

    for (i, line) in lines.enumerate() {
        let turn: Turn = line
            .parse()
            .map_err(|e| format!("Move {}: {}", i + 1, e))?;
        board
            .apply(turn)
            .map_err(|e| format!("Move {} ({}): {}", i + 1, line.trim(), e))?;
    }
    Ok(board)
}

// =============================================================================
// Handlers
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let board = state.board();
    Json(board_to_model(&board))
}

async fn get_moves(State(state): State<AppState>) -> Json<MovesModel> {
    let board = state.board();
    Json(MovesModel {
        tiger_moves: board.tiger_possible_moves(),
        goat_moves: board.goat_possible_moves(),
        captures: board.tiger_capturing_moves(),
    })
}

async fn get_square(
    State(state): State<AppState>,
    Path(addr): Path<String>,
) -> Result<Json<SquareModel>, ApiError> {
    let addr = parse_addr(&addr)?;
    let board = state.board();
    Ok(Json(SquareModel {
        addr,
        piece: board.piece_at(addr),
        safe: board.is_square_safe(addr),
        blocking: board.is_square_blocking(addr),
        valid_moves: board.valid_moves(addr),
        capturing_moves: board.capturing_moves(addr),
    }))
}

async fn place_piece(
    State(state): State<AppState>,
    Json(req): Json<PlaceRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let addr = parse_addr(&req.addr)?;
    let mut board = state.board();

    if board.outcome().is_some() {
        return Err(bad_request("Game is already over"));
    }

    let turn = match req.piece {
        Piece::Tiger => board.place_tiger(addr),
        Piece::Goat => board.place_goat(addr),
    }
    .map_err(bad_request)?;

    tracing::info!(%turn, "placed");
    Ok(Json(board_to_model(&board)))
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let from = parse_addr(&req.from)?;
    let to = parse_addr(&req.to)?;
    let mut board = state.board();

    if board.outcome().is_some() {
        return Err(bad_request("Game is already over"));
    }

    let turn = board.move_piece(from, to).map_err(bad_request)?;

    tracing::info!(%turn, captured = board.num_captured(), "moved");
    Ok(Json(board_to_model(&board)))
}

async fn undo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GameStateModel>, ApiError> {
    let req = UndoRequest::from_body(&body)?;
    let mut board = state.board();
    board.undo_move(req.n).map_err(bad_request)?;
    Ok(Json(board_to_model(&board)))
}

async fn reset_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let mut board = state.board();
    board.clear();
    tracing::info!("board reset");
    Json(board_to_model(&board))
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryModel> {
    let board = state.board();
    let moves = board
        .history()
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| entry_to_model(index, entry))
        .collect();
    Json(HistoryModel {
        moves,
        total_moves: board.history().len(),
    })
}

async fn export_game(State(state): State<AppState>) -> Json<ExportModel> {
    let board = state.board();
    let notation = board.history().notations().collect::<Vec<_>>().join("\n");
    Json(ExportModel { notation })
}

async fn import_game(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    // the session keeps its old game if any line fails
    let imported = replay_log(&req.notation).map_err(bad_request)?;

    let mut board = state.board();
    *board = imported;
    tracing::info!(turns = board.history().len(), "game imported");
    Ok(Json(board_to_model(&board)))
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Main
// =============================================================================

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/game", get(get_game))
        .route("/moves", get(get_moves))
        .route("/squares/{addr}", get(get_square))
        .route("/place", post(place_piece))
        .route("/move", post(make_move))
        .route("/undo", post(undo))
        .route("/reset", post(reset_game))
        .route("/history", get(get_history))
        .route("/export", get(export_game))
        .route("/import", post(import_game))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let config = Config::from_env();
    let state: AppState = Arc::new(AppStateInner::new());

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, "Huligutta API listening");
    axum::serve(listener, app(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.addr, DEFAULT_ADDR);

        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_config_reads_addr() {
        let config = Config::from_lookup(|key| {
            (key == "HULIGUTTA_ADDR").then(|| "127.0.0.1:9000".to_string())
        });
        assert_eq!(config.addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_board_to_model() {
        let mut board = Board::new();
        board.place_tiger(addr("b1")).unwrap();
        board.place_goat(addr("c1")).unwrap();
        board.move_piece(addr("b1"), addr("d1")).unwrap();

        let model = board_to_model(&board);
        assert_eq!(model.cells.len(), 23);
        assert_eq!(model.tigers, 1);
        assert_eq!(model.goats, 0);
        assert_eq!(model.captured, 1);
        assert_eq!(model.num_moves, 1);
        assert_eq!(model.last_move.as_deref(), Some("b1,\txc1,\td1"));
        assert!(model.can_undo);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["phase"], "placing_tigers");
        assert_eq!(json["cells"][12]["addr"], "d1");
        assert_eq!(json["cells"][12]["piece"], "tiger");
        assert!(json["outcome"].is_null());
    }

    #[test]
    fn test_replay_log() {
        let board = replay_log("Tb1\nGc1\n\nb1,\txc1,\td1\n").unwrap();
        assert_eq!(board.num_captured(), 1);
        assert_eq!(board.history().len(), 3);

        assert!(replay_log("").unwrap().history().is_empty());
    }

    #[test]
    fn test_replay_log_reports_line() {
        let err = replay_log("Tb1\nTb1").unwrap_err();
        assert!(err.starts_with("Move 2 (Tb1)"), "{err}");

        let err = replay_log("Tb1\nnonsense").unwrap_err();
        assert!(err.starts_with("Move 2:"), "{err}");
    }

    #[test]
    fn test_bad_request_shape() {
        let (status, Json(body)) = parse_addr("z9").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "invalid address: \"z9\"");
    }

    #[test]
    fn test_undo_request_defaults_to_one() {
        assert_eq!(UndoRequest::from_body(b"").unwrap().n, 1);
        assert_eq!(UndoRequest::from_body(b"  \n").unwrap().n, 1);
        assert_eq!(UndoRequest::from_body(b"{}").unwrap().n, 1);
        assert_eq!(UndoRequest::from_body(br#"{"n": 3}"#).unwrap().n, 3);

        let (status, _) = UndoRequest::from_body(b"three").err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    type Reply = Result<Json<GameStateModel>, ApiError>;

    fn new_state() -> AppState {
        Arc::new(AppStateInner::new())
    }

    async fn place(state: &AppState, piece: Piece, at: &str) -> Reply {
        let req = PlaceRequest { piece, addr: at.to_string() };
        place_piece(State(state.clone()), Json(req)).await
    }

    async fn step(state: &AppState, from: &str, to: &str) -> Reply {
        let req = MoveRequest { from: from.to_string(), to: to.to_string() };
        make_move(State(state.clone()), Json(req)).await
    }

    fn detail(result: Reply) -> (StatusCode, String) {
        let (status, Json(body)) = result.err().unwrap();
        (status, body.detail)
    }

    #[tokio::test]
    async fn test_place_and_capture_through_handlers() {
        let state = new_state();
        place(&state, Piece::Tiger, "b1").await.unwrap();
        place(&state, Piece::Goat, "c1").await.unwrap();

        let Json(game) = step(&state, "b1", "d1").await.unwrap();
        assert_eq!(game.captured, 1);
        assert_eq!(game.last_move.as_deref(), Some("b1,\txc1,\td1"));

        let Json(history) = get_history(State(state.clone())).await;
        assert_eq!(history.total_moves, 3);
        assert_eq!(history.moves[0].from, None);
        assert_eq!(history.moves[2].from, Some(addr("b1")));
        assert_eq!(history.moves[2].to, addr("d1"));
    }

    #[tokio::test]
    async fn test_rule_violations_are_bad_requests() {
        let state = new_state();
        place(&state, Piece::Tiger, "b1").await.unwrap();

        let (status, msg) = detail(place(&state, Piece::Goat, "b1").await);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "b1 is already occupied");

        let (status, msg) = detail(step(&state, "c3", "c4").await);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "there is no piece at c3");

        let (status, _) = detail(place(&state, Piece::Goat, "g7").await);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let Json(game) = get_game(State(state.clone())).await;
        assert_eq!(game.tigers, 1);
        assert_eq!(game.goats, 0);
    }

    #[tokio::test]
    async fn test_turns_refused_after_game_over() {
        let state = new_state();
        for t in ["a1", "f1", "f3"] {
            place(&state, Piece::Tiger, t).await.unwrap();
        }
        for g in ["a2", "b1", "c1", "d1", "e1", "f2", "e3", "d3"] {
            place(&state, Piece::Goat, g).await.unwrap();
        }
        let Json(game) = get_game(State(state.clone())).await;
        assert_eq!(game.outcome, Some(Outcome::GoatsWin));

        let (status, msg) = detail(place(&state, Piece::Goat, "c2").await);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "Game is already over");

        let (_, msg) = detail(step(&state, "d3", "c3").await);
        assert_eq!(msg, "Game is already over");
        assert!(state.board().is_empty(addr("c3")));
        assert_eq!(state.board().history().len(), 11);
    }

    #[tokio::test]
    async fn test_undo_through_handler() {
        let state = new_state();
        place(&state, Piece::Tiger, "b1").await.unwrap();
        place(&state, Piece::Goat, "c1").await.unwrap();

        let result = undo(State(state.clone()), Bytes::from_static(br#"{"n": 3}"#)).await;
        let (status, msg) = detail(result);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "cannot undo 3 turn(s), only 2 recorded");
        assert_eq!(state.board().history().len(), 2);

        let Json(game) = undo(State(state.clone()), Bytes::new()).await.unwrap();
        assert_eq!(game.last_move.as_deref(), Some("Tb1"));
        assert_eq!(game.goats, 0);
    }

    #[tokio::test]
    async fn test_failed_import_keeps_session() {
        let state = new_state();
        place(&state, Piece::Tiger, "c2").await.unwrap();

        let req = ImportRequest { notation: "Tb1\nTb1".to_string() };
        let (status, msg) = detail(import_game(State(state.clone()), Json(req)).await);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.starts_with("Move 2 (Tb1)"), "{msg}");
        assert_eq!(state.board().tiger_positions(), [addr("c2")]);

        let Json(exported) = export_game(State(state.clone())).await;
        assert_eq!(exported.notation, "Tc2");

        let req = ImportRequest { notation: "Tb1\nGc1\nb1,\txc1,\td1".to_string() };
        let Json(game) = import_game(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(game.captured, 1);
        assert_eq!(state.board().tiger_positions(), [addr("d1")]);
    }
}
