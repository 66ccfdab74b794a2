//! Errors returned by the position core.
//!
//! Recoverable input problems (bad FEN, bad material codes, unparsable move
//! text) are `Result`s. `ConsistencyError` reports a disagreement between the
//! incrementally maintained position and a from-scratch recomputation; it
//! signals a defect, not a user error.

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// Failure modes of FEN parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 4 to 6 fields, found {0}")]
    FieldCount(usize),

    #[error("FEN board must have 8 ranks, found {0}")]
    RankCount(usize),

    #[error("FEN rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: u8 },

    #[error("invalid FEN piece letter '{0}'")]
    PieceChar(char),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling character '{0}'")]
    CastlingChar(char),

    #[error("invalid en-passant square '{0}'")]
    EnPassantSquare(String),

    #[error("invalid {field} counter '{value}'")]
    Counter { field: &'static str, value: String },

    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: &'static str, count: u32 },

    #[error("pawn on back rank at square {0}")]
    PawnOnBackRank(Square),

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Failure modes of material-signature setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("material code '{0}' is not of the form K...vK... or K...K...")]
    MalformedCode(String),

    #[error("material code side '{0}' needs 1 to 8 pieces starting with a king")]
    BadSide(String),

    #[error("generated position failed to load: {0}")]
    Fen(#[from] FenError),
}

/// Failure modes of long-algebraic move parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square '{0}'")]
    Square(String),

    #[error("invalid long algebraic move '{0}'")]
    Move(String),

    #[error("no piece on origin square of '{0}'")]
    EmptyOrigin(String),
}

/// A mismatch between incremental state and a from-scratch recomputation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("square {square} map says class {mapped} but bitboards disagree")]
    SquareMap { square: Square, mapped: usize },

    #[error("piece bitboards overlap on {0:#018x}")]
    OverlappingBitboards(u64),

    #[error("aggregate bitboard {class} is {actual:#018x}, expected {expected:#018x}")]
    Aggregate {
        class: usize,
        actual: u64,
        expected: u64,
    },

    #[error("{which} key is {actual:#018x}, expected {expected:#018x}")]
    Key {
        which: &'static str,
        actual: u64,
        expected: u64,
    },

    #[error("{which} score is {actual:?}, expected {expected:?}")]
    Material {
        which: &'static str,
        actual: [i32; 4],
        expected: [i32; 4],
    },

    #[error("{which} set is {actual:#018x}, expected {expected:#018x}")]
    Analysis {
        which: &'static str,
        actual: u64,
        expected: u64,
    },

    #[error("checking squares for class {class} are {actual:#018x}, expected {expected:#018x}")]
    CheckingSquares {
        class: usize,
        actual: u64,
        expected: u64,
    },

    #[error("castle rights {rights:#06b} not backed by king and rook on home squares")]
    CastleRights { rights: u8 },

    #[error("en-passant square {0} is not a valid target")]
    EnPassant(Square),

    #[error("state stack is empty")]
    EmptyStateStack,
}
