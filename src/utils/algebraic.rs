//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and square
//! indices, with `0 == a1` and `63 == h8`.

use crate::chess_errors::NotationError;
use crate::game_state::chess_types::{file_of, make_square, rank_of, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn square_from_algebraic(square: &str) -> Result<Square, NotationError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !(b'1'..=b'8').contains(&bytes[1]) {
        return Err(NotationError::Square(square.to_owned()));
    }
    Ok(make_square(bytes[0] - b'a', bytes[1] - b'1'))
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    format!("{file_char}{rank_char}")
}
