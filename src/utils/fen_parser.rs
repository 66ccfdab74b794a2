//! FEN-to-Position parser.
//!
//! Builds a `BoardLayout` from Forsyth-Edwards Notation, validates it, and
//! only then turns it into a `Position`. The half-move and full-move fields
//! are optional and default to `0` and `1`.

use crate::chess_errors::FenError;
use crate::game_state::chess_types::*;
use crate::game_state::position::BoardLayout;
use crate::utils::algebraic::square_from_algebraic;

pub fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let result = parse_layout(fen).and_then(|layout| {
        validate_layout(&layout)?;
        let position = Position::from_layout(&layout);
        let them = position.side_to_move().opposite();
        if position.is_square_attacked(position.king_square(them), position.side_to_move()) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(position)
    });
    if let Err(err) = &result {
        log::debug!("rejected FEN '{fen}': {err}");
    }
    result
}

/// Parses the six FEN fields without checking the board is playable.
pub fn parse_layout(fen: &str) -> Result<BoardLayout, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&fields.len()) {
        return Err(FenError::FieldCount(fields.len()));
    }

    let mut layout = BoardLayout::empty();
    parse_board(fields[0], &mut layout)?;
    layout.side_to_move = parse_side_to_move(fields[1])?;
    layout.castle_rights = parse_castling_rights(fields[2])?;
    layout.en_passant_square = parse_en_passant_square(fields[3])?;
    if let Some(halfmove) = fields.get(4) {
        layout.fifty_move_counter = parse_counter("halfmove", halfmove)?;
    }
    if let Some(fullmove) = fields.get(5) {
        layout.fullmove_number = parse_counter("fullmove", fullmove)?.max(1);
    }
    Ok(layout)
}

fn parse_board(board_part: &str, layout: &mut BoardLayout) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::PieceChar(ch));
                }
                file += empty_count as u8;
            } else {
                let class = PieceClass::from_fen_char(ch).ok_or(FenError::PieceChar(ch))?;
                if file < 8 {
                    layout.squares[make_square(file, board_rank) as usize] = class;
                }
                file += 1;
            }
            if file > 8 {
                return Err(FenError::RankWidth { rank: board_rank + 1 });
            }
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: board_rank + 1 });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(FenError::SideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(FenError::CastlingChar(ch)),
        }
    }
    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    let square = square_from_algebraic(en_passant_part)
        .map_err(|_| FenError::EnPassantSquare(en_passant_part.to_owned()))?;
    if rank_of(square) != 2 && rank_of(square) != 5 {
        return Err(FenError::EnPassantSquare(en_passant_part.to_owned()));
    }
    Ok(Some(square))
}

fn parse_counter(field: &'static str, text: &str) -> Result<u32, FenError> {
    text.parse::<u32>().map_err(|_| FenError::Counter {
        field,
        value: text.to_owned(),
    })
}

/// Exactly one king per side and no pawns on the first or last rank.
fn validate_layout(layout: &BoardLayout) -> Result<(), FenError> {
    for (color, name) in [(Color::Light, "light"), (Color::Dark, "dark")] {
        let king = PieceClass::new(color, PieceKind::King);
        let count = layout.squares.iter().filter(|c| **c == king).count() as u32;
        if count != 1 {
            return Err(FenError::KingCount { color: name, count });
        }
    }
    for (sq, class) in layout.squares.iter().enumerate() {
        let back_rank = matches!(rank_of(sq as Square), 0 | 7);
        if back_rank && class.is_kind(PieceKind::Pawn) {
            return Err(FenError::PawnOnBackRank(sq as Square));
        }
    }
    Ok(())
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    /// Loads `fen` into this position. On error the position is left untouched.
    pub fn setup_from_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let parsed = parse_fen(fen)?;
        self.replace_with(parsed);
        Ok(())
    }
}
