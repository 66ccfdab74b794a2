use crate::chess_errors::NotationError;
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{square_from_algebraic, square_to_algebraic};

/// `e2e4`, `e7e8q`; castling is written as the king's two-square step.
pub fn move_to_long_algebraic(m: Move) -> String {
    if m.is_none() {
        return "0000".to_owned();
    }
    let mut out = square_to_algebraic(m.from());
    out.push_str(&square_to_algebraic(m.to()));
    if m.is_promotion() {
        out.push(m.promotion_kind().fen_char());
    }
    out
}

/// Resolves long algebraic text against `position`, setting the castle,
/// en-passant and promotion flags from the board. The result is not checked
/// for legality; see `Position::is_move_legal`.
pub fn long_algebraic_to_move(text: &str, position: &Position) -> Result<Move, NotationError> {
    let text = text.trim();
    if text.len() != 4 && text.len() != 5 {
        return Err(NotationError::Move(text.to_owned()));
    }
    let from = square_from_algebraic(text.get(0..2).ok_or_else(|| NotationError::Move(text.to_owned()))?)?;
    let to = square_from_algebraic(text.get(2..4).ok_or_else(|| NotationError::Move(text.to_owned()))?)?;

    let piece = position.piece_at(from);
    if !piece.is_piece() {
        return Err(NotationError::EmptyOrigin(text.to_owned()));
    }

    if let Some(promotion) = text.chars().nth(4) {
        let kind = match promotion.to_ascii_lowercase() {
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            _ => return Err(NotationError::Move(text.to_owned())),
        };
        if !piece.is_kind(PieceKind::Pawn) {
            return Err(NotationError::Move(text.to_owned()));
        }
        return Ok(Move::promotion(from, to, kind));
    }

    if piece.is_kind(PieceKind::King) && file_of(from).abs_diff(file_of(to)) == 2 && rank_of(from) == rank_of(to) {
        return Ok(Move::castle(from, to));
    }
    if piece.is_kind(PieceKind::Pawn)
        && file_of(from) != file_of(to)
        && position.piece_at(to).is_empty()
        && position.en_passant_square() == Some(to)
    {
        return Ok(Move::en_passant(from, to));
    }
    Ok(Move::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_move, move_to_long_algebraic};
    use crate::chess_errors::NotationError;
    use crate::game_state::chess_types::*;
    use crate::moves::move_descriptions::{Move, MoveFlag};

    #[test]
    fn quiet_move_text_is_preserved() {
        let pos = Position::new();
        let mv = long_algebraic_to_move("e2e4", &pos).expect("move should parse");
        assert_eq!(mv, Move::new(12, 28));
        assert_eq!(move_to_long_algebraic(mv), "e2e4");
        assert_eq!(move_to_long_algebraic(Move::NONE), "0000");
    }

    #[test]
    fn promotion_suffix() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let mv = long_algebraic_to_move("a7a8n", &pos).expect("move should parse");
        assert_eq!(mv.flag(), MoveFlag::Promotion);
        assert_eq!(mv.promotion_kind(), PieceKind::Knight);
        assert_eq!(mv.to_string(), "a7a8n");
    }

    #[test]
    fn detects_castling_and_en_passant() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        assert!(long_algebraic_to_move("e1g1", &pos).expect("castle should parse").is_castle());
        assert!(long_algebraic_to_move("e1c1", &pos).expect("castle should parse").is_castle());
        assert!(!long_algebraic_to_move("e1f1", &pos).expect("move should parse").is_castle());

        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert!(long_algebraic_to_move("e5d6", &pos)
            .expect("en passant should parse")
            .is_en_passant());
    }

    #[test]
    fn malformed_text_is_rejected() {
        let pos = Position::new();
        assert_eq!(
            long_algebraic_to_move("e3e4", &pos),
            Err(NotationError::EmptyOrigin("e3e4".to_owned()))
        );
        assert!(matches!(long_algebraic_to_move("e2", &pos), Err(NotationError::Move(_))));
        assert!(matches!(long_algebraic_to_move("e2e4x", &pos), Err(NotationError::Move(_))));
        assert!(matches!(long_algebraic_to_move("g1f3q", &pos), Err(NotationError::Move(_))));
        assert!(matches!(long_algebraic_to_move("z2e4", &pos), Err(NotationError::Square(_))));
    }
}
