use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(position: &Position) -> String {
    let squares: Vec<PieceClass> = (0..64u8).map(|sq| position.piece_at(sq)).collect();
    write_fields(
        &squares,
        position.side_to_move(),
        position.castling_rights(),
        position.en_passant_square(),
        position.fifty_move_counter(),
        position.fullmove_number(),
    )
}

/// FEN of the color-mirrored position: ranks flipped, piece colors, side to
/// move, castle rights and the en-passant square swapped. Counters are kept.
pub fn generate_symmetric_fen(position: &Position) -> String {
    let squares: Vec<PieceClass> = (0..64u8)
        .map(|sq| {
            let class = position.piece_at(flip_rank(sq));
            if class.is_piece() {
                class.flipped()
            } else {
                class
            }
        })
        .collect();
    let rights = position.castling_rights();
    let swapped_rights = ((rights & Color::Light.castle_rights()) << 2) | ((rights & Color::Dark.castle_rights()) >> 2);
    write_fields(
        &squares,
        position.side_to_move().opposite(),
        swapped_rights,
        position.en_passant_square().map(flip_rank),
        position.fifty_move_counter(),
        position.fullmove_number(),
    )
}

fn write_fields(
    squares: &[PieceClass],
    side: Color,
    rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
) -> String {
    let side_to_move = match side {
        Color::Light => "w",
        Color::Dark => "b",
    };
    format!(
        "{} {} {} {} {} {}",
        generate_board_field(squares),
        side_to_move,
        generate_castling_field(rights),
        en_passant.map_or_else(|| "-".to_owned(), square_to_algebraic),
        halfmove,
        fullmove
    )
}

fn generate_board_field(squares: &[PieceClass]) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match squares[make_square(file, rank) as usize].to_fen_char() {
                Some(ch) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(ch);
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let out: String = [
        (CASTLE_LIGHT_KINGSIDE, 'K'),
        (CASTLE_LIGHT_QUEENSIDE, 'Q'),
        (CASTLE_DARK_KINGSIDE, 'k'),
        (CASTLE_DARK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(right, _)| rights & right != 0)
    .map(|(_, ch)| *ch)
    .collect();

    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}

impl Position {
    pub fn fen(&self) -> String {
        generate_fen(self)
    }

    pub fn symmetric_fen(&self) -> String {
        generate_symmetric_fen(self)
    }
}
