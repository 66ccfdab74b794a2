//! Core board vocabulary shared by every subsystem.
//!
//! Squares are plain `u8` indices where `0 == a1`, `7 == h1` and `63 == h8`.
//! Bitboards are raw `u64` sets over those indices.

pub use crate::game_state::position::Position;
pub use crate::game_state::position_state::PositionState;

/// Board square index (`0..=63`). "No square" is expressed as `Option::None`.
pub type Square = u8;

/// 64-bit square set.
pub type Bitboard = u64;

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Castle rights owned by this color.
    #[inline]
    pub const fn castle_rights(self) -> CastlingRights {
        match self {
            Color::Light => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
            Color::Dark => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Combined color+kind identifier used both as an array index and as a
/// bitboard selector.
///
/// Layout (one slot per index):
/// `0` occupied aggregate, `1..=6` light king..pawn, `7` light aggregate,
/// `8` empty marker, `9..=14` dark king..pawn, `15` dark aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceClass(u8);

impl PieceClass {
    pub const OCCUPIED: PieceClass = PieceClass(0);
    pub const LIGHT_KING: PieceClass = PieceClass(1);
    pub const LIGHT_QUEEN: PieceClass = PieceClass(2);
    pub const LIGHT_ROOK: PieceClass = PieceClass(3);
    pub const LIGHT_BISHOP: PieceClass = PieceClass(4);
    pub const LIGHT_KNIGHT: PieceClass = PieceClass(5);
    pub const LIGHT_PAWN: PieceClass = PieceClass(6);
    pub const LIGHT_PIECES: PieceClass = PieceClass(7);
    pub const EMPTY: PieceClass = PieceClass(8);
    pub const DARK_KING: PieceClass = PieceClass(9);
    pub const DARK_QUEEN: PieceClass = PieceClass(10);
    pub const DARK_ROOK: PieceClass = PieceClass(11);
    pub const DARK_BISHOP: PieceClass = PieceClass(12);
    pub const DARK_KNIGHT: PieceClass = PieceClass(13);
    pub const DARK_PAWN: PieceClass = PieceClass(14);
    pub const DARK_PIECES: PieceClass = PieceClass(15);

    pub const COUNT: usize = 16;

    /// Every class that denotes an actual piece.
    #[rustfmt::skip]
    pub const PIECES: [PieceClass; 12] = [
        PieceClass::LIGHT_KING, PieceClass::LIGHT_QUEEN, PieceClass::LIGHT_ROOK,
        PieceClass::LIGHT_BISHOP, PieceClass::LIGHT_KNIGHT, PieceClass::LIGHT_PAWN,
        PieceClass::DARK_KING, PieceClass::DARK_QUEEN, PieceClass::DARK_ROOK,
        PieceClass::DARK_BISHOP, PieceClass::DARK_KNIGHT, PieceClass::DARK_PAWN,
    ];

    #[inline]
    const fn color_offset(color: Color) -> u8 {
        match color {
            Color::Light => 0,
            Color::Dark => 8,
        }
    }

    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        PieceClass(Self::color_offset(color) + 6 - kind.index() as u8)
    }

    /// All-pieces-of-`color` aggregate slot.
    #[inline]
    pub const fn pieces_of(color: Color) -> Self {
        PieceClass(Self::color_offset(color) + 7)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// True for the twelve real piece classes (not aggregates or empty).
    #[inline]
    pub const fn is_piece(self) -> bool {
        let slot = self.0 & 7;
        slot != 0 && slot != 7
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 >= 8 {
            Color::Dark
        } else {
            Color::Light
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        debug_assert!(self.is_piece());
        match self.0 & 7 {
            1 => PieceKind::King,
            2 => PieceKind::Queen,
            3 => PieceKind::Rook,
            4 => PieceKind::Bishop,
            5 => PieceKind::Knight,
            _ => PieceKind::Pawn,
        }
    }

    #[inline]
    pub const fn is_kind(self, kind: PieceKind) -> bool {
        self.is_piece() && self.0 & 7 == 6 - kind.index() as u8
    }

    /// Same kind, other color. Only meaningful for piece classes.
    #[inline]
    pub const fn flipped(self) -> Self {
        debug_assert!(self.is_piece());
        PieceClass(self.0 ^ 8)
    }

    pub fn to_fen_char(self) -> Option<char> {
        if !self.is_piece() {
            return None;
        }
        let base = self.kind().fen_char();
        Some(match self.color() {
            Color::Light => base.to_ascii_uppercase(),
            Color::Dark => base,
        })
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_fen_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        Some(PieceClass::new(color, kind))
    }
}

#[inline]
pub const fn square_bb(square: Square) -> Bitboard {
    1u64 << square
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// Rank as seen from `color`'s side of the board (`0` is its back rank).
#[inline]
pub const fn relative_rank(color: Color, square: Square) -> u8 {
    match color {
        Color::Light => rank_of(square),
        Color::Dark => 7 - rank_of(square),
    }
}

/// Vertical mirror (`a1 <-> a8`).
#[inline]
pub const fn flip_rank(square: Square) -> Square {
    square ^ 56
}

/// Square one step forward for a pawn of `color`. Callers guarantee the step stays on the board.
#[inline]
pub const fn pawn_push(color: Color, square: Square) -> Square {
    match color {
        Color::Light => square + 8,
        Color::Dark => square - 8,
    }
}

/// Square one step backward for a pawn of `color`.
#[inline]
pub const fn pawn_behind(color: Color, square: Square) -> Square {
    match color {
        Color::Light => square - 8,
        Color::Dark => square + 8,
    }
}

#[inline]
pub const fn more_than_one(bb: Bitboard) -> bool {
    bb & bb.wrapping_sub(1) != 0
}

/// Lowest set square. `bb` must be non-empty.
#[inline]
pub const fn lsb(bb: Bitboard) -> Square {
    debug_assert!(bb != 0);
    bb.trailing_zeros() as Square
}

/// Removes and returns the lowest set square. `bb` must be non-empty.
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Square {
    let sq = lsb(*bb);
    *bb &= *bb - 1;
    sq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_class_round_trips_color_and_kind() {
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                let class = PieceClass::new(color, kind);
                assert!(class.is_piece());
                assert_eq!(class.color(), color);
                assert_eq!(class.kind(), kind);
                assert!(class.is_kind(kind));
                assert_eq!(class.flipped().color(), color.opposite());
            }
        }
    }

    #[test]
    fn piece_class_layout_matches_aggregate_slots() {
        assert_eq!(PieceClass::new(Color::Light, PieceKind::King), PieceClass::LIGHT_KING);
        assert_eq!(PieceClass::new(Color::Dark, PieceKind::Pawn), PieceClass::DARK_PAWN);
        assert_eq!(PieceClass::pieces_of(Color::Light), PieceClass::LIGHT_PIECES);
        assert_eq!(PieceClass::pieces_of(Color::Dark), PieceClass::DARK_PIECES);
        assert!(!PieceClass::EMPTY.is_piece());
        assert!(!PieceClass::OCCUPIED.is_piece());
        assert!(!PieceClass::DARK_PIECES.is_piece());
    }

    #[test]
    fn fen_chars_map_to_classes() {
        assert_eq!(PieceClass::from_fen_char('Q'), Some(PieceClass::LIGHT_QUEEN));
        assert_eq!(PieceClass::from_fen_char('n'), Some(PieceClass::DARK_KNIGHT));
        assert_eq!(PieceClass::from_fen_char('x'), None);
        assert_eq!(PieceClass::DARK_ROOK.to_fen_char(), Some('r'));
        assert_eq!(PieceClass::EMPTY.to_fen_char(), None);
    }

    #[test]
    fn bit_helpers() {
        let mut bb = square_bb(3) | square_bb(40);
        assert!(more_than_one(bb));
        assert_eq!(pop_lsb(&mut bb), 3);
        assert!(!more_than_one(bb));
        assert_eq!(lsb(bb), 40);
        assert_eq!(relative_rank(Color::Dark, 8), 6);
        assert_eq!(flip_rank(0), 56);
    }
}
