//! Canonical chess-rule constants.
//!
//! Stores rule-related literals: the standard starting position, named
//! squares used by castling, and the per-square castle-rights mask table.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

/// Geometry of one castling option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleGeometry {
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub path: Bitboard,
    /// Squares the king crosses (including destination) that must not be attacked.
    pub king_walk: Bitboard,
}

pub const CASTLES: [CastleGeometry; 4] = [
    CastleGeometry {
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: E1,
        king_to: G1,
        rook_from: H1,
        rook_to: F1,
        path: square_bb(F1) | square_bb(G1),
        king_walk: square_bb(F1) | square_bb(G1),
    },
    CastleGeometry {
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: E1,
        king_to: C1,
        rook_from: A1,
        rook_to: D1,
        path: square_bb(B1) | square_bb(C1) | square_bb(D1),
        king_walk: square_bb(C1) | square_bb(D1),
    },
    CastleGeometry {
        right: CASTLE_DARK_KINGSIDE,
        king_from: E8,
        king_to: G8,
        rook_from: H8,
        rook_to: F8,
        path: square_bb(F8) | square_bb(G8),
        king_walk: square_bb(F8) | square_bb(G8),
    },
    CastleGeometry {
        right: CASTLE_DARK_QUEENSIDE,
        king_from: E8,
        king_to: C8,
        rook_from: A8,
        rook_to: D8,
        path: square_bb(B8) | square_bb(C8) | square_bb(D8),
        king_walk: square_bb(C8) | square_bb(D8),
    },
];

/// Castling option whose king move is `king_from -> king_to`, if any.
#[inline]
pub fn castle_geometry(king_from: Square, king_to: Square) -> Option<&'static CastleGeometry> {
    CASTLES
        .iter()
        .find(|c| c.king_from == king_from && c.king_to == king_to)
}

/// Rights cleared when a move touches the square (as origin or destination).
pub const CASTLE_RIGHTS_MASK: [CastlingRights; 64] = build_castle_rights_mask();

const fn build_castle_rights_mask() -> [CastlingRights; 64] {
    let mut table = [0u8; 64];
    table[E1 as usize] = CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE;
    table[H1 as usize] = CASTLE_LIGHT_KINGSIDE;
    table[A1 as usize] = CASTLE_LIGHT_QUEENSIDE;
    table[E8 as usize] = CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;
    table[H8 as usize] = CASTLE_DARK_KINGSIDE;
    table[A8 as usize] = CASTLE_DARK_QUEENSIDE;
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_mask_covers_king_and_rook_homes() {
        assert_eq!(CASTLE_RIGHTS_MASK[E1 as usize], Color::Light.castle_rights());
        assert_eq!(CASTLE_RIGHTS_MASK[A8 as usize], CASTLE_DARK_QUEENSIDE);
        assert_eq!(CASTLE_RIGHTS_MASK[27], 0);
    }

    #[test]
    fn castle_geometry_lookup() {
        let g = castle_geometry(E8, C8).expect("queenside castle should exist");
        assert_eq!(g.rook_from, A8);
        assert_eq!(g.rook_to, D8);
        assert!(castle_geometry(E1, F1).is_none());
    }
}
