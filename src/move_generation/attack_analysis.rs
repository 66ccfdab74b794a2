//! Attack queries and check bookkeeping.
//!
//! Everything here reads the board only. `CheckInfo` is what the move
//! applier stores into each new `PositionState`.

use crate::game_state::chess_types::*;
use crate::game_state::position_state::PositionState;
use crate::moves::leaper_moves::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::lines::between;
use crate::moves::slider_moves::{
    bishop_attacks, queen_attacks, rook_attacks, BISHOP_PSEUDO_ATTACKS, ROOK_PSEUDO_ATTACKS,
};

/// Check-related sets for one side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    pub checkers: Bitboard,
    pub pinned_pieces: Bitboard,
    pub hidden_checkers_candidate: Bitboard,
    pub checking_squares: [Bitboard; PieceClass::COUNT],
}

impl CheckInfo {
    #[inline]
    pub fn write_into(&self, state: &mut PositionState) {
        state.checkers = self.checkers;
        state.pinned_pieces = self.pinned_pieces;
        state.hidden_checkers_candidate = self.hidden_checkers_candidate;
        state.checking_squares = self.checking_squares;
    }
}

/// Squares attacked by a piece of `class` on `square` given `occupancy`.
#[inline]
pub fn attacks_from(class: PieceClass, square: Square, occupancy: Bitboard) -> Bitboard {
    match class.kind() {
        PieceKind::Pawn => pawn_attacks(class.color(), square),
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Queen => queen_attacks(square, occupancy),
        PieceKind::King => king_attacks(square),
    }
}

impl Position {
    /// Pieces of both colors attacking `square` when the board holds
    /// `occupancy`. Pieces outside `occupancy` are not filtered out; callers
    /// simulating removals mask the result themselves.
    pub fn attackers_to_occupancy(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        let knights = self.bitboard(PieceClass::LIGHT_KNIGHT) | self.bitboard(PieceClass::DARK_KNIGHT);
        let kings = self.bitboard(PieceClass::LIGHT_KING) | self.bitboard(PieceClass::DARK_KING);
        let queens = self.bitboard(PieceClass::LIGHT_QUEEN) | self.bitboard(PieceClass::DARK_QUEEN);
        let bishops_queens =
            self.bitboard(PieceClass::LIGHT_BISHOP) | self.bitboard(PieceClass::DARK_BISHOP) | queens;
        let rooks_queens =
            self.bitboard(PieceClass::LIGHT_ROOK) | self.bitboard(PieceClass::DARK_ROOK) | queens;

        (pawn_attacks(Color::Light, square) & self.bitboard(PieceClass::DARK_PAWN))
            | (pawn_attacks(Color::Dark, square) & self.bitboard(PieceClass::LIGHT_PAWN))
            | (knight_attacks(square) & knights)
            | (king_attacks(square) & kings)
            | (bishop_attacks(square, occupancy) & bishops_queens)
            | (rook_attacks(square, occupancy) & rooks_queens)
    }

    /// Pieces of both colors attacking `square` on the real board.
    #[inline]
    pub fn attackers_to(&self, square: Square) -> Bitboard {
        self.attackers_to_occupancy(square, self.occupancy())
    }

    /// True when any piece of `by` attacks `square`.
    #[inline]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.attackers_to(square) & self.pieces_of(by) != 0
    }

    /// Pieces of `owner` that are the single blocker between `king_square`
    /// and a slider of `slider_color` aimed at it.
    ///
    /// With our king and their sliders this is the pinned set; with their
    /// king and our sliders it is the discovered-check candidate set.
    pub fn hidden_checkers(&self, king_square: Square, slider_color: Color, owner: Color) -> Bitboard {
        let queens = self.view_for(slider_color, PieceKind::Queen);
        let rooks = self.view_for(slider_color, PieceKind::Rook) | queens;
        let bishops = self.view_for(slider_color, PieceKind::Bishop) | queens;
        let mut snipers = (ROOK_PSEUDO_ATTACKS[king_square as usize] & rooks)
            | (BISHOP_PSEUDO_ATTACKS[king_square as usize] & bishops);

        let occupancy = self.occupancy();
        let mut result = 0u64;
        while snipers != 0 {
            let sniper = pop_lsb(&mut snipers);
            let blockers = between(king_square, sniper) & occupancy;
            if blockers != 0 && !more_than_one(blockers) {
                result |= blockers;
            }
        }
        result & self.pieces_of(owner)
    }

    /// Squares from which each of `side`'s piece classes would attack the
    /// enemy king. Entries for the other color stay empty.
    pub fn checking_squares(&self, side: Color) -> [Bitboard; PieceClass::COUNT] {
        let mut squares = [0u64; PieceClass::COUNT];
        let enemy_king = self.king_square(side.opposite());
        let occupancy = self.occupancy();

        let rook = rook_attacks(enemy_king, occupancy);
        let bishop = bishop_attacks(enemy_king, occupancy);
        squares[PieceClass::new(side, PieceKind::Pawn).index()] = pawn_attacks(side.opposite(), enemy_king);
        squares[PieceClass::new(side, PieceKind::Knight).index()] = knight_attacks(enemy_king);
        squares[PieceClass::new(side, PieceKind::Bishop).index()] = bishop;
        squares[PieceClass::new(side, PieceKind::Rook).index()] = rook;
        squares[PieceClass::new(side, PieceKind::Queen).index()] = rook | bishop;
        squares
    }

    /// Full check bookkeeping for `side` to move on the current board.
    pub fn compute_check_info(&self, side: Color) -> CheckInfo {
        let them = side.opposite();
        let our_king = self.king_square(side);
        let their_king = self.king_square(them);
        CheckInfo {
            checkers: self.attackers_to(our_king) & self.pieces_of(them),
            pinned_pieces: self.hidden_checkers(our_king, them, side),
            hidden_checkers_candidate: self.hidden_checkers(their_king, side, side),
            checking_squares: self.checking_squares(side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Position;
    use crate::utils::algebraic::square_from_algebraic;

    fn sq(text: &str) -> Square {
        square_from_algebraic(text).expect("square should parse")
    }

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn attackers_include_both_colors() {
        let pos = position("4k3/8/8/3p4/4N3/5P2/8/4K3 w - - 0 1");
        let attackers = pos.attackers_to(sq("e4"));
        assert_ne!(attackers & square_bb(sq("d5")), 0);
        assert_ne!(attackers & square_bb(sq("f3")), 0);
        assert_eq!(attackers.count_ones(), 2);
    }

    #[test]
    fn occupancy_override_reveals_x_rays() {
        let pos = position("6k1/8/8/8/8/8/4R3/4R2K w - - 0 1");
        let e8 = sq("e8");
        assert_eq!(pos.attackers_to(e8) & pos.pieces_of(Color::Light), square_bb(sq("e2")));
        let occ = pos.occupancy() ^ square_bb(sq("e2"));
        let xray = pos.attackers_to_occupancy(e8, occ) & pos.pieces_of(Color::Light);
        assert_ne!(xray & square_bb(sq("e1")), 0);
    }

    #[test]
    fn pinned_piece_iff_removal_exposes_king() {
        // Rook on e4 is pinned by the e8 rook; the c3 knight is free.
        let pos = position("4r1k1/8/8/8/4R3/2N5/8/4K3 w - - 0 1");
        assert_eq!(pos.pinned_pieces(), square_bb(sq("e4")));

        for blocker in [sq("e4"), sq("c3")] {
            let occ = pos.occupancy() ^ square_bb(blocker);
            let exposed = pos.attackers_to_occupancy(sq("e1"), occ) & pos.pieces_of(Color::Dark) != 0;
            assert_eq!(exposed, pos.pinned_pieces() & square_bb(blocker) != 0);
        }
    }

    #[test]
    fn two_blockers_do_not_pin() {
        let pos = position("4r1k1/8/8/4N3/4R3/8/8/4K3 w - - 0 1");
        assert_eq!(pos.pinned_pieces(), 0);
    }

    #[test]
    fn discovered_check_candidates() {
        // Moving the e2 bishop opens the e-file for the e1 rook.
        let pos = position("4k3/8/8/8/8/8/4B3/4R1K1 w - - 0 1");
        assert_eq!(pos.hidden_checkers_candidate(), square_bb(sq("e2")));
        assert_eq!(pos.pinned_pieces(), 0);
    }

    #[test]
    fn checking_squares_match_attack_sets() {
        let pos = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let state = pos.current_state();
        let e8 = sq("e8");
        assert_eq!(state.checking_squares[PieceClass::LIGHT_KNIGHT.index()], knight_attacks(e8));
        assert_eq!(
            state.checking_squares[PieceClass::LIGHT_PAWN.index()],
            square_bb(sq("d7")) | square_bb(sq("f7"))
        );
        assert_eq!(state.checking_squares[PieceClass::DARK_QUEEN.index()], 0);
        assert_eq!(state.checking_squares[PieceClass::LIGHT_KING.index()], 0);
    }

    #[test]
    fn checkers_recorded_for_side_to_move() {
        let pos = position("4k3/8/8/8/8/8/8/R3K2r w - - 0 1");
        assert_eq!(pos.checkers(), square_bb(sq("h1")));
        assert!(pos.is_in_check());
        assert!(!pos.is_in_double_check());
    }
}
