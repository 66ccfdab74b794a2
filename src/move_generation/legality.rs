//! Move validation and check classification.
//!
//! `is_move_legal` accepts any 16-bit move value and answers whether it is a
//! fully legal move in the current position, so it doubles as the filter for
//! pseudo-legal candidates and as the guard for moves from stale sources.

use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::move_generation::attack_analysis::attacks_from;
use crate::moves::leaper_moves::pawn_attacks;
use crate::moves::lines::{aligned, between};
use crate::moves::move_descriptions::{Move, MoveFlag};
use crate::moves::slider_moves::{bishop_attacks, rook_attacks};

impl Position {
    pub fn is_move_legal(&self, m: Move) -> bool {
        if m.is_none() {
            return false;
        }
        let us = self.side_to_move();
        let them = us.opposite();
        let from = m.from();
        let to = m.to();
        let piece = self.piece_at(from);
        if !piece.is_piece() || piece.color() != us {
            return false;
        }
        let target = self.piece_at(to);
        if target.is_piece() && (target.color() == us || target.is_kind(PieceKind::King)) {
            return false;
        }

        let is_pawn = piece.is_kind(PieceKind::Pawn);
        match m.flag() {
            MoveFlag::Castle => return self.is_castle_legal(piece, from, to),
            MoveFlag::EnPassant => return self.is_en_passant_legal(piece, from, to),
            MoveFlag::Promotion => {
                if !is_pawn || relative_rank(us, to) != 7 {
                    return false;
                }
            }
            MoveFlag::Normal => {
                if is_pawn && relative_rank(us, to) == 7 {
                    return false;
                }
            }
        }

        let occupancy = self.occupancy();
        let to_bb = square_bb(to);
        if is_pawn {
            let capture = pawn_attacks(us, from) & to_bb & self.pieces_of(them) != 0;
            let single = pawn_push(us, from);
            let push = to == single && target.is_empty();
            let double = relative_rank(us, from) == 1
                && to == pawn_push(us, single)
                && self.piece_at(single).is_empty()
                && target.is_empty();
            if !(capture || push || double) {
                return false;
            }
        } else if attacks_from(piece, from, occupancy) & to_bb == 0 {
            return false;
        }

        if piece.is_kind(PieceKind::King) {
            let after = occupancy ^ square_bb(from);
            return self.attackers_to_occupancy(to, after) & self.pieces_of(them) == 0;
        }

        let king = self.king_square(us);
        let checkers = self.checkers();
        if checkers != 0 {
            if more_than_one(checkers) {
                return false;
            }
            let checker = lsb(checkers);
            if (between(king, checker) | square_bb(checker)) & to_bb == 0 {
                return false;
            }
        }

        self.pinned_pieces() & square_bb(from) == 0 || aligned(from, to, king)
    }

    fn is_castle_legal(&self, piece: PieceClass, from: Square, to: Square) -> bool {
        let us = piece.color();
        if !piece.is_kind(PieceKind::King) || self.is_in_check() {
            return false;
        }
        let Some(castle) = castle_geometry(from, to) else {
            return false;
        };
        if castle.right & us.castle_rights() == 0
            || self.castling_rights() & castle.right == 0
            || self.piece_at(castle.rook_from) != PieceClass::new(us, PieceKind::Rook)
            || self.occupancy() & castle.path != 0
        {
            return false;
        }
        let them = self.pieces_of(us.opposite());
        let mut walk = castle.king_walk;
        while walk != 0 {
            if self.attackers_to(pop_lsb(&mut walk)) & them != 0 {
                return false;
            }
        }
        true
    }

    fn is_en_passant_legal(&self, piece: PieceClass, from: Square, to: Square) -> bool {
        let us = piece.color();
        if !piece.is_kind(PieceKind::Pawn)
            || self.en_passant_square() != Some(to)
            || pawn_attacks(us, from) & square_bb(to) == 0
        {
            return false;
        }
        let captured = pawn_behind(us, to);
        if self.piece_at(captured) != PieceClass::new(us.opposite(), PieceKind::Pawn) {
            return false;
        }
        // Both pawns leave their squares at once, so re-test the king against the post-move board.
        let after = (self.occupancy() ^ square_bb(from) ^ square_bb(captured)) | square_bb(to);
        let king = self.king_square(us);
        let attackers = self.attackers_to_occupancy(king, after)
            & self.pieces_of(us.opposite())
            & !square_bb(captured);
        attackers == 0
    }

    /// True when the move, assumed legal, checks the enemy king.
    pub fn move_gives_check(&self, m: Move) -> bool {
        self.move_gives_direct_check(m) || self.move_gives_discovered_check(m)
    }

    /// True when the move checks with the moving piece and uncovers a second checker.
    pub fn move_gives_double_check(&self, m: Move) -> bool {
        self.move_gives_direct_check(m) && self.move_gives_discovered_check(m)
    }

    /// Double check where the moving piece lands on a square the enemy does not attack.
    pub fn move_gives_safe_double_check(&self, m: Move) -> bool {
        if !self.move_gives_double_check(m) {
            return false;
        }
        let after = (self.occupancy() ^ square_bb(m.from())) | square_bb(m.to());
        self.attackers_to_occupancy(m.to(), after) & self.pieces_of(self.side_to_move().opposite()) == 0
    }

    /// True when the moved (or promoted, or castling rook) piece itself attacks the enemy king.
    pub fn move_gives_direct_check(&self, m: Move) -> bool {
        let us = self.side_to_move();
        let from = m.from();
        let to = m.to();
        let piece = self.piece_at(from);
        let state = self.current_state();
        let their_king = self.king_square(us.opposite());

        match m.flag() {
            MoveFlag::Promotion => {
                let promoted = PieceClass::new(us, m.promotion_kind());
                let occupancy = self.occupancy() ^ square_bb(from);
                attacks_from(promoted, to, occupancy) & square_bb(their_king) != 0
            }
            MoveFlag::Castle => {
                let Some(castle) = castle_geometry(from, to) else {
                    return false;
                };
                let occupancy = (self.occupancy() ^ square_bb(from) ^ square_bb(castle.rook_from))
                    | square_bb(to)
                    | square_bb(castle.rook_to);
                rook_attacks(castle.rook_to, occupancy) & square_bb(their_king) != 0
            }
            MoveFlag::Normal | MoveFlag::EnPassant => {
                state.checking_squares[piece.index()] & square_bb(to) != 0
            }
        }
    }

    /// True when the move uncovers a slider attack on the enemy king.
    pub fn move_gives_discovered_check(&self, m: Move) -> bool {
        let us = self.side_to_move();
        let from = m.from();
        let to = m.to();
        let their_king = self.king_square(us.opposite());

        if self.hidden_checkers_candidate() & square_bb(from) != 0 && !aligned(from, to, their_king) {
            return true;
        }
        if m.is_en_passant() {
            let captured = pawn_behind(us, to);
            let after = (self.occupancy() ^ square_bb(from) ^ square_bb(captured)) | square_bb(to);
            let queens = self.view_for(us, PieceKind::Queen);
            let rooks = self.view_for(us, PieceKind::Rook) | queens;
            let bishops = self.view_for(us, PieceKind::Bishop) | queens;
            return (rook_attacks(their_king, after) & rooks) | (bishop_attacks(their_king, after) & bishops)
                != 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_types::*;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::moves::lines::aligned;
    use crate::moves::move_descriptions::Move;
    use crate::utils::algebraic::square_from_algebraic;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn sq(text: &str) -> Square {
        square_from_algebraic(text).expect("square should parse")
    }

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).expect("FEN should parse")
    }

    fn mv(pos: &Position, text: &str) -> Move {
        long_algebraic_to_move(text, pos).expect("move should parse")
    }

    #[test]
    fn pinned_piece_may_only_slide_along_the_pin() {
        let pos = position("4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1");
        assert!(pos.is_move_legal(mv(&pos, "e4e6")));
        assert!(pos.is_move_legal(mv(&pos, "e4e8")));
        assert!(!pos.is_move_legal(mv(&pos, "e4a4")));

        let moves = LegalMoveGenerator
            .generate_legal_moves(&pos)
            .expect("generation should succeed");
        let king = pos.king_square(Color::Light);
        for m in moves.iter().filter(|m| m.from() == sq("e4")) {
            assert!(aligned(m.from(), m.to(), king));
        }
    }

    #[test]
    fn king_may_not_step_into_attack_or_along_checking_ray() {
        let pos = position("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(pos.is_in_check());
        assert!(!pos.is_move_legal(mv(&pos, "e1f1")));
        assert!(!pos.is_move_legal(mv(&pos, "e1d1")));
        assert!(pos.is_move_legal(mv(&pos, "e1e2")));
    }

    #[test]
    fn evasions_must_block_or_capture() {
        let pos = position("4k3/8/8/8/8/8/1B6/r3K3 w - - 0 1");
        assert!(pos.is_move_legal(mv(&pos, "b2a1")));
        assert!(!pos.is_move_legal(mv(&pos, "b2c3")));
        let pos = position("4k3/8/8/8/8/8/2N5/r3K3 w - - 0 1");
        assert!(pos.is_move_legal(mv(&pos, "c2a1")));
        let pos = position("4k3/8/8/8/8/1N6/8/r3K3 w - - 0 1");
        assert!(!pos.is_move_legal(mv(&pos, "b3d2")));
        assert!(pos.is_move_legal(mv(&pos, "b3c1")));
    }

    #[test]
    fn en_passant_exposing_the_king_on_the_rank_is_illegal() {
        let pos = position("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
        assert_eq!(pos.en_passant_square(), Some(sq("c6")));
        let ep = mv(&pos, "b5c6");
        assert!(ep.is_en_passant());
        assert!(!pos.is_move_legal(ep));
        assert!(pos.is_move_legal(mv(&pos, "b5b6")));
    }

    #[test]
    fn castling_requires_safe_empty_path() {
        let pos = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(pos.is_move_legal(mv(&pos, "e1g1")));
        assert!(pos.is_move_legal(mv(&pos, "e1c1")));

        let pos = position("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
        assert!(!pos.is_move_legal(Move::castle(sq("e1"), sq("g1"))));

        // b1 may be attacked; only the king's own walk matters.
        let pos = position("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1");
        assert!(pos.is_move_legal(Move::castle(sq("e1"), sq("c1"))));

        let pos = position("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert!(!pos.is_move_legal(Move::castle(sq("e1"), sq("c1"))));
    }

    #[test]
    fn malformed_moves_are_rejected() {
        let pos = Position::new();
        assert!(!pos.is_move_legal(Move::NONE));
        assert!(!pos.is_move_legal(Move::new(sq("e7"), sq("e5"))));
        assert!(!pos.is_move_legal(Move::new(sq("e2"), sq("e5"))));
        assert!(!pos.is_move_legal(Move::new(sq("b1"), sq("d2"))));
        assert!(!pos.is_move_legal(Move::castle(sq("e1"), sq("g1"))));
        assert!(!pos.is_move_legal(Move::en_passant(sq("e2"), sq("d3"))));
    }

    #[test]
    fn direct_discovered_and_double_checks() {
        // Bishop on e2 shields the e-file; moving it uncovers the e1 rook.
        let pos = position("4k3/8/8/8/8/8/4B3/4R1K1 w - - 0 1");
        let quiet_discovery = mv(&pos, "e2a6");
        assert!(pos.move_gives_check(quiet_discovery));
        assert!(!pos.move_gives_double_check(quiet_discovery));

        let double = mv(&pos, "e2b5");
        assert!(pos.move_gives_check(double));
        assert!(pos.move_gives_double_check(double));
        assert!(pos.move_gives_safe_double_check(double));

        let none = mv(&pos, "g1h2");
        assert!(!pos.move_gives_check(none));
    }

    #[test]
    fn double_check_safety_depends_on_landing_square() {
        let pos = position("4k3/8/8/8/4N3/8/8/4R1K1 w - - 0 1");
        let knight = mv(&pos, "e4d6");
        assert!(pos.move_gives_double_check(knight));
        assert!(pos.move_gives_safe_double_check(knight));

        let pos = position("4k3/8/4B3/8/8/8/8/4R1K1 w - - 0 1");
        let bishop = mv(&pos, "e6d7");
        assert!(pos.move_gives_double_check(bishop));
        assert!(!pos.move_gives_safe_double_check(bishop));
    }

    #[test]
    fn special_move_checks() {
        let pos = position("8/1P2k3/8/8/8/8/8/4K3 w - - 0 1");
        assert!(!pos.move_gives_check(mv(&pos, "b7b8q")));
        let pos = position("3k4/1P6/8/8/8/8/8/4K3 w - - 0 1");
        assert!(pos.move_gives_check(mv(&pos, "b7b8q")));
        assert!(!pos.move_gives_check(mv(&pos, "b7b8n")));

        let pos = position("5k2/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(pos.move_gives_check(mv(&pos, "e1g1")));

        let pos = position("8/8/8/1k1pP2R/8/8/8/4K3 w - d6 0 1");
        assert!(pos.move_gives_check(mv(&pos, "e5d6")));
    }

    #[test]
    fn gives_check_agrees_with_position_after_move() {
        let mut pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let moves = LegalMoveGenerator
            .generate_legal_moves(&pos)
            .expect("generation should succeed");
        for m in moves {
            let predicted = pos.move_gives_check(m);
            pos.do_move(m);
            assert_eq!(predicted, pos.is_in_check(), "{m}");
            pos.undo_move();
        }
    }
}
