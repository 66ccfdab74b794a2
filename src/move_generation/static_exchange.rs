//! Static exchange evaluation on a single destination square.

use crate::game_state::chess_types::*;
use crate::game_state::score::{exchange_value, piece_value, KING_EXCHANGE_VALUE};
use crate::moves::move_descriptions::Move;
use crate::moves::slider_moves::{bishop_attacks, rook_attacks};

/// Longest possible exchange: every piece on the board plus the king stop.
const MAX_SWAPS: usize = 34;

const ATTACKER_ORDER: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl Position {
    /// Net material won by the side to move if every capture on the
    /// destination is played out, cheapest attacker first. Castling scores 0.
    pub fn see(&self, m: Move) -> i32 {
        if m.is_castle() {
            return 0;
        }
        let us = self.side_to_move();
        let from = m.from();
        let to = m.to();

        let mut occupied = self.occupancy() ^ square_bb(from);
        let mut swap = [0i32; MAX_SWAPS];
        swap[0] = exchange_value(self.piece_at(to));
        let mut next_victim = exchange_value(self.piece_at(from));

        if m.is_en_passant() {
            occupied ^= square_bb(pawn_behind(us, to));
            swap[0] = piece_value(PieceKind::Pawn).opening();
        }
        if m.is_promotion() {
            let promoted = piece_value(m.promotion_kind()).opening();
            swap[0] += promoted - piece_value(PieceKind::Pawn).opening();
            next_victim = promoted;
        }

        let queens = self.bitboard(PieceClass::LIGHT_QUEEN) | self.bitboard(PieceClass::DARK_QUEEN);
        let diagonal = self.bitboard(PieceClass::LIGHT_BISHOP) | self.bitboard(PieceClass::DARK_BISHOP) | queens;
        let orthogonal = self.bitboard(PieceClass::LIGHT_ROOK) | self.bitboard(PieceClass::DARK_ROOK) | queens;

        let mut attackers = self.attackers_to_occupancy(to, occupied) & occupied;
        let mut side = us.opposite();
        let mut side_attackers = attackers & self.pieces_of(side);
        if side_attackers == 0 {
            return swap[0];
        }

        let mut depth = 1;
        loop {
            swap[depth] = next_victim - swap[depth - 1];
            depth += 1;

            let (square, kind) = self.least_valuable_attacker(side, side_attackers);
            occupied ^= square_bb(square);
            if matches!(kind, PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen) {
                attackers |= bishop_attacks(to, occupied) & diagonal;
            }
            if matches!(kind, PieceKind::Rook | PieceKind::Queen) {
                attackers |= rook_attacks(to, occupied) & orthogonal;
            }
            attackers &= occupied;
            next_victim = exchange_value(PieceClass::new(side, kind));

            side = side.opposite();
            side_attackers = attackers & self.pieces_of(side);

            // A king may only recapture when nothing guards the square.
            if kind == PieceKind::King && side_attackers != 0 {
                swap[depth] = KING_EXCHANGE_VALUE;
                depth += 1;
                break;
            }
            if side_attackers == 0 || depth >= MAX_SWAPS - 1 {
                break;
            }
        }

        while depth > 1 {
            depth -= 1;
            swap[depth - 1] = swap[depth - 1].min(-swap[depth]);
        }
        swap[0]
    }

    /// Sign of `see`, skipping the exchange when the mover is worth no more
    /// than its victim.
    pub fn see_sign(&self, m: Move) -> i32 {
        if m.is_castle() {
            return 0;
        }
        if !m.is_promotion()
            && exchange_value(self.piece_at(m.from())) <= exchange_value(self.piece_at(m.to()))
        {
            return 1;
        }
        self.see(m)
    }

    fn least_valuable_attacker(&self, side: Color, attackers: Bitboard) -> (Square, PieceKind) {
        for kind in ATTACKER_ORDER {
            let found = attackers & self.view_for(side, kind);
            if found != 0 {
                return (lsb(found), kind);
            }
        }
        // `attackers` is never empty here; the king fallback keeps the function total.
        (lsb(attackers), PieceKind::King)
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_types::*;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::moves::move_descriptions::Move;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn setup(fen: &str, text: &str) -> (Position, Move) {
        let pos = Position::from_fen(fen).expect("FEN should parse");
        let m = long_algebraic_to_move(text, &pos).expect("move should parse");
        assert!(pos.is_move_legal(m), "{text} should be legal");
        (pos, m)
    }

    #[test]
    fn free_capture_wins_the_victim() {
        let (pos, m) = setup("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1", "e4d5");
        assert_eq!(pos.see(m), 320);
        assert_eq!(pos.see_sign(m), 1);
    }

    #[test]
    fn defended_pawn_costs_the_rook() {
        let (pos, m) = setup("4k3/8/2p5/3p4/8/8/8/3RK3 w - - 0 1", "d1d5");
        assert_eq!(pos.see(m), -400);
        assert!(pos.see_sign(m) < 0);
    }

    #[test]
    fn x_ray_support_is_counted() {
        let (pos, m) = setup("3rk3/8/8/3p4/8/8/3R4/3RK3 w - - 0 1", "d2d5");
        assert_eq!(pos.see(m), 100);
        assert!(pos.see_sign(m) > 0);
    }

    #[test]
    fn special_moves() {
        let (pos, m) = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6");
        assert!(m.is_en_passant());
        assert_eq!(pos.see(m), 100);

        let (pos, m) = setup("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1", "b7b8q");
        assert_eq!(pos.see(m), 850);
        assert_eq!(pos.see_sign(m), 850);

        let (pos, m) = setup("4k3/8/8/8/8/8/8/4K2R w K - 0 1", "e1g1");
        assert_eq!(pos.see(m), 0);
        assert_eq!(pos.see_sign(m), 0);
    }

    #[test]
    fn sign_agrees_with_full_exchange_on_every_capture() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "2r1r1k1/pp1bppbp/3p1np1/q3P3/2P2P2/1P2B3/P1N1B1PP/2RQ1RK1 b - - 0 1",
            "7r/5qpk/p1Qp1b1p/3r3n/BB3p2/5p2/P1P2P2/4RK1R w - - 0 1",
        ] {
            let pos = Position::from_fen(fen).expect("FEN should parse");
            let moves = LegalMoveGenerator
                .generate_legal_moves(&pos)
                .expect("generation should succeed");
            for m in moves.into_iter().filter(|m| pos.is_capture(*m)) {
                assert_eq!(pos.see_sign(m) >= 0, pos.see(m) >= 0, "{fen} {m}");
            }
        }
    }
}
