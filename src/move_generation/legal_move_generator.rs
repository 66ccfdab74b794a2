//! Reference legal move generation.
//!
//! Emits pseudo-legal candidates piece by piece, then keeps the ones that
//! pass `Position::is_move_legal`.

use crate::game_state::chess_rules::CASTLES;
use crate::game_state::chess_types::*;
use crate::move_generation::attack_analysis::attacks_from;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::moves::leaper_moves::pawn_attacks;
use crate::moves::move_descriptions::Move;

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

const PIECE_KINDS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<Move>> {
        let mut pseudo = Vec::with_capacity(128);
        generate_pseudo_legal(position, &mut pseudo);
        pseudo.retain(|m| position.is_move_legal(*m));
        Ok(pseudo)
    }
}

/// True when the side to move has at least one legal move.
pub fn has_legal_move(position: &Position) -> bool {
    let mut pseudo = Vec::with_capacity(128);
    generate_pseudo_legal(position, &mut pseudo);
    pseudo.into_iter().any(|m| position.is_move_legal(m))
}

fn generate_pseudo_legal(position: &Position, out: &mut Vec<Move>) {
    generate_pawn_moves(position, out);
    generate_piece_moves(position, out);
    generate_castles(position, out);
}

fn push_pawn_move(color: Color, from: Square, to: Square, out: &mut Vec<Move>) {
    if relative_rank(color, to) == 7 {
        out.extend(PROMOTION_KINDS.iter().map(|kind| Move::promotion(from, to, *kind)));
    } else {
        out.push(Move::new(from, to));
    }
}

fn generate_pawn_moves(position: &Position, out: &mut Vec<Move>) {
    let us = position.side_to_move();
    let empty = !position.occupancy();
    let enemies = position.pieces_of(us.opposite());

    let mut pawns = position.our_bitboard(PieceKind::Pawn);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);

        let single = pawn_push(us, from);
        if square_bb(single) & empty != 0 {
            push_pawn_move(us, from, single, out);
            if relative_rank(us, from) == 1 {
                let double = pawn_push(us, single);
                if square_bb(double) & empty != 0 {
                    out.push(Move::new(from, double));
                }
            }
        }

        let attacks = pawn_attacks(us, from);
        let mut captures = attacks & enemies;
        while captures != 0 {
            push_pawn_move(us, from, pop_lsb(&mut captures), out);
        }

        if let Some(ep) = position.en_passant_square() {
            if attacks & square_bb(ep) != 0 {
                out.push(Move::en_passant(from, ep));
            }
        }
    }
}

fn generate_piece_moves(position: &Position, out: &mut Vec<Move>) {
    let us = position.side_to_move();
    let occupancy = position.occupancy();
    let targets = !position.pieces_of(us);

    for kind in PIECE_KINDS {
        let class = PieceClass::new(us, kind);
        let mut pieces = position.bitboard(class);
        while pieces != 0 {
            let from = pop_lsb(&mut pieces);
            let mut moves = attacks_from(class, from, occupancy) & targets;
            while moves != 0 {
                out.push(Move::new(from, pop_lsb(&mut moves)));
            }
        }
    }
}

fn generate_castles(position: &Position, out: &mut Vec<Move>) {
    let us = position.side_to_move();
    let rights = position.castling_rights() & us.castle_rights();
    for castle in CASTLES.iter().filter(|c| rights & c.right != 0) {
        out.push(Move::castle(castle.king_from, castle.king_to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(fen: &str) -> usize {
        let pos = Position::from_fen(fen).expect("FEN should parse");
        LegalMoveGenerator
            .generate_legal_moves(&pos)
            .expect("generation should succeed")
            .len()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::new();
        let moves = LegalMoveGenerator
            .generate_legal_moves(&pos)
            .expect("generation should succeed");
        assert_eq!(moves.len(), 20);
        assert!(has_legal_move(&pos));
    }

    #[test]
    fn known_move_counts() {
        assert_eq!(
            count("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            48
        );
        assert_eq!(count("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"), 14);
        assert_eq!(
            count("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1"),
            6
        );
    }

    #[test]
    fn mate_and_stalemate_have_no_moves() {
        let mate = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert!(mate.is_in_check());
        assert!(!has_legal_move(&mate));

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert!(!stalemate.is_in_check());
        assert!(!has_legal_move(&stalemate));
    }

    #[test]
    fn underpromotions_are_generated() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let moves = LegalMoveGenerator
            .generate_legal_moves(&pos)
            .expect("generation should succeed");
        assert_eq!(moves.iter().filter(|m| m.is_promotion()).count(), 4);
    }
}
