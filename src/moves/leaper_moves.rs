//! Precomputed attack maps for pieces whose reach ignores occupancy:
//! knights, kings and pawn captures.

use crate::game_state::chess_types::{Bitboard, Color, Square};

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const LIGHT_PAWN_STEPS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_STEPS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

pub static KNIGHT_ATTACKS: [Bitboard; 64] = build_step_table(&KNIGHT_STEPS);
pub static KING_ATTACKS: [Bitboard; 64] = build_step_table(&KING_STEPS);
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    build_step_table(&LIGHT_PAWN_STEPS),
    build_step_table(&DARK_PAWN_STEPS),
];

const fn build_step_table(steps: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < steps.len() {
            let to_file = file + steps[i].0;
            let to_rank = rank + steps[i].1;
            if to_file >= 0 && to_file < 8 && to_rank >= 0 && to_rank < 8 {
                attacks |= 1u64 << (to_rank * 8 + to_file);
            }
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

#[inline]
pub fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` captures on.
#[inline]
pub fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][square as usize]
}
