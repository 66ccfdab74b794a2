//! Forward-looking pawn masks used by passed-pawn detection.

use crate::game_state::chess_types::{Bitboard, Color, Square};

/// `SQUARES_IN_FRONT[color][sq]`: the file ahead of `sq` from `color`'s view.
pub static SQUARES_IN_FRONT: [[Bitboard; 64]; 2] = [build_front(true, false), build_front(false, false)];

/// `PASSED_PAWN_MASK[color][sq]`: the front file plus both adjacent front files.
pub static PASSED_PAWN_MASK: [[Bitboard; 64]; 2] = [build_front(true, true), build_front(false, true)];

const fn build_front(upward: bool, with_adjacent: bool) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let file = (sq % 8) as i32;
        let mut rank = (sq / 8) as i32;
        let mut mask = 0u64;
        loop {
            rank += if upward { 1 } else { -1 };
            if rank < 0 || rank > 7 {
                break;
            }
            let mut df = if with_adjacent { -1 } else { 0 };
            let last = if with_adjacent { 1 } else { 0 };
            while df <= last {
                let f = file + df;
                if f >= 0 && f < 8 {
                    mask |= 1u64 << (rank * 8 + f);
                }
                df += 1;
            }
        }
        table[sq] = mask;
        sq += 1;
    }
    table
}

#[inline]
pub fn squares_in_front(color: Color, square: Square) -> Bitboard {
    SQUARES_IN_FRONT[color.index()][square as usize]
}

#[inline]
pub fn passed_pawn_mask(color: Color, square: Square) -> Bitboard {
    PASSED_PAWN_MASK[color.index()][square as usize]
}
