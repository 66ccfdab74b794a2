//! Occupancy-aware attacks for bishops, rooks and queens.

use crate::game_state::chess_types::{Bitboard, Square};
use crate::moves::lines::{build_rays, ray_attacks, Direction};

/// Empty-board bishop reach, used to find slider candidates cheaply.
pub static BISHOP_PSEUDO_ATTACKS: [Bitboard; 64] = build_pseudo(&Direction::DIAGONAL);
/// Empty-board rook reach.
pub static ROOK_PSEUDO_ATTACKS: [Bitboard; 64] = build_pseudo(&Direction::ORTHOGONAL);

const fn build_pseudo(directions: &[Direction; 4]) -> [Bitboard; 64] {
    let rays = build_rays();
    let mut table = [0u64; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut i = 0usize;
        while i < 4 {
            table[sq] |= rays[directions[i] as usize][sq];
            i += 1;
        }
        sq += 1;
    }
    table
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(Direction::NorthEast, square, occupancy)
        | ray_attacks(Direction::NorthWest, square, occupancy)
        | ray_attacks(Direction::SouthEast, square, occupancy)
        | ray_attacks(Direction::SouthWest, square, occupancy)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(Direction::North, square, occupancy)
        | ray_attacks(Direction::East, square, occupancy)
        | ray_attacks(Direction::South, square, occupancy)
        | ray_attacks(Direction::West, square, occupancy)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}
