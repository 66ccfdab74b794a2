//! Ray, between and line tables.
//!
//! Slider attacks are resolved with the classical ray-scan: take the full
//! ray from a square, find the first blocker, and cut the ray behind it.

use crate::game_state::chess_types::{square_bb, Bitboard, Square};

/// The eight board directions. The first four increase the square index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    NorthWest = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    SouthEast = 7,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    #[inline]
    const fn steps(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::SouthEast => (1, -1),
        }
    }

    #[inline]
    const fn increases_index(self) -> bool {
        (self as usize) < 4
    }
}

const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::NorthWest,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::SouthEast,
];

/// `RAYS[dir][sq]`: every square reachable from `sq` along `dir` on an empty board.
pub static RAYS: [[Bitboard; 64]; 8] = build_rays();

/// `BETWEEN[a][b]`: squares strictly between two aligned squares, else empty.
pub static BETWEEN: [[Bitboard; 64]; 64] = build_between();

/// `LINE[a][b]`: the full edge-to-edge line through two aligned squares, else empty.
pub static LINE: [[Bitboard; 64]; 64] = build_line();

pub const fn build_rays() -> [[Bitboard; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    let mut d = 0usize;
    while d < 8 {
        let (file_step, rank_step) = ALL_DIRECTIONS[d].steps();
        let mut sq = 0usize;
        while sq < 64 {
            let mut file = (sq % 8) as i32 + file_step;
            let mut rank = (sq / 8) as i32 + rank_step;
            let mut ray = 0u64;
            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                ray |= 1u64 << (rank * 8 + file);
                file += file_step;
                rank += rank_step;
            }
            table[d][sq] = ray;
            sq += 1;
        }
        d += 1;
    }
    table
}

const fn build_between() -> [[Bitboard; 64]; 64] {
    let rays = build_rays();
    let mut table = [[0u64; 64]; 64];
    let mut a = 0usize;
    while a < 64 {
        let mut d = 0usize;
        while d < 8 {
            let mut ray = rays[d][a];
            while ray != 0 {
                let b = ray.trailing_zeros() as usize;
                table[a][b] = rays[d][a] & !rays[d][b] & !(1u64 << b);
                ray &= ray - 1;
            }
            d += 1;
        }
        a += 1;
    }
    table
}

const fn build_line() -> [[Bitboard; 64]; 64] {
    let rays = build_rays();
    let mut table = [[0u64; 64]; 64];
    let mut a = 0usize;
    while a < 64 {
        let mut d = 0usize;
        while d < 8 {
            // Opposite direction sits four slots away.
            let full = rays[d][a] | rays[(d + 4) % 8][a] | (1u64 << a);
            let mut ray = rays[d][a];
            while ray != 0 {
                let b = ray.trailing_zeros() as usize;
                table[a][b] = full;
                ray &= ray - 1;
            }
            d += 1;
        }
        a += 1;
    }
    table
}

/// Attacks along one direction, stopping at (and including) the first blocker.
#[inline]
pub fn ray_attacks(direction: Direction, square: Square, occupancy: Bitboard) -> Bitboard {
    let ray = RAYS[direction as usize][square as usize];
    let blockers = ray & occupancy;
    if blockers == 0 {
        return ray;
    }
    let first = if direction.increases_index() {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[direction as usize][first as usize]
}

#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a as usize][b as usize]
}

#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    LINE[a as usize][b as usize]
}

/// True when the three squares share a rank, file or diagonal.
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    LINE[a as usize][b as usize] & square_bb(c) != 0
}
