//! Zobrist hashing support for position identity, pawn structure and
//! material signature.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Highest per-class count the material key distinguishes.
pub const MAX_MATERIAL_COUNT: usize = 10;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; 64]; PieceClass::COUNT],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    material: [[u64; MAX_MATERIAL_COUNT + 1]; PieceClass::COUNT],
    exclusion: u64,
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

/// Forces the key tables to be built now.
pub fn init_zobrist_tables() {
    let _ = tables();
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[0u64; 64]; PieceClass::COUNT];
    let mut material = [[0u64; MAX_MATERIAL_COUNT + 1]; PieceClass::COUNT];
    for class in PieceClass::PIECES {
        for key in &mut piece_square[class.index()] {
            *key = rng.random();
        }
        for key in &mut material[class.index()] {
            *key = rng.random();
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
        material,
        exclusion: rng.random(),
    }
}

/// Return the Zobrist key for a piece of `class` on `square`.
#[inline]
pub fn piece_square_key(class: PieceClass, square: Square) -> u64 {
    tables().piece_square[class.index()][square as usize]
}

/// Return the Zobrist key contribution for castling rights mask (`0..=15`).
#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & CASTLE_ALL) as usize]
}

/// Return the Zobrist key contribution for an en-passant file.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Return the side-to-move toggle key (xor in when dark to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Key mixed into the position key for excluded-move searches.
#[inline]
pub fn exclusion_key() -> u64 {
    tables().exclusion
}

/// Material key term toggled when the count of `class` crosses `slot -> slot + 1`.
#[inline]
pub fn material_key_term(class: PieceClass, slot: usize) -> u64 {
    tables().material[class.index()][slot.min(MAX_MATERIAL_COUNT)]
}

/// Material key of a multiset of piece counts indexed by `PieceClass`.
pub fn material_key_from_counts(counts: &[u32; PieceClass::COUNT]) -> u64 {
    let mut key = 0u64;
    for class in PieceClass::PIECES {
        for slot in 0..counts[class.index()] as usize {
            key ^= material_key_term(class, slot);
        }
    }
    key
}

/// Compute the full position Zobrist key from scratch.
pub fn compute_zobrist_key(position: &Position) -> u64 {
    compute_key_with(
        position,
        position.side_to_move(),
        position.castling_rights(),
        position.en_passant_square(),
    )
}

/// Position key for the board of `position` combined with the given rule fields.
pub fn compute_key_with(
    position: &Position,
    side_to_move: Color,
    castle_rights: CastlingRights,
    en_passant_square: Option<Square>,
) -> u64 {
    let mut key = 0u64;

    for class in PieceClass::PIECES {
        let mut bb = position.bitboard(class);
        while bb != 0 {
            key ^= piece_square_key(class, pop_lsb(&mut bb));
        }
    }

    if side_to_move == Color::Dark {
        key ^= side_to_move_key();
    }

    key ^= castling_key(castle_rights);

    if let Some(ep_square) = en_passant_square {
        key ^= en_passant_file_key(file_of(ep_square));
    }

    key
}

/// Compute the pawn-structure key from scratch.
pub fn compute_pawn_zobrist_key(position: &Position) -> u64 {
    let mut key = 0u64;
    for class in [PieceClass::LIGHT_PAWN, PieceClass::DARK_PAWN] {
        let mut bb = position.bitboard(class);
        while bb != 0 {
            key ^= piece_square_key(class, pop_lsb(&mut bb));
        }
    }
    key
}

/// Compute the material-signature key from scratch.
pub fn compute_material_key(position: &Position) -> u64 {
    let mut counts = [0u32; PieceClass::COUNT];
    for class in PieceClass::PIECES {
        counts[class.index()] = position.piece_count(class);
    }
    material_key_from_counts(&counts)
}
