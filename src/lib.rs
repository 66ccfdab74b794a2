//! Crate root module declarations for the Plum position core.
//!
//! This file exposes the board state, move encoding, move application and
//! analysis, perft, hashing, and notation helpers so binaries, benches, and
//! search collaborators can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod consistency;
    pub mod pawn_table;
    pub mod position;
    pub mod position_state;
    pub mod score;
}

pub mod moves {
    pub mod leaper_moves;
    pub mod lines;
    pub mod move_descriptions;
    pub mod pawn_masks;
    pub mod slider_moves;
}

pub mod move_generation {
    pub mod attack_analysis;
    pub mod legal_move_generator;
    pub mod legality;
    pub mod move_apply;
    pub mod move_generator;
    pub mod perft;
    pub mod perft_table;
    pub mod static_exchange;
}

pub mod search {
    pub mod material_keys;
    pub mod zobrist;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod material_setup;
    pub mod render_game_state;
}

/// Builds every lazily initialized lookup table now instead of on first use.
pub fn init_tables() {
    game_state::score::init_score_tables();
    search::zobrist::init_zobrist_tables();
    search::material_keys::init_material_rules();
}
