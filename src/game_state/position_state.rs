use crate::game_state::chess_types::*;
use crate::game_state::score::ScoreVector;
use crate::moves::move_descriptions::Move;

/// Derived facts about one ply, pushed by every move and popped by every undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    // --- Incremental hashing ---
    pub key: u64,
    pub pawn_key: u64,
    pub material_key: u64,

    // --- Material ---
    /// `[light opening, light endgame, dark opening, dark endgame]`.
    pub non_pawn_material: ScoreVector,
    /// Light-minus-dark material and placement, `[opening, endgame, _, _]`.
    pub material: ScoreVector,

    // --- Side and rule state ---
    pub side_to_move: Color,
    pub en_passant_square: Option<Square>,
    pub castle_rights: CastlingRights,
    pub fifty_move_counter: u32,
    pub plies_from_null: u32,

    // --- Undo support ---
    pub captured_piece: PieceClass,
    pub current_move: Move,

    // --- Check analysis for the side to move ---
    pub checkers: Bitboard,
    /// Per class: squares from which that class would attack the enemy king.
    pub checking_squares: [Bitboard; PieceClass::COUNT],
    /// Own pieces that uncover a slider attack on the enemy king when they move.
    pub hidden_checkers_candidate: Bitboard,
    /// Own pieces pinned to their king.
    pub pinned_pieces: Bitboard,
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            key: 0,
            pawn_key: 0,
            material_key: 0,
            non_pawn_material: ScoreVector::ZERO,
            material: ScoreVector::ZERO,
            side_to_move: Color::Light,
            en_passant_square: None,
            castle_rights: 0,
            fifty_move_counter: 0,
            plies_from_null: 0,
            captured_piece: PieceClass::EMPTY,
            current_move: Move::NONE,
            checkers: 0,
            checking_squares: [0; PieceClass::COUNT],
            hidden_checkers_candidate: 0,
            pinned_pieces: 0,
        }
    }
}

impl PositionState {
    #[inline]
    pub fn has_castle_right(&self, right: CastlingRights) -> bool {
        self.castle_rights & right != 0
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.checkers != 0
    }

    #[inline]
    pub fn is_in_double_check(&self) -> bool {
        more_than_one(self.checkers)
    }
}
