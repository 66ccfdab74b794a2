//! Incremental board state.
//!
//! `Position` owns the physical board (one bitboard per `PieceClass` plus a
//! square map) and the stack of per-ply `PositionState`s. Only the move
//! applier mutates either after setup; everything else reads.

use crate::game_state::chess_rules::{CASTLES, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::game_state::pawn_table::PawnTable;
use crate::game_state::position_state::PositionState;
use crate::game_state::score::{
    exchange_value, game_phase_from, non_pawn_value, piece_square_value, piece_value, ScoreVector,
};
use crate::moves::leaper_moves::pawn_attacks;
use crate::moves::move_descriptions::Move;
use crate::moves::pawn_masks::{passed_pawn_mask, squares_in_front};
use crate::search::material_keys::{material_rule, MaterialRule};
use crate::search::zobrist;

/// Board contents and rule fields a position is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub squares: [PieceClass; 64],
    pub side_to_move: Color,
    pub castle_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub fifty_move_counter: u32,
    pub fullmove_number: u32,
}

impl BoardLayout {
    pub fn empty() -> Self {
        Self {
            squares: [PieceClass::EMPTY; 64],
            side_to_move: Color::Light,
            castle_rights: 0,
            en_passant_square: None,
            fifty_move_counter: 0,
            fullmove_number: 1,
        }
    }

    /// The standard initial array.
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut layout = Self::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            layout.squares[make_square(file, 0) as usize] = PieceClass::new(Color::Light, *kind);
            layout.squares[make_square(file, 1) as usize] = PieceClass::LIGHT_PAWN;
            layout.squares[make_square(file, 6) as usize] = PieceClass::DARK_PAWN;
            layout.squares[make_square(file, 7) as usize] = PieceClass::new(Color::Dark, *kind);
        }
        layout.castle_rights = CASTLE_ALL;
        layout
    }
}

/// Chess position with incremental derived state.
///
/// Cloning is an explicit deep copy: the copy owns its own bitboards, state
/// stack and an empty pawn cache, so it can be handed to another thread.
#[derive(Debug)]
pub struct Position {
    bitboards: [Bitboard; PieceClass::COUNT],
    squares: [PieceClass; 64],
    states: Vec<PositionState>,
    ply: u32,
    pawn_table: PawnTable,
}

impl Clone for Position {
    fn clone(&self) -> Self {
        Self {
            bitboards: self.bitboards,
            squares: self.squares,
            states: self.states.clone(),
            ply: self.ply,
            pawn_table: self.pawn_table.empty_like(),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::from_layout(&BoardLayout::starting())
    }

    /// Empty board with light to move. Not a legal chess position; used as a
    /// scratch target before a layout is loaded.
    pub fn empty() -> Self {
        Self {
            bitboards: [0; PieceClass::COUNT],
            squares: [PieceClass::EMPTY; 64],
            states: vec![PositionState::default()],
            ply: 0,
            pawn_table: PawnTable::default(),
        }
    }

    /// Builds a position from a layout. Castle rights without king and rook
    /// on their home squares are dropped, as is an en-passant square no pawn
    /// can capture on.
    pub fn from_layout(layout: &BoardLayout) -> Self {
        let mut position = Self::empty();
        for (sq, class) in layout.squares.iter().enumerate() {
            if class.is_piece() {
                position.put_piece(*class, sq as Square);
            }
        }

        let side = layout.side_to_move;
        let castle_rights = position.backed_castle_rights(layout.castle_rights);
        if castle_rights != layout.castle_rights {
            log::debug!(
                "dropping castle rights {:#06b} not backed by king and rook",
                layout.castle_rights & !castle_rights
            );
        }

        let en_passant_square = layout
            .en_passant_square
            .filter(|&ep| position.en_passant_capturable(side, ep));

        position.ply = 2 * layout.fullmove_number.saturating_sub(1)
            + if side == Color::Dark { 1 } else { 0 };

        let base = PositionState {
            side_to_move: side,
            castle_rights,
            en_passant_square,
            fifty_move_counter: layout.fifty_move_counter,
            ..PositionState::default()
        };
        let state = position.derive_state(base);
        position.states = vec![state];
        position.debug_audit("setup");
        position
    }

    /// Standard FEN text of the starting position.
    #[inline]
    pub fn starting_fen() -> &'static str {
        STARTING_POSITION_FEN
    }

    /// Keeps only the rights whose king and rook are on their home squares.
    fn backed_castle_rights(&self, requested: CastlingRights) -> CastlingRights {
        CASTLES
            .iter()
            .filter(|c| requested & c.right != 0)
            .filter(|c| {
                let color = if c.right & Color::Light.castle_rights() != 0 {
                    Color::Light
                } else {
                    Color::Dark
                };
                self.squares[c.king_from as usize] == PieceClass::new(color, PieceKind::King)
                    && self.squares[c.rook_from as usize] == PieceClass::new(color, PieceKind::Rook)
            })
            .fold(0, |acc, c| acc | c.right)
    }

    /// True when `side` has a pawn that can capture on `ep`, behind an enemy pawn that just double-stepped.
    pub(crate) fn en_passant_capturable(&self, side: Color, ep: Square) -> bool {
        if relative_rank(side, ep) != 5 {
            return false;
        }
        let pushed = pawn_behind(side, ep);
        self.squares[pushed as usize] == PieceClass::new(side.opposite(), PieceKind::Pawn)
            && self.squares[ep as usize].is_empty()
            && pawn_attacks(side.opposite(), ep) & self.view_for(side, PieceKind::Pawn) != 0
    }

    /// Fills every derived field of `base` from the board. Rule fields
    /// (side, castle rights, en passant, counters) are taken from `base`.
    pub(crate) fn derive_state(&self, base: PositionState) -> PositionState {
        let mut material = ScoreVector::ZERO;
        let mut non_pawn_material = ScoreVector::ZERO;
        for class in PieceClass::PIECES {
            let mut bb = self.bitboard(class);
            while bb != 0 {
                let sq = pop_lsb(&mut bb);
                material += piece_square_value(class, sq);
                non_pawn_material += non_pawn_value(class);
            }
        }

        let mut state = PositionState {
            material,
            non_pawn_material,
            ..base
        };
        state.key = zobrist::compute_key_with(
            self,
            state.side_to_move,
            state.castle_rights,
            state.en_passant_square,
        );
        state.pawn_key = zobrist::compute_pawn_zobrist_key(self);
        state.material_key = zobrist::compute_material_key(self);

        let info = self.compute_check_info(state.side_to_move);
        info.write_into(&mut state);
        state
    }

    // --- Board mutation primitives (aggregates and square map kept in sync) ---

    #[inline]
    pub(crate) fn put_piece(&mut self, class: PieceClass, square: Square) {
        let bb = square_bb(square);
        self.bitboards[class.index()] |= bb;
        self.bitboards[PieceClass::pieces_of(class.color()).index()] |= bb;
        self.bitboards[PieceClass::OCCUPIED.index()] |= bb;
        self.squares[square as usize] = class;
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) -> PieceClass {
        let class = self.squares[square as usize];
        let bb = square_bb(square);
        self.bitboards[class.index()] &= !bb;
        self.bitboards[PieceClass::pieces_of(class.color()).index()] &= !bb;
        self.bitboards[PieceClass::OCCUPIED.index()] &= !bb;
        self.squares[square as usize] = PieceClass::EMPTY;
        class
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let class = self.squares[from as usize];
        let from_to = square_bb(from) | square_bb(to);
        self.bitboards[class.index()] ^= from_to;
        self.bitboards[PieceClass::pieces_of(class.color()).index()] ^= from_to;
        self.bitboards[PieceClass::OCCUPIED.index()] ^= from_to;
        self.squares[from as usize] = PieceClass::EMPTY;
        self.squares[to as usize] = class;
    }

    // --- State stack ---

    #[inline]
    pub(crate) fn push_state(&mut self, state: PositionState) {
        self.states.push(state);
    }

    #[inline]
    pub(crate) fn pop_state(&mut self) -> Option<PositionState> {
        if self.states.len() <= 1 {
            return None;
        }
        self.states.pop()
    }

    #[cfg(test)]
    pub(crate) fn current_state_mut(&mut self) -> &mut PositionState {
        let last = self.states.len() - 1;
        &mut self.states[last]
    }

    #[inline]
    pub(crate) fn set_ply(&mut self, ply: u32) {
        self.ply = ply;
    }

    /// Replaces everything but the pawn cache, which is cleared.
    pub(crate) fn replace_with(&mut self, other: Position) {
        self.bitboards = other.bitboards;
        self.squares = other.squares;
        self.states = other.states;
        self.ply = other.ply;
        self.pawn_table.clear();
    }

    // --- Board accessors ---

    #[inline]
    pub fn bitboard(&self, class: PieceClass) -> Bitboard {
        self.bitboards[class.index()]
    }

    #[inline]
    pub fn occupancy(&self) -> Bitboard {
        self.bitboards[PieceClass::OCCUPIED.index()]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color) -> Bitboard {
        self.bitboards[PieceClass::pieces_of(color).index()]
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> PieceClass {
        self.squares[square as usize]
    }

    #[inline]
    pub fn piece_count(&self, class: PieceClass) -> u32 {
        self.bitboard(class).count_ones()
    }

    /// Square of `color`'s king. A position built through setup always has one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.view_for(color, PieceKind::King);
        debug_assert!(kings != 0, "no {color:?} king on the board");
        kings.trailing_zeros().min(63) as Square
    }

    /// Bitboard of `side`'s pieces of `kind`.
    #[inline]
    pub fn view_for(&self, side: Color, kind: PieceKind) -> Bitboard {
        self.bitboards[PieceClass::new(side, kind).index()]
    }

    #[inline]
    pub fn our_bitboard(&self, kind: PieceKind) -> Bitboard {
        self.view_for(self.side_to_move(), kind)
    }

    #[inline]
    pub fn their_bitboard(&self, kind: PieceKind) -> Bitboard {
        self.view_for(self.side_to_move().opposite(), kind)
    }

    // --- State accessors ---

    #[inline]
    pub fn current_state(&self) -> &PositionState {
        &self.states[self.states.len() - 1]
    }

    /// State `n` plies after this instance was set up (`0` is the setup state).
    #[inline]
    pub fn state(&self, n: usize) -> Option<&PositionState> {
        self.states.get(n)
    }

    #[inline]
    pub fn state_depth(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.current_state().side_to_move
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.current_state().en_passant_square
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.current_state().castle_rights
    }

    #[inline]
    pub fn fifty_move_counter(&self) -> u32 {
        self.current_state().fifty_move_counter
    }

    /// Half-moves since the start of the game.
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        let dark = if self.side_to_move() == Color::Dark { 1 } else { 0 };
        1 + self.ply.saturating_sub(dark) / 2
    }

    #[inline]
    pub fn captured_piece(&self) -> PieceClass {
        self.current_state().captured_piece
    }

    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.current_state().checkers
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.current_state().is_in_check()
    }

    #[inline]
    pub fn is_in_double_check(&self) -> bool {
        self.current_state().is_in_double_check()
    }

    #[inline]
    pub fn pinned_pieces(&self) -> Bitboard {
        self.current_state().pinned_pieces
    }

    #[inline]
    pub fn hidden_checkers_candidate(&self) -> Bitboard {
        self.current_state().hidden_checkers_candidate
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.current_state().key
    }

    #[inline]
    pub fn pawn_key(&self) -> u64 {
        self.current_state().pawn_key
    }

    #[inline]
    pub fn material_key(&self) -> u64 {
        self.current_state().material_key
    }

    /// Position key for searches that exclude one move.
    #[inline]
    pub fn exclusion_key(&self) -> u64 {
        self.key() ^ zobrist::exclusion_key()
    }

    #[inline]
    pub fn material(&self) -> ScoreVector {
        self.current_state().material
    }

    #[inline]
    pub fn non_pawn_material(&self) -> ScoreVector {
        self.current_state().non_pawn_material
    }

    /// `0` in the opening up to `65536` in a bare endgame.
    #[inline]
    pub fn game_phase(&self) -> u32 {
        game_phase_from(self.non_pawn_material())
    }

    /// Endgame handling registered for this material signature, if any.
    #[inline]
    pub fn material_rule(&self) -> Option<MaterialRule> {
        material_rule(self.material_key())
    }

    #[inline]
    pub fn pawn_table(&mut self) -> &mut PawnTable {
        &mut self.pawn_table
    }

    // --- Move classification ---

    #[inline]
    pub fn is_capture(&self, m: Move) -> bool {
        self.piece_at(m.to()).is_piece() || m.is_en_passant()
    }

    #[inline]
    pub fn is_capture_or_promotion(&self, m: Move) -> bool {
        self.is_capture(m) || m.is_promotion()
    }

    /// Most valuable victim first, least valuable attacker as tie-break.
    pub fn mvv_lva_score(&self, m: Move) -> i32 {
        let mut score = exchange_value(self.piece_at(m.to())) + (self.piece_at(m.from()).index() % 8) as i32;
        if m.is_en_passant() {
            score += piece_value(PieceKind::Pawn).opening();
        }
        score
    }

    /// True when a pawn moves with no enemy pawn ahead on its own or adjacent
    /// files and no friendly pawn ahead on its own file.
    pub fn is_passed_pawn_move(&self, m: Move) -> bool {
        let piece = self.piece_at(m.from());
        if !piece.is_kind(PieceKind::Pawn) {
            return false;
        }
        let color = piece.color();
        let theirs = self.view_for(color.opposite(), PieceKind::Pawn);
        let ours = self.view_for(color, PieceKind::Pawn);
        theirs & passed_pawn_mask(color, m.from()) == 0
            && ours & squares_in_front(color, m.from()) == 0
    }

    // --- Draw detection ---

    /// Draw by insufficient material, the fifty-move rule or repetition.
    /// Outside the principal line one repetition suffices; on it, two.
    pub fn is_draw(&self, is_pv_line: bool) -> bool {
        let state = self.current_state();

        let bishop = piece_value(PieceKind::Bishop).opening();
        if self.bitboard(PieceClass::LIGHT_PAWN) == 0
            && self.bitboard(PieceClass::DARK_PAWN) == 0
            && state.non_pawn_material.0[0] <= bishop
            && state.non_pawn_material.0[2] <= bishop
        {
            return true;
        }

        if state.fifty_move_counter >= 100 {
            if !state.is_in_check() {
                return true;
            }
            // A mate on the hundredth half-move still counts.
            if crate::move_generation::legal_move_generator::has_legal_move(self) {
                return true;
            }
        }

        let reach = state.fifty_move_counter.min(state.plies_from_null) as usize;
        if reach >= 4 {
            let last = self.states.len() - 1;
            let mut repetitions = 1;
            let mut back = 4;
            while back <= reach && back <= last {
                if self.states[last - back].key == state.key {
                    repetitions += 1;
                    if !is_pv_line || repetitions >= 3 {
                        return true;
                    }
                }
                back += 2;
            }
        }

        false
    }
}
