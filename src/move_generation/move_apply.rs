//! Make/unmake for `Position`.
//!
//! `do_move` and `do_null_move` push exactly one `PositionState`; the undo
//! functions pop it. Calls must nest strictly. Keys and material are updated
//! incrementally, never recomputed.

use crate::game_state::chess_rules::{castle_geometry, CASTLE_RIGHTS_MASK};
use crate::game_state::chess_types::*;
use crate::game_state::score::{non_pawn_value, piece_square_value};
use crate::moves::move_descriptions::Move;
use crate::search::zobrist;

impl Position {
    /// Applies a legal move.
    pub fn do_move(&mut self, m: Move) {
        let mut st = self.current_state().clone();
        let us = st.side_to_move;
        let them = us.opposite();
        let from = m.from();
        let to = m.to();
        let piece = self.piece_at(from);
        debug_assert!(piece.is_piece() && piece.color() == us, "no {us:?} piece on {from}");

        let mut captured = if m.is_en_passant() {
            PieceClass::new(them, PieceKind::Pawn)
        } else {
            self.piece_at(to)
        };

        st.current_move = m;
        st.fifty_move_counter += 1;
        st.plies_from_null += 1;
        st.key ^= zobrist::side_to_move_key();
        if let Some(ep) = st.en_passant_square.take() {
            st.key ^= zobrist::en_passant_file_key(file_of(ep));
        }

        if m.is_castle() {
            captured = PieceClass::EMPTY;
            if let Some(castle) = castle_geometry(from, to) {
                let rook = self.piece_at(castle.rook_from);
                self.move_piece(castle.rook_from, castle.rook_to);
                st.key ^= zobrist::piece_square_key(rook, castle.rook_from)
                    ^ zobrist::piece_square_key(rook, castle.rook_to);
                st.material += piece_square_value(rook, castle.rook_to)
                    - piece_square_value(rook, castle.rook_from);
            }
        }

        if captured.is_piece() {
            let capture_square = if m.is_en_passant() {
                pawn_behind(us, to)
            } else {
                to
            };
            if captured.is_kind(PieceKind::Pawn) {
                st.pawn_key ^= zobrist::piece_square_key(captured, capture_square);
            } else {
                st.non_pawn_material -= non_pawn_value(captured);
            }
            self.remove_piece(capture_square);
            st.key ^= zobrist::piece_square_key(captured, capture_square);
            st.material -= piece_square_value(captured, capture_square);
            st.material_key ^= zobrist::material_key_term(captured, self.piece_count(captured) as usize);
            st.fifty_move_counter = 0;
        }

        let rights_lost = st.castle_rights & (CASTLE_RIGHTS_MASK[from as usize] | CASTLE_RIGHTS_MASK[to as usize]);
        if rights_lost != 0 {
            st.key ^= zobrist::castling_key(st.castle_rights);
            st.castle_rights &= !rights_lost;
            st.key ^= zobrist::castling_key(st.castle_rights);
        }

        self.move_piece(from, to);
        st.key ^= zobrist::piece_square_key(piece, from) ^ zobrist::piece_square_key(piece, to);
        st.material += piece_square_value(piece, to) - piece_square_value(piece, from);

        if piece.is_kind(PieceKind::Pawn) {
            st.pawn_key ^= zobrist::piece_square_key(piece, from) ^ zobrist::piece_square_key(piece, to);
            st.fifty_move_counter = 0;

            if from.abs_diff(to) == 16 {
                let ep = pawn_push(us, from);
                if self.en_passant_capturable(them, ep) {
                    st.en_passant_square = Some(ep);
                    st.key ^= zobrist::en_passant_file_key(file_of(ep));
                }
            } else if m.is_promotion() {
                let promoted = PieceClass::new(us, m.promotion_kind());
                self.remove_piece(to);
                self.put_piece(promoted, to);
                st.key ^= zobrist::piece_square_key(piece, to) ^ zobrist::piece_square_key(promoted, to);
                st.pawn_key ^= zobrist::piece_square_key(piece, to);
                st.material += piece_square_value(promoted, to) - piece_square_value(piece, to);
                st.non_pawn_material += non_pawn_value(promoted);
                st.material_key ^= zobrist::material_key_term(piece, self.piece_count(piece) as usize);
                st.material_key ^=
                    zobrist::material_key_term(promoted, self.piece_count(promoted) as usize - 1);
            }
        }

        st.captured_piece = captured;
        st.side_to_move = them;
        let info = self.compute_check_info(them);
        info.write_into(&mut st);

        self.push_state(st);
        self.set_ply(self.ply() + 1);
        self.debug_audit("do_move");
    }

    /// Reverts the last `do_move`.
    pub fn undo_move(&mut self) {
        if self.state_depth() > 1 && self.current_state().current_move.is_none() {
            debug_assert!(false, "undo_move on a null-move state");
            return;
        }
        let Some(st) = self.pop_state() else {
            debug_assert!(false, "undo_move with an empty history");
            return;
        };
        self.set_ply(self.ply().saturating_sub(1));

        let m = st.current_move;
        let us = self.side_to_move();
        let from = m.from();
        let to = m.to();

        if m.is_promotion() {
            self.remove_piece(to);
            self.put_piece(PieceClass::new(us, PieceKind::Pawn), to);
        }

        if m.is_castle() {
            self.move_piece(to, from);
            if let Some(castle) = castle_geometry(from, to) {
                self.move_piece(castle.rook_to, castle.rook_from);
            }
        } else {
            self.move_piece(to, from);
            if st.captured_piece.is_piece() {
                let capture_square = if m.is_en_passant() {
                    pawn_behind(us, to)
                } else {
                    to
                };
                self.put_piece(st.captured_piece, capture_square);
            }
        }

        self.debug_audit("undo_move");
    }

    /// Passes the turn. Must not be called while in check.
    pub fn do_null_move(&mut self) {
        debug_assert!(!self.is_in_check(), "null move while in check");
        let mut st = self.current_state().clone();

        st.current_move = Move::NONE;
        st.captured_piece = PieceClass::EMPTY;
        st.key ^= zobrist::side_to_move_key();
        if let Some(ep) = st.en_passant_square.take() {
            st.key ^= zobrist::en_passant_file_key(file_of(ep));
        }
        st.plies_from_null += 1;
        st.side_to_move = st.side_to_move.opposite();

        let info = self.compute_check_info(st.side_to_move);
        info.write_into(&mut st);

        self.push_state(st);
        self.set_ply(self.ply() + 1);
        self.debug_audit("do_null_move");
    }

    /// Reverts the last `do_null_move`.
    pub fn undo_null_move(&mut self) {
        if !self.current_state().current_move.is_none() {
            debug_assert!(false, "undo_null_move on a real move");
            return;
        }
        if self.pop_state().is_none() {
            debug_assert!(false, "undo_null_move with an empty history");
            return;
        }
        self.set_ply(self.ply().saturating_sub(1));
        self.debug_audit("undo_null_move");
    }
}
