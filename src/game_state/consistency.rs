//! From-scratch auditor for the incrementally maintained position.
//!
//! `audit` is always available; the `consistency-checks` feature runs it
//! after every mutation and panics on the first mismatch.

use crate::chess_errors::ConsistencyError;
use crate::game_state::chess_rules::CASTLES;
use crate::game_state::chess_types::*;
use crate::game_state::score::{non_pawn_value, piece_square_value, ScoreVector};
use crate::search::zobrist;

impl Position {
    /// Recomputes every derived fact and compares it with the current state.
    pub fn audit(&self) -> Result<(), ConsistencyError> {
        self.audit_board()?;
        self.audit_state()
    }

    fn audit_board(&self) -> Result<(), ConsistencyError> {
        let mut union = 0u64;
        let mut colors = [0u64; 2];
        for class in PieceClass::PIECES {
            let bb = self.bitboard(class);
            if union & bb != 0 {
                return Err(ConsistencyError::OverlappingBitboards(union & bb));
            }
            union |= bb;
            colors[class.color().index()] |= bb;
        }

        let aggregates = [
            (PieceClass::OCCUPIED, union),
            (PieceClass::LIGHT_PIECES, colors[0]),
            (PieceClass::DARK_PIECES, colors[1]),
        ];
        for (class, expected) in aggregates {
            let actual = self.bitboard(class);
            if actual != expected {
                return Err(ConsistencyError::Aggregate {
                    class: class.index(),
                    actual,
                    expected,
                });
            }
        }

        for sq in 0..64u8 {
            let mapped = self.piece_at(sq);
            let consistent = if mapped.is_piece() {
                self.bitboard(mapped) & square_bb(sq) != 0
            } else {
                mapped.is_empty() && union & square_bb(sq) == 0
            };
            if !consistent {
                return Err(ConsistencyError::SquareMap {
                    square: sq,
                    mapped: mapped.index(),
                });
            }
        }
        Ok(())
    }

    fn audit_state(&self) -> Result<(), ConsistencyError> {
        let state = self.current_state();

        let keys = [
            ("position", state.key, zobrist::compute_zobrist_key(self)),
            ("pawn", state.pawn_key, zobrist::compute_pawn_zobrist_key(self)),
            ("material", state.material_key, zobrist::compute_material_key(self)),
        ];
        for (which, actual, expected) in keys {
            if actual != expected {
                return Err(ConsistencyError::Key {
                    which,
                    actual,
                    expected,
                });
            }
        }

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
        for (which, actual, expected) in [
            ("material", state.material, material),
            ("non-pawn material", state.non_pawn_material, non_pawn_material),
        ] {
            if actual != expected {
                return Err(ConsistencyError::Material {
                    which,
                    actual: actual.0,
                    expected: expected.0,
                });
            }
        }

        let info = self.compute_check_info(state.side_to_move);
        let sets = [
            ("checkers", state.checkers, info.checkers),
            ("pinned", state.pinned_pieces, info.pinned_pieces),
            (
                "hidden checkers",
                state.hidden_checkers_candidate,
                info.hidden_checkers_candidate,
            ),
        ];
        for (which, actual, expected) in sets {
            if actual != expected {
                return Err(ConsistencyError::Analysis {
                    which,
                    actual,
                    expected,
                });
            }
        }
        for class in 0..PieceClass::COUNT {
            if state.checking_squares[class] != info.checking_squares[class] {
                return Err(ConsistencyError::CheckingSquares {
                    class,
                    actual: state.checking_squares[class],
                    expected: info.checking_squares[class],
                });
            }
        }

        for castle in CASTLES.iter().filter(|c| state.castle_rights & c.right != 0) {
            let color = if castle.right & Color::Light.castle_rights() != 0 {
                Color::Light
            } else {
                Color::Dark
            };
            if self.piece_at(castle.king_from) != PieceClass::new(color, PieceKind::King)
                || self.piece_at(castle.rook_from) != PieceClass::new(color, PieceKind::Rook)
            {
                return Err(ConsistencyError::CastleRights {
                    rights: state.castle_rights,
                });
            }
        }

        if let Some(ep) = state.en_passant_square {
            if !self.en_passant_capturable(state.side_to_move, ep) {
                return Err(ConsistencyError::EnPassant(ep));
            }
        }

        Ok(())
    }

    /// Runs the auditor in diagnostic builds; a no-op otherwise.
    #[inline]
    pub(crate) fn debug_audit(&self, context: &str) {
        if !cfg!(feature = "consistency-checks") {
            return;
        }
        if let Err(err) = self.audit() {
            log::error!("consistency audit failed after {context}: {err}");
            panic!("consistency audit failed after {context}: {err}");
        }
    }
}
