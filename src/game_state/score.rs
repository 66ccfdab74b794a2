//! Material and piece-square score tables.
//!
//! Scores are carried as four-lane vectors. Material sums use lanes
//! `[opening, endgame, _, _]` from the light side's point of view; the
//! non-pawn material vector uses `[light opening, light endgame, dark
//! opening, dark endgame]`.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;

use crate::game_state::chess_types::*;

/// Four-lane score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ScoreVector(pub [i32; 4]);

impl ScoreVector {
    pub const ZERO: ScoreVector = ScoreVector([0; 4]);

    #[inline]
    pub const fn new(opening: i32, endgame: i32) -> Self {
        ScoreVector([opening, endgame, 0, 0])
    }

    #[inline]
    pub const fn opening(self) -> i32 {
        self.0[0]
    }

    #[inline]
    pub const fn endgame(self) -> i32 {
        self.0[1]
    }

    /// Places an `(opening, endgame)` pair in the lanes owned by `color`.
    #[inline]
    pub const fn for_color(color: Color, value: ScoreVector) -> Self {
        match color {
            Color::Light => ScoreVector([value.0[0], value.0[1], 0, 0]),
            Color::Dark => ScoreVector([0, 0, value.0[0], value.0[1]]),
        }
    }
}

impl Add for ScoreVector {
    type Output = ScoreVector;

    #[inline]
    fn add(self, rhs: ScoreVector) -> ScoreVector {
        ScoreVector([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
        ])
    }
}

impl Sub for ScoreVector {
    type Output = ScoreVector;

    #[inline]
    fn sub(self, rhs: ScoreVector) -> ScoreVector {
        self + (-rhs)
    }
}

impl Neg for ScoreVector {
    type Output = ScoreVector;

    #[inline]
    fn neg(self) -> ScoreVector {
        ScoreVector([-self.0[0], -self.0[1], -self.0[2], -self.0[3]])
    }
}

impl AddAssign for ScoreVector {
    #[inline]
    fn add_assign(&mut self, rhs: ScoreVector) {
        *self = *self + rhs;
    }
}

impl SubAssign for ScoreVector {
    #[inline]
    fn sub_assign(&mut self, rhs: ScoreVector) {
        *self = *self - rhs;
    }
}

/// Value of the king in exchange sequences; larger than any material swing.
pub const KING_EXCHANGE_VALUE: i32 = 20_000;

/// Non-pawn material above which the game phase is pure opening.
pub const OPENING_MATERIAL: i32 = 6_000;
/// Non-pawn material below which the game phase is pure endgame.
pub const ENDGAME_MATERIAL: i32 = 1_000;
/// Phase value of a bare endgame.
pub const PHASE_ENDGAME: u32 = 65_536;

/// `(opening, endgame)` material value of a piece kind.
#[inline]
pub const fn piece_value(kind: PieceKind) -> ScoreVector {
    match kind {
        PieceKind::Pawn => ScoreVector::new(100, 130),
        PieceKind::Knight => ScoreVector::new(320, 300),
        PieceKind::Bishop => ScoreVector::new(330, 320),
        PieceKind::Rook => ScoreVector::new(500, 530),
        PieceKind::Queen => ScoreVector::new(950, 1000),
        PieceKind::King => ScoreVector::new(0, 0),
    }
}

/// Opening value used by exchange and MVV/LVA ordering. Empty squares are worth nothing.
#[inline]
pub fn exchange_value(class: PieceClass) -> i32 {
    if !class.is_piece() {
        return 0;
    }
    match class.kind() {
        PieceKind::King => KING_EXCHANGE_VALUE,
        kind => piece_value(kind).opening(),
    }
}

/// Contribution of a piece of `class` to the non-pawn material vector.
#[inline]
pub fn non_pawn_value(class: PieceClass) -> ScoreVector {
    match class.kind() {
        PieceKind::Pawn | PieceKind::King => ScoreVector::ZERO,
        kind => ScoreVector::for_color(class.color(), piece_value(kind)),
    }
}

struct ScoreTables {
    /// Signed (light positive) material plus placement bonus, indexed by class and square.
    piece_square: [[ScoreVector; 64]; PieceClass::COUNT],
}

static SCORE_TABLES: OnceLock<ScoreTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ScoreTables {
    SCORE_TABLES.get_or_init(build_tables)
}

/// Forces the score tables to be built now.
pub fn init_score_tables() {
    let _ = tables();
}

fn placement_bonus(kind: PieceKind, relative_rank: i32, file: i32) -> ScoreVector {
    let dist_center = (file - 3).abs().min((file - 4).abs()) + (relative_rank - 3).abs().min((relative_rank - 4).abs());
    let center_bonus = 4 - dist_center;

    match kind {
        PieceKind::Pawn => ScoreVector::new(
            relative_rank * 8 - (file - 3).abs() * 2,
            relative_rank * 12,
        ),
        PieceKind::Knight => ScoreVector::new(center_bonus * 6, center_bonus * 4),
        PieceKind::Bishop => ScoreVector::new(center_bonus * 4 + relative_rank, center_bonus * 3),
        PieceKind::Rook => ScoreVector::new(relative_rank * 2, 0),
        PieceKind::Queen => ScoreVector::new(center_bonus * 2, center_bonus * 4),
        PieceKind::King => {
            // Sheltered on the back rank early, centralized late.
            let opening = if relative_rank <= 1 {
                8 - (file - 4).abs() * 2
            } else {
                -center_bonus * 4
            };
            ScoreVector::new(opening, center_bonus * 8)
        }
    }
}

fn build_tables() -> ScoreTables {
    let mut piece_square = [[ScoreVector::ZERO; 64]; PieceClass::COUNT];
    for kind in PieceKind::ALL {
        let light = PieceClass::new(Color::Light, kind);
        let dark = PieceClass::new(Color::Dark, kind);
        for sq in 0..64u8 {
            let value = piece_value(kind)
                + placement_bonus(kind, rank_of(sq) as i32, file_of(sq) as i32);
            piece_square[light.index()][sq as usize] = value;
            piece_square[dark.index()][flip_rank(sq) as usize] = -value;
        }
    }
    ScoreTables { piece_square }
}

/// Signed material-plus-placement score of `class` standing on `square`.
#[inline]
pub fn piece_square_value(class: PieceClass, square: Square) -> ScoreVector {
    tables().piece_square[class.index()][square as usize]
}

/// Interpolation value from non-pawn material: `0` is pure opening, `65536` pure endgame.
pub fn game_phase_from(non_pawn_material: ScoreVector) -> u32 {
    let total = non_pawn_material.0[0] + non_pawn_material.0[2];
    if total > OPENING_MATERIAL {
        return 0;
    }
    if total < ENDGAME_MATERIAL {
        return PHASE_ENDGAME;
    }
    let span = (OPENING_MATERIAL - ENDGAME_MATERIAL) as i64;
    ((OPENING_MATERIAL - total) as i64 * PHASE_ENDGAME as i64 / span) as u32
}
