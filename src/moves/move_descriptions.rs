//! Compact 16-bit move encoding.
//!
//! Layout: bits `0..6` origin, `6..12` destination, `12..14` promotion
//! piece (queen, rook, bishop, knight), `14..16` move flag. Castling is
//! written as the king's own two-square step.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const PROMOTION_SHIFT: u16 = 12;
const FLAG_SHIFT: u16 = 14;

const SQUARE_MASK: u16 = 0x3F;
const TWO_BIT_MASK: u16 = 0x3;

/// Special-move marker stored in the top two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Normal,
    Promotion,
    Castle,
    EnPassant,
}

impl MoveFlag {
    #[inline]
    const fn code(self) -> u16 {
        match self {
            MoveFlag::Normal => 0,
            MoveFlag::Promotion => 1,
            MoveFlag::Castle => 2,
            MoveFlag::EnPassant => 3,
        }
    }

    #[inline]
    const fn from_code(code: u16) -> Self {
        match code & TWO_BIT_MASK {
            0 => MoveFlag::Normal,
            1 => MoveFlag::Promotion,
            2 => MoveFlag::Castle,
            _ => MoveFlag::EnPassant,
        }
    }
}

#[inline]
const fn promotion_code(kind: PieceKind) -> u16 {
    match kind {
        PieceKind::Rook => 1,
        PieceKind::Bishop => 2,
        PieceKind::Knight => 3,
        _ => 0,
    }
}

/// Opaque move value handed between the generator and the position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Sentinel used for "no move" (a1a1 is never a real move).
    pub const NONE: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move(((from as u16) << FROM_SHIFT) | ((to as u16) << TO_SHIFT))
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Move(
            Move::new(from, to).0
                | (promotion_code(kind) << PROMOTION_SHIFT)
                | (MoveFlag::Promotion.code() << FLAG_SHIFT),
        )
    }

    #[inline]
    pub const fn castle(king_from: Square, king_to: Square) -> Self {
        Move(Move::new(king_from, king_to).0 | (MoveFlag::Castle.code() << FLAG_SHIFT))
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move(Move::new(from, to).0 | (MoveFlag::EnPassant.code() << FLAG_SHIFT))
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_code(self.0 >> FLAG_SHIFT)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self.flag(), MoveFlag::Promotion)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag(), MoveFlag::Castle)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassant)
    }

    /// Promotion target. Only meaningful when `is_promotion()`.
    #[inline]
    pub const fn promotion_kind(self) -> PieceKind {
        match (self.0 >> PROMOTION_SHIFT) & TWO_BIT_MASK {
            0 => PieceKind::Queen,
            1 => PieceKind::Rook,
            2 => PieceKind::Bishop,
            _ => PieceKind::Knight,
        }
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::utils::long_algebraic::move_to_long_algebraic(*self))
    }
}
