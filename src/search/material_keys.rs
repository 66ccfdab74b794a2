//! Material signatures and the endgame rule map keyed by material key.
//!
//! A signature code lists each side's pieces starting with its king, e.g.
//! `KQvKR` or `KQKR`. The first side is the strong side.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::chess_errors::SetupError;
use crate::game_state::chess_types::*;
use crate::search::zobrist::material_key_from_counts;

/// Endgames with a dedicated evaluation routine, owned by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndgameKind {
    /// King and major piece against a bare king.
    MateWithMajor,
    BishopKnightMate,
    KingPawnKing,
    RookVersusPawn,
    RookVersusBishop,
    RookVersusKnight,
    QueenVersusPawn,
    QueenVersusRook,
    RookPawnVersusRook,
    BishopPawnVersusBishop,
}

/// Side of the evaluation a saturation rule caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaturationBound {
    /// The score may not rise above the value.
    High,
    /// The score may not fall below the value.
    Low,
}

/// What the evaluator should do with a given material signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRule {
    /// Dead draw, no evaluation needed.
    Draw,
    /// The routine returns the full score.
    ExactFunction { kind: EndgameKind, strong: Color },
    /// The routine scales the normal evaluation.
    ScalingFunction { kind: EndgameKind, strong: Color },
    /// The normal evaluation is clamped at `value`, scored from light's side.
    Saturation { bound: SaturationBound, value: i32 },
}

impl MaterialRule {
    /// Applies a saturation rule to a light-relative score. Other rules pass it through.
    pub fn saturate(self, score: i32) -> i32 {
        match self {
            MaterialRule::Saturation { bound: SaturationBound::High, value } => score.min(value),
            MaterialRule::Saturation { bound: SaturationBound::Low, value } => score.max(value),
            _ => score,
        }
    }
}

/// Both sides of a signature code, strong side first, uppercase, without the `v`.
pub fn split_code(code: &str) -> Result<(String, String), SetupError> {
    let cleaned: String = code.chars().filter(|c| *c != 'v').collect();
    if !cleaned.starts_with('K') {
        return Err(SetupError::MalformedCode(code.to_owned()));
    }
    let split = cleaned[1..]
        .find('K')
        .map(|i| i + 1)
        .ok_or_else(|| SetupError::MalformedCode(code.to_owned()))?;
    let strong = cleaned[..split].to_owned();
    let weak = cleaned[split..].to_owned();

    for side in [&strong, &weak] {
        let valid = (1..=8).contains(&side.len())
            && side[1..].chars().all(|c| "QRBNP".contains(c));
        if !valid {
            return Err(SetupError::BadSide(side.clone()));
        }
    }
    Ok((strong, weak))
}

/// Per-class piece counts of a signature with the strong side playing `strong`.
pub fn counts_for_code(code: &str, strong: Color) -> Result<[u32; PieceClass::COUNT], SetupError> {
    let (strong_side, weak_side) = split_code(code)?;
    let mut counts = [0u32; PieceClass::COUNT];
    for (side, color) in [(strong_side, strong), (weak_side, strong.opposite())] {
        for ch in side.chars() {
            let kind = PieceKind::from_fen_char(ch).ok_or_else(|| SetupError::BadSide(side.clone()))?;
            counts[PieceClass::new(color, kind).index()] += 1;
        }
    }
    Ok(counts)
}

/// Material key shared by every position carrying this signature.
pub fn material_key_for_code(code: &str, strong: Color) -> Result<u64, SetupError> {
    Ok(material_key_from_counts(&counts_for_code(code, strong)?))
}

const DRAWN_CODES: [&str; 7] = ["KvK", "KNvK", "KBvK", "KNNvK", "KNvKN", "KBvKN", "KBvKB"];

const EXACT_CODES: [(&str, EndgameKind); 9] = [
    ("KQvK", EndgameKind::MateWithMajor),
    ("KRvK", EndgameKind::MateWithMajor),
    ("KBNvK", EndgameKind::BishopKnightMate),
    ("KPvK", EndgameKind::KingPawnKing),
    ("KRvKP", EndgameKind::RookVersusPawn),
    ("KRvKB", EndgameKind::RookVersusBishop),
    ("KRvKN", EndgameKind::RookVersusKnight),
    ("KQvKP", EndgameKind::QueenVersusPawn),
    ("KQvKR", EndgameKind::QueenVersusRook),
];

const SCALING_CODES: [(&str, EndgameKind); 2] = [
    ("KRPvKR", EndgameKind::RookPawnVersusRook),
    ("KBPvKB", EndgameKind::BishopPawnVersusBishop),
];

/// A lone minor piece cannot win against pawns.
const MINOR_CANNOT_WIN_CODES: [&str; 4] = ["KNvKP", "KBvKP", "KNvKPP", "KBvKPP"];

static MATERIAL_RULES: OnceLock<HashMap<u64, MaterialRule>> = OnceLock::new();

fn build_rules() -> HashMap<u64, MaterialRule> {
    let mut rules = HashMap::new();
    let mut register = |code: &str, strong: Color, rule: MaterialRule| {
        match material_key_for_code(code, strong) {
            Ok(key) => {
                rules.insert(key, rule);
            }
            Err(err) => log::error!("skipping material rule {code}: {err}"),
        }
    };

    for strong in Color::BOTH {
        for code in DRAWN_CODES {
            register(code, strong, MaterialRule::Draw);
        }
        for (code, kind) in EXACT_CODES {
            register(code, strong, MaterialRule::ExactFunction { kind, strong });
        }
        for (code, kind) in SCALING_CODES {
            register(code, strong, MaterialRule::ScalingFunction { kind, strong });
        }
        let bound = match strong {
            Color::Light => SaturationBound::High,
            Color::Dark => SaturationBound::Low,
        };
        for code in MINOR_CANNOT_WIN_CODES {
            register(code, strong, MaterialRule::Saturation { bound, value: 0 });
        }
    }
    rules
}

/// Forces the rule map to be built now.
pub fn init_material_rules() {
    let _ = MATERIAL_RULES.get_or_init(build_rules);
}

/// Rule registered for a material key.
#[inline]
pub fn material_rule(material_key: u64) -> Option<MaterialRule> {
    MATERIAL_RULES.get_or_init(build_rules).get(&material_key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_accepts_both_spellings() {
        assert_eq!(
            split_code("KQvKR").expect("code should parse"),
            ("KQ".to_owned(), "KR".to_owned())
        );
        assert_eq!(
            split_code("KRPKR").expect("code should parse"),
            ("KRP".to_owned(), "KR".to_owned())
        );
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(matches!(split_code("QvK"), Err(SetupError::MalformedCode(_))));
        assert!(matches!(split_code("KQR"), Err(SetupError::MalformedCode(_))));
        assert!(matches!(split_code("KXvK"), Err(SetupError::BadSide(_))));
    }

    #[test]
    fn code_key_matches_position_key() {
        let pos = Position::from_fen("8/8/2k5/2r5/8/8/3Q4/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            material_key_for_code("KQvKR", Color::Light).expect("code should parse"),
            pos.material_key()
        );
        assert_eq!(
            pos.material_rule(),
            Some(MaterialRule::ExactFunction {
                kind: EndgameKind::QueenVersusRook,
                strong: Color::Light
            })
        );
    }

    #[test]
    fn mirrored_signature_is_registered_for_dark() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            material_rule(material_key_for_code("KRvK", Color::Light).expect("code should parse")),
            pos.material_rule()
        );
        let key = material_key_for_code("KRvK", Color::Dark).expect("code should parse");
        assert_eq!(
            material_rule(key),
            Some(MaterialRule::ExactFunction {
                kind: EndgameKind::MateWithMajor,
                strong: Color::Dark
            })
        );
    }

    #[test]
    fn bare_kings_are_a_registered_draw() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(pos.material_rule(), Some(MaterialRule::Draw));
        assert_eq!(material_rule(0x1234), None);
    }

    #[test]
    fn lone_minor_against_pawns_is_capped_at_a_draw() {
        let pos = Position::from_fen("4k3/8/8/4p3/8/8/8/2B1K3 w - - 0 1").expect("FEN should parse");
        let rule = pos.material_rule().expect("rule should be registered");
        assert_eq!(
            rule,
            MaterialRule::Saturation {
                bound: SaturationBound::High,
                value: 0
            }
        );
        assert_eq!(rule.saturate(250), 0);
        assert_eq!(rule.saturate(-400), -400);

        let key = material_key_for_code("KNvKPP", Color::Dark).expect("code should parse");
        let rule = material_rule(key).expect("rule should be registered");
        assert_eq!(rule.saturate(-300), 0);
        assert_eq!(rule.saturate(120), 120);
    }

    #[test]
    fn non_saturation_rules_pass_scores_through() {
        assert_eq!(MaterialRule::Draw.saturate(75), 75);
        let exact = MaterialRule::ExactFunction {
            kind: EndgameKind::QueenVersusRook,
            strong: Color::Light,
        };
        assert_eq!(exact.saturate(-20), -20);
    }
}
