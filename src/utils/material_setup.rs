//! Canonical positions for material signatures.
//!
//! Both sides line up from the a-file, king first: the strong side on the
//! second rank, the weak side on the seventh. Light is always to move.

use crate::chess_errors::SetupError;
use crate::game_state::chess_types::*;
use crate::search::material_keys::split_code;

fn rank_field(side: &str, color: Color) -> String {
    let mut out: String = match color {
        Color::Light => side.to_ascii_uppercase(),
        Color::Dark => side.to_ascii_lowercase(),
    };
    if side.len() < 8 {
        out.push(char::from(b'0' + (8 - side.len()) as u8));
    }
    out
}

/// FEN of the canonical position for `code`, with the strong side playing `strong`.
pub fn material_fen(code: &str, strong: Color) -> Result<String, SetupError> {
    let (strong_side, weak_side) = split_code(code)?;
    Ok(format!(
        "8/{}/8/8/8/8/{}/8 w - - 0 10",
        rank_field(&weak_side, strong.opposite()),
        rank_field(&strong_side, strong)
    ))
}

impl Position {
    /// Loads the canonical position for a material signature such as `KQvKR`.
    /// On error the position is left untouched.
    pub fn setup_material(&mut self, code: &str, strong: Color) -> Result<(), SetupError> {
        let fen = material_fen(code, strong)?;
        self.setup_from_fen(&fen)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::material_fen;
    use crate::chess_errors::SetupError;
    use crate::game_state::chess_types::*;
    use crate::search::material_keys::{material_key_for_code, EndgameKind, MaterialRule};

    #[test]
    fn canonical_layouts() {
        assert_eq!(
            material_fen("KQvKR", Color::Light).expect("code should parse"),
            "8/kr6/8/8/8/8/KQ6/8 w - - 0 10"
        );
        assert_eq!(
            material_fen("KRKR", Color::Dark).expect("code should parse"),
            "8/KR6/8/8/8/8/kr6/8 w - - 0 10"
        );
        assert_eq!(
            material_fen("KNNNNNNNvK", Color::Light).expect("code should parse"),
            "8/k7/8/8/8/8/KNNNNNNN/8 w - - 0 10"
        );
    }

    #[test]
    fn setup_matches_signature_key_and_rule() {
        let mut pos = Position::new();
        pos.setup_material("KQvKR", Color::Light).expect("setup should succeed");
        assert_eq!(pos.audit(), Ok(()));
        assert_eq!(
            pos.material_key(),
            material_key_for_code("KQvKR", Color::Light).expect("code should parse")
        );
        assert_eq!(
            pos.material_rule(),
            Some(MaterialRule::ExactFunction {
                kind: EndgameKind::QueenVersusRook,
                strong: Color::Light
            })
        );
        assert_eq!(pos.fullmove_number(), 10);

        pos.setup_material("KRvK", Color::Dark).expect("setup should succeed");
        assert_eq!(
            pos.material_rule(),
            Some(MaterialRule::ExactFunction {
                kind: EndgameKind::MateWithMajor,
                strong: Color::Dark
            })
        );
    }

    #[test]
    fn bad_codes_leave_position_untouched() {
        let mut pos = Position::new();
        let key = pos.key();
        assert!(matches!(
            pos.setup_material("QvK", Color::Light),
            Err(SetupError::MalformedCode(_))
        ));
        assert_eq!(pos.key(), key);
    }
}
