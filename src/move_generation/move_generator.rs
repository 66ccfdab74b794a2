use thiserror::Error;

use crate::game_state::chess_types::Position;
use crate::moves::move_descriptions::Move;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("move generation is not implemented yet")]
    NotImplemented,
    #[error("perft worker thread panicked")]
    WorkerPanicked,
}

/// Source of legal moves for perft and other drivers of the move applier.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<Move>>;
}

pub struct NullMoveGenerator;

impl MoveGenerator for NullMoveGenerator {
    fn generate_legal_moves(&self, _position: &Position) -> MoveGenResult<Vec<Move>> {
        Err(MoveGenerationError::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_generator_reports_not_implemented() {
        let pos = Position::new();
        assert_eq!(
            NullMoveGenerator.generate_legal_moves(&pos),
            Err(MoveGenerationError::NotImplemented)
        );
    }
}
