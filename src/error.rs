//! Error types shared by the catalog, quiz logic and score store.

use crate::sample::SampleId;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Everything that can go wrong (or end) while running a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Catalog source unreachable, unparseable, or rejected under strict loading.
    #[error("Failed to load sample catalog: {0}")]
    Load(String),

    /// A sample id that is not part of the loaded catalog.
    #[error("No sample with id {0} in the catalog")]
    NotFound(SampleId),

    /// Fewer than two samples remain; no further question can be asked.
    /// This is the normal end of a game, not a failure.
    #[error("Game over: not enough samples left for another question")]
    GameOver,

    /// An empty question was handed to answer checking.
    #[error("Invalid question: no answer options")]
    InvalidQuestion,

    /// Score store failure.
    #[error("Score store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// `true` for the terminal [`QuizError::GameOver`] signal.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver)
    }
}
