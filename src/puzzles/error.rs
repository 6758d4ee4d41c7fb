//! Errors raised while building packs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("puzzle {id} has an invalid position: {message}")]
    Fen { id: String, message: String },

    #[error("puzzle {id} has an unplayable move {uci}: {message}")]
    Move {
        id: String,
        uci: String,
        message: String,
    },

    #[error("puzzle {id} has no moves")]
    NoMoves { id: String },

    #[error("unknown filter preset '{0}'")]
    UnknownPreset(String),
}
