use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(
        "vector for '{word}' has dimension {found} which differs from initial dimension {expected}"
    )]
    DimensionMismatch {
        word: String,
        expected: usize,
        found: usize,
    },

    #[error("vector for '{0}' has zero dimensions, cannot proceed")]
    ZeroDimensions(String),

    #[error("no word vectors found")]
    EmptyVectors,

    #[error("'{0}' is out of vocabulary")]
    WordNotFound(String),

    /// A sample larger than its category was requested.
    #[error("category '{category}' has {available} questions, cannot sample {requested}")]
    InsufficientPopulation {
        category: String,
        requested: usize,
        available: usize,
    },

    #[error("sample size must be at least 1")]
    InvalidSampleSize,
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
