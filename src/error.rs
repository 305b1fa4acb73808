use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("band lower bound {lo} is greater than upper bound {hi}")]
    InvertedBand { lo: i32, hi: i32 },

    #[error(
        "band [{lo}, {hi}] does not intersect the diagonals of a {query_len}x{target_len} matrix"
    )]
    BandOutOfRange {
        lo: i32,
        hi: i32,
        query_len: usize,
        target_len: usize,
    },

    #[error("x-drop threshold must be positive, got {0}")]
    NonPositiveDropThreshold(i32),

    #[error("anchor ({query}, {target}) lies outside sequences of length {query_len} and {target_len}")]
    AnchorOutOfRange {
        query: usize,
        target: usize,
        query_len: usize,
        target_len: usize,
    },

    #[error("gap penalty {0} does not fit an 8-bit lane (max {max})", max = crate::r#const::MAX_GAP_PENALTY)]
    GapPenaltyTooLarge(u16),

    #[error("batch of {got} targets exceeds the {lanes} lanes of the engine")]
    BatchTooLarge { got: usize, lanes: usize },

    #[error("engine {0} is not supported by this cpu")]
    UnsupportedEngine(&'static str),

    #[error("unknown engine {0:?}")]
    UnknownEngine(String),

    #[error("letter {letter} is outside the {alphabet_size} letter alphabet of the matrix")]
    LetterOutOfAlphabet { letter: u8, alphabet_size: usize },

    #[error("invalid score matrix: {0}")]
    InvalidMatrix(String),
}
