use thiserror::Error;

/// Rejected construction inputs for a fresh game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameSetupError {
    #[error("board size must be even and larger than 0, got {size}")]
    BoardSize { size: usize },

    #[error("handicap is limited to the four corners, got {count}")]
    Handicap { count: u8 },
}

/// Failures while validating or decoding a stored game snapshot.
///
/// Restoration either yields a fully consistent game or one of these; a
/// partially initialized board is never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("not a saved game (invalid magic)")]
    BadMagic,

    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),

    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("saved game data is truncated")]
    Truncated,

    #[error("saved game data has trailing bytes")]
    TrailingBytes,

    #[error("board size must be even and larger than 0, got {size}")]
    BoardSize { size: usize },

    #[error("expected {expected} cell values, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("invalid cell value {value} at index {index}")]
    InvalidCell { index: usize, value: u8 },

    #[error("invalid player value {0}")]
    InvalidPlayer(u8),
}
