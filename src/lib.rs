//! Rules engine for the board game Othello (Reversi).
//!
//! The crate exposes a pure data-and-rules surface: [`Board`] derives and
//! applies moves, [`Game`] sequences turns, passes, clocks and end-of-game
//! detection, and [`GameSnapshot`] suspends and resumes a game losslessly.
//! Any caller (a GUI, a CLI, a test harness) drives it the same way.

pub mod ai;
pub mod board;
pub mod clock;
pub mod error;
pub mod game;
pub mod snapshot;
pub mod types;

pub use board::{Board, LegalMoves};
pub use clock::GameClock;
pub use error::{GameSetupError, SnapshotError};
pub use game::{FirstLegalMoveSelector, Game, GameConfig, MoveSelector};
pub use snapshot::GameSnapshot;
pub use types::{Cell, Disc, EndReason, GameOutcome, GameStatus, Player, Position};
