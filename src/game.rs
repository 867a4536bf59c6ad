use std::time::Duration;

use crate::board::{Board, LegalMoves};
use crate::clock::GameClock;
use crate::error::{GameSetupError, SnapshotError};
use crate::snapshot::GameSnapshot;
use crate::types::{EndReason, GameOutcome, GameStatus, Player, Position};

/// One handicap disc per corner at most.
const MAX_HANDICAP: u8 = 4;

/// Strategy hook for the automated opponent.
pub trait MoveSelector: Send + Sync {
    /// Picks a target index among `player`'s legal moves, or `None` when
    /// there is nothing to play.
    fn select(&self, board: &Board, player: Player) -> Option<usize>;
}

/// Deterministic selector: lowest legal index first.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select(&self, board: &Board, player: Player) -> Option<usize> {
        board.legal_moves(player).keys().next().copied()
    }
}

/// Construction inputs for a fresh game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Board edge length; must be even and larger than 0.
    pub size: usize,
    /// Whether White is played by the configured selector.
    pub vs_ai: bool,
    /// Corner discs pre-placed for White before play begins, 0..=4.
    pub handicap: u8,
    /// Per-player countdown; `Duration::ZERO` disables timed mode.
    pub initial_time: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 8,
            vs_ai: false,
            handicap: 0,
            initial_time: Duration::ZERO,
        }
    }
}

/// A running game: the board plus turn sequencing, clocks and end detection.
pub struct Game {
    board: Board,
    current_player: Player,
    clock: GameClock,
    vs_ai: bool,
    over: Option<EndReason>,
    selector: Box<dyn MoveSelector>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("current_player", &self.current_player)
            .field("clock", &self.clock)
            .field("vs_ai", &self.vs_ai)
            .field("over", &self.over)
            .field("selector", &"<dyn MoveSelector>")
            .finish()
    }
}

impl Game {
    /// Starts a fresh game from `config`. Black moves first.
    pub fn new(config: GameConfig, selector: Box<dyn MoveSelector>) -> Result<Self, GameSetupError> {
        if config.handicap > MAX_HANDICAP {
            return Err(GameSetupError::Handicap {
                count: config.handicap,
            });
        }

        let mut board = Board::new(config.size)?;
        if config.handicap > 0 {
            board.apply_handicap(config.handicap);
        }

        Ok(Self {
            board,
            current_player: Player::Black,
            clock: GameClock::new(config.initial_time),
            vs_ai: config.vs_ai,
            over: None,
            selector,
        })
    }

    /// Resumes a suspended game from `snapshot`.
    ///
    /// The snapshot is validated in full first; a malformed one is rejected
    /// without producing a game. A resumed position may already be terminal
    /// (no moves on either side, or a depleted countdown) and is then
    /// reported as over right away.
    pub fn restore(
        snapshot: &GameSnapshot,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, SnapshotError> {
        let cells = snapshot.decode_cells()?;
        let flips = snapshot
            .last_flipped
            .iter()
            .enumerate()
            .filter_map(|(index, &flipped)| flipped.then_some(index))
            .collect();

        let board = Board::from_parts(snapshot.size, cells, flips);
        let clock = GameClock::from_parts(snapshot.time_black, snapshot.time_white);

        let mut game = Self {
            board,
            current_player: snapshot.current_player,
            clock,
            vs_ai: snapshot.vs_ai,
            over: None,
            selector,
        };

        if game.board.legal_moves(Player::Black).is_empty()
            && game.board.legal_moves(Player::White).is_empty()
        {
            game.over = Some(EndReason::NoMoves);
        } else if game.clock.is_timed() {
            for player in [Player::Black, Player::White] {
                if game.clock.remaining(player).is_zero() {
                    game.over = Some(EndReason::ClockOut(player));
                }
            }
        }

        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_vs_ai(&self) -> bool {
        self.vs_ai
    }

    /// Legal moves for `player` on the current position.
    pub fn legal_moves(&self, player: Player) -> LegalMoves {
        self.board.legal_moves(player)
    }

    /// Legal targets for the player to move, as board coordinates.
    pub fn legal_positions(&self) -> Vec<Position> {
        self.board
            .legal_moves(self.current_player)
            .keys()
            .map(|&index| self.board.position(index))
            .collect()
    }

    pub fn score(&self, player: Player) -> usize {
        self.board.score(player)
    }

    pub fn last_flipped(&self) -> &[usize] {
        self.board.last_flipped()
    }

    /// Remaining time for `player`; zero in untimed games.
    pub fn time_left(&self, player: Player) -> Duration {
        self.clock.remaining(player)
    }

    pub fn is_over(&self) -> bool {
        self.over.is_some()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.over
    }

    /// The final report, once the game is over.
    ///
    /// A clock-out names the surviving player as winner regardless of the
    /// disc counts; a no-moves ending is decided by score, equal scores
    /// being a draw.
    pub fn outcome(&self) -> Option<GameOutcome> {
        let reason = self.over?;
        let black_score = self.board.score(Player::Black);
        let white_score = self.board.score(Player::White);

        let winner = match reason {
            EndReason::ClockOut(loser) => Some(loser.opponent()),
            EndReason::NoMoves => match black_score.cmp(&white_score) {
                std::cmp::Ordering::Greater => Some(Player::Black),
                std::cmp::Ordering::Less => Some(Player::White),
                std::cmp::Ordering::Equal => None,
            },
        };

        Some(GameOutcome {
            winner,
            black_score,
            white_score,
            reason,
        })
    }

    /// Public projection of the whole game state.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            board: self.board.cells().map(|cell| cell.disc.code()).collect(),
            current_player: self.current_player,
            black_score: self.board.score(Player::Black),
            white_score: self.board.score(Player::White),
            is_over: self.is_over(),
            last_flipped: self.board.last_flipped().to_vec(),
        }
    }

    /// Applies the active player's move at `target` and advances the turn.
    ///
    /// Returns false, leaving everything unchanged, when the game is over
    /// or `target` is not a legal move.
    pub fn play(&mut self, target: usize) -> bool {
        if self.over.is_some() {
            return false;
        }

        let mover = self.current_player;
        let legal = self.board.legal_moves(mover);
        if !self.board.place(target, mover, &legal) {
            return false;
        }

        self.advance_turn(mover);
        true
    }

    /// Plays one automated move for White via the configured selector.
    ///
    /// Only meaningful when the game was configured against an automated
    /// opponent and it is White's turn. A selector returning an illegal
    /// target is reported as failure with the board untouched.
    pub fn play_automated(&mut self) -> bool {
        if self.over.is_some() || !self.vs_ai || self.current_player != Player::White {
            return false;
        }

        let Some(target) = self.selector.select(&self.board, Player::White) else {
            return false;
        };
        self.play(target)
    }

    /// Drains `delta` from `player`'s countdown, in timed mode and only
    /// while `player` is the one to move. A depleted countdown ends the
    /// game immediately.
    pub fn advance_clock(&mut self, player: Player, delta: Duration) {
        if self.over.is_some() || player != self.current_player {
            return;
        }
        if self.clock.drain(player, delta) {
            self.over = Some(EndReason::ClockOut(player));
        }
    }

    /// After a successful move by `mover`: the opponent plays next when
    /// able, otherwise the turn stays with `mover` (forced pass for the
    /// opponent); with no moves on either side the game is over.
    fn advance_turn(&mut self, mover: Player) {
        let opponent = mover.opponent();
        if !self.board.legal_moves(opponent).is_empty() {
            self.current_player = opponent;
        } else if self.board.legal_moves(mover).is_empty() {
            self.over = Some(EndReason::NoMoves);
        }
        // Forced pass: the turn stays with the mover.
    }

    #[cfg(test)]
    pub(crate) fn set_position_for_test(
        &mut self,
        cells: Vec<crate::types::Disc>,
        current_player: Player,
    ) {
        self.board = Board::from_parts(self.board.size(), cells, Vec::new());
        self.current_player = current_player;
        self.over = None;
    }
}
