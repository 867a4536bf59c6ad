use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Player;

/// Independent countdowns for both players.
///
/// A zero initial duration disables timed mode entirely: the game then has
/// no time pressure, not a zero-length clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    black: Duration,
    white: Duration,
}

impl GameClock {
    /// Starts both countdowns from the same configured duration.
    pub fn new(initial: Duration) -> Self {
        Self {
            black: initial,
            white: initial,
        }
    }

    pub(crate) fn from_parts(black: Duration, white: Duration) -> Self {
        Self { black, white }
    }

    /// Whether this game is played under time pressure at all.
    pub fn is_timed(&self) -> bool {
        !(self.black.is_zero() && self.white.is_zero())
    }

    /// Remaining time for `player`.
    pub fn remaining(&self, player: Player) -> Duration {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Drains `delta` from `player`'s countdown, stopping at zero.
    /// Returns true when that countdown is now depleted (timed mode only).
    pub(crate) fn drain(&mut self, player: Player, delta: Duration) -> bool {
        if !self.is_timed() {
            return false;
        }
        let remaining = match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        };
        *remaining = remaining.saturating_sub(delta);
        remaining.is_zero()
    }
}

impl Default for GameClock {
    /// An untimed clock.
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
