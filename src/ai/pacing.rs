use std::time::Duration;

use web_time::Instant;

/// Pause before an automated move is applied, so the reply does not land
/// in the same frame as the player's own move.
const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Cooperative pacing for the automated opponent.
///
/// The engine never blocks: callers arm the pacer when the automated side's
/// turn begins, keep the board read-only, and apply the selected move once
/// [`MovePacer::ready`] reports true.
#[derive(Debug, Clone, Copy)]
pub struct MovePacer {
    delay: Duration,
    armed_at: Option<Instant>,
}

impl MovePacer {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            armed_at: None,
        }
    }

    /// Starts the countdown for the upcoming automated move.
    pub fn arm(&mut self) {
        self.armed_at = Some(Instant::now());
    }

    /// Cancels a pending countdown (game over, player abandoned).
    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once the configured delay has elapsed since [`MovePacer::arm`].
    pub fn ready(&self) -> bool {
        self.armed_at
            .is_some_and(|armed_at| armed_at.elapsed() >= self.delay)
    }
}

impl Default for MovePacer {
    fn default() -> Self {
        Self::new()
    }
}
