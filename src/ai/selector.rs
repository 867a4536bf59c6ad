use rand::Rng;

use crate::board::Board;
use crate::game::MoveSelector;
use crate::types::Player;

/// Uniform random choice among the current legal moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMoveSelector;

impl MoveSelector for RandomMoveSelector {
    fn select(&self, board: &Board, player: Player) -> Option<usize> {
        let legal = board.legal_moves(player);
        if legal.is_empty() {
            return None;
        }
        let pick = rand::thread_rng().gen_range(0..legal.len());
        legal.keys().nth(pick).copied()
    }
}
