use std::collections::BTreeMap;

use crate::error::GameSetupError;
use crate::types::{Cell, Disc, Player, Position};

/// The 8 scan rays as (row delta, col delta) offsets.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Seeding pattern for the four center squares, in index order.
const OPENING: [Disc; 4] = [Disc::Black, Disc::White, Disc::White, Disc::Black];

/// Map from a legal target index to every opponent disc that move flips.
pub type LegalMoves = BTreeMap<usize, Vec<usize>>;

/// An Othello position: the owned cell array plus the state derived from it.
///
/// Cells are addressed by row-major index; neighbor relations come from
/// row/column arithmetic so a scan never wraps across a row boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Disc>,
    last_flipped: Vec<usize>,
    scores: [usize; 2],
}

impl Board {
    /// Creates a `size` x `size` board seeded with the four center discs.
    pub fn new(size: usize) -> Result<Self, GameSetupError> {
        if size == 0 || size % 2 != 0 {
            return Err(GameSetupError::BoardSize { size });
        }

        let mut board = Self {
            size,
            cells: vec![Disc::Empty; size * size],
            last_flipped: Vec::new(),
            scores: [0, 0],
        };
        board.seed_center();
        board.update_scores();
        Ok(board)
    }

    /// Rebuilds a board from stored state. Lengths are the caller's contract.
    ///
    /// A position whose four center squares are all empty is treated as a
    /// fresh game and re-seeded; any occupied center square means the stored
    /// occupancies win.
    pub(crate) fn from_parts(size: usize, cells: Vec<Disc>, last_flipped: Vec<usize>) -> Self {
        let mut board = Self {
            size,
            cells,
            last_flipped,
            scores: [0, 0],
        };
        if board
            .center_indices()
            .into_iter()
            .all(|i| board.cells[i].is_empty())
        {
            board.seed_center();
        }
        board.update_scores();
        board
    }

    /// The four center indices in seeding order.
    fn center_indices(&self) -> [usize; 4] {
        let mid = self.size * self.size / 2 - self.size / 2;
        [mid - 1, mid, mid + self.size - 1, mid + self.size]
    }

    fn seed_center(&mut self) {
        for (index, disc) in self.center_indices().into_iter().zip(OPENING) {
            self.cells[index] = disc;
        }
    }

    /// Pre-places up to four handicap discs for White, one per corner.
    /// Corner order: top-left, top-right, bottom-left, bottom-right.
    pub(crate) fn apply_handicap(&mut self, count: u8) {
        let corners = [
            0,
            self.size - 1,
            self.size * (self.size - 1),
            self.size * self.size - 1,
        ];
        for &corner in corners.iter().take(count as usize) {
            self.cells[corner] = Disc::White;
        }
        self.update_scores();
    }

    /// The board's edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The cell at `index`, or `None` when out of range.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).map(|&disc| Cell::new(index, disc))
    }

    /// Iterates over every cell in index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, &disc)| Cell::new(index, disc))
    }

    /// The number of discs `player` currently has on the board.
    pub fn score(&self, player: Player) -> usize {
        match player {
            Player::Black => self.scores[0],
            Player::White => self.scores[1],
        }
    }

    /// The number of empty squares.
    pub fn empty_count(&self) -> usize {
        self.size * self.size - self.scores[0] - self.scores[1]
    }

    /// Indices of exactly the discs flipped by the most recent move.
    /// Empty after construction, before any move.
    pub fn last_flipped(&self) -> &[usize] {
        &self.last_flipped
    }

    /// Row/column coordinates of `index`.
    pub fn position(&self, index: usize) -> Position {
        Position {
            row: index / self.size,
            col: index % self.size,
        }
    }

    /// Row-major index of a coordinate pair.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Returns every legal move for `player`, mapped to the discs it flips.
    ///
    /// An empty square qualifies iff at least one of the 8 rays from it
    /// holds a contiguous run of opponent discs terminated by one of
    /// `player`'s own discs; squares with nothing to flip are absent.
    pub fn legal_moves(&self, player: Player) -> LegalMoves {
        let mut moves = LegalMoves::new();
        for index in 0..self.cells.len() {
            if !self.cells[index].is_empty() {
                continue;
            }
            let flips = self.collect_flips(index, player);
            if !flips.is_empty() {
                moves.insert(index, flips);
            }
        }
        moves
    }

    /// Walks all 8 rays from `index` and gathers every disc a move by
    /// `player` there would flip.
    ///
    /// A ray contributes only when it starts with opponent discs and ends at
    /// one of `player`'s discs; the board edge or an empty square kills it.
    fn collect_flips(&self, index: usize, player: Player) -> Vec<usize> {
        let own = player.disc();
        let opponent = player.opponent().disc();
        let edge = self.size as isize;
        let row = (index / self.size) as isize;
        let col = (index % self.size) as isize;

        let mut flips = Vec::new();
        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = Vec::new();

            while r >= 0 && r < edge && c >= 0 && c < edge {
                let pos = (r * edge + c) as usize;
                if self.cells[pos] == opponent {
                    line.push(pos);
                } else {
                    if self.cells[pos] == own && !line.is_empty() {
                        flips.append(&mut line);
                    }
                    break;
                }
                r += dr;
                c += dc;
            }
        }
        flips
    }

    /// Places a disc for `player` at `target` if it is a key of `legal`.
    ///
    /// `legal` must come from [`Board::legal_moves`] for `player` on the
    /// current position. On success the flip set and the target become
    /// `player`'s discs, the flip set replaces the last-flipped record and
    /// both scores are recomputed from the full board. On failure nothing
    /// changes.
    pub fn place(&mut self, target: usize, player: Player, legal: &LegalMoves) -> bool {
        let Some(flips) = legal.get(&target) else {
            tracing::warn!(index = target, "rejected illegal move");
            return false;
        };

        for &pos in flips {
            self.cells[pos] = player.disc();
        }
        self.cells[target] = player.disc();
        self.last_flipped = flips.clone();
        self.update_scores();
        true
    }

    fn update_scores(&mut self) {
        let mut black = 0;
        let mut white = 0;
        for &disc in &self.cells {
            match disc {
                Disc::Black => black += 1,
                Disc::White => white += 1,
                Disc::Empty => {}
            }
        }
        self.scores = [black, white];
    }
}
