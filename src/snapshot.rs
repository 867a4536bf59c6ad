use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::game::Game;
use crate::types::{Disc, Player};

const MAGIC: &[u8; 4] = b"OSAV";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 16;

/// Serializable projection of a suspended game.
///
/// Everything a resumed game needs is carried verbatim; scores are derived
/// state and recomputed on restore. The struct round-trips through any
/// serde format, and [`GameSnapshot::encode`] provides the crate's own
/// checksummed binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board edge length.
    pub size: usize,
    /// Flat occupancies, one byte per square (0=empty, 1=black, 2=white).
    pub cells: Vec<u8>,
    /// Per-square mask of the discs flipped by the most recent move.
    pub last_flipped: Vec<bool>,
    pub current_player: Player,
    pub time_black: Duration,
    pub time_white: Duration,
    pub vs_ai: bool,
}

impl GameSnapshot {
    /// Captures the full persisted state of `game`.
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let total = board.size() * board.size();

        let mut last_flipped = vec![false; total];
        for &index in board.last_flipped() {
            last_flipped[index] = true;
        }

        Self {
            size: board.size(),
            cells: board.cells().map(|cell| cell.disc.code()).collect(),
            last_flipped,
            current_player: game.current_player(),
            time_black: game.time_left(Player::Black),
            time_white: game.time_left(Player::White),
            vs_ai: game.is_vs_ai(),
        }
    }

    /// Checks the structural invariants without building a game.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.decode_cells().map(|_| ())
    }

    /// Validates the stored fields and converts the occupancies to discs.
    pub(crate) fn decode_cells(&self) -> Result<Vec<Disc>, SnapshotError> {
        if self.size == 0 || self.size % 2 != 0 {
            return Err(SnapshotError::BoardSize { size: self.size });
        }
        let total = self
            .size
            .checked_mul(self.size)
            .ok_or(SnapshotError::BoardSize { size: self.size })?;

        if self.cells.len() != total {
            return Err(SnapshotError::CellCount {
                expected: total,
                actual: self.cells.len(),
            });
        }
        if self.last_flipped.len() != total {
            return Err(SnapshotError::CellCount {
                expected: total,
                actual: self.last_flipped.len(),
            });
        }

        self.cells
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Disc::from_code(value).ok_or(SnapshotError::InvalidCell { index, value })
            })
            .collect()
    }

    /// Serializes into the crate's binary save layout:
    /// a 16-byte header (magic, version, board size, CRC32 of the payload)
    /// followed by the payload (occupancies, flip mask, player to move,
    /// both countdowns in milliseconds, automated-opponent flag).
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(2 * self.cells.len() + 18);
        payload.extend_from_slice(&self.cells);
        payload.extend(self.last_flipped.iter().map(|&flipped| flipped as u8));
        payload.push(self.current_player.code());
        payload.extend_from_slice(&duration_millis(self.time_black).to_le_bytes());
        payload.extend_from_slice(&duration_millis(self.time_white).to_le_bytes());
        payload.push(self.vs_ai as u8);

        let crc = crc32fast::hash(&payload);
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(self.size as u32).to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&payload);

        tracing::debug!(size = self.size, bytes = out.len(), "encoded game snapshot");
        out
    }

    /// Deserializes a blob produced by [`GameSnapshot::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, SnapshotError> {
        if data.len() < HEADER_SIZE {
            return Err(SnapshotError::Truncated);
        }
        if &data[0..4] != MAGIC {
            return Err(SnapshotError::BadMagic);
        }

        let version = read_u32_le(data, 4)?;
        if version != VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let size = read_u32_le(data, 8)? as usize;
        if size == 0 || size % 2 != 0 {
            return Err(SnapshotError::BoardSize { size });
        }
        let total = size
            .checked_mul(size)
            .ok_or(SnapshotError::BoardSize { size })?;
        let payload_len = total
            .checked_mul(2)
            .and_then(|n| n.checked_add(18))
            .ok_or(SnapshotError::BoardSize { size })?;
        match data.len().cmp(&(HEADER_SIZE + payload_len)) {
            std::cmp::Ordering::Less => return Err(SnapshotError::Truncated),
            std::cmp::Ordering::Greater => return Err(SnapshotError::TrailingBytes),
            std::cmp::Ordering::Equal => {}
        }

        let expected = read_u32_le(data, 12)?;
        let payload = &data[HEADER_SIZE..];
        let actual = crc32fast::hash(payload);
        if actual != expected {
            return Err(SnapshotError::ChecksumMismatch { expected, actual });
        }

        let cells = payload[..total].to_vec();
        for (index, &value) in cells.iter().enumerate() {
            if Disc::from_code(value).is_none() {
                return Err(SnapshotError::InvalidCell { index, value });
            }
        }
        let last_flipped = payload[total..2 * total]
            .iter()
            .map(|&value| value != 0)
            .collect();

        let mut offset = 2 * total;
        let player_code = payload[offset];
        let current_player =
            Player::from_code(player_code).ok_or(SnapshotError::InvalidPlayer(player_code))?;
        offset += 1;
        let time_black = Duration::from_millis(read_u64_le(payload, offset)?);
        offset += 8;
        let time_white = Duration::from_millis(read_u64_le(payload, offset)?);
        offset += 8;
        let vs_ai = payload[offset] != 0;

        tracing::debug!(size, "decoded game snapshot");
        Ok(Self {
            size,
            cells,
            last_flipped,
            current_player,
            time_black,
            time_white,
            vs_ai,
        })
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, SnapshotError> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(SnapshotError::Truncated)?;
    let mut out = [0u8; 4];
    out.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(out))
}

fn read_u64_le(data: &[u8], offset: usize) -> Result<u64, SnapshotError> {
    let bytes = data
        .get(offset..offset + 8)
        .ok_or(SnapshotError::Truncated)?;
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{FirstLegalMoveSelector, GameConfig};
    use crate::types::Disc;

    const SIZE: usize = 8;

    fn idx(row: usize, col: usize) -> usize {
        row * SIZE + col
    }

    fn blank_snapshot() -> GameSnapshot {
        GameSnapshot {
            size: SIZE,
            cells: vec![0; SIZE * SIZE],
            last_flipped: vec![false; SIZE * SIZE],
            current_player: Player::Black,
            time_black: Duration::ZERO,
            time_white: Duration::ZERO,
            vs_ai: false,
        }
    }

    fn timed_game_after_two_moves() -> Game {
        let config = GameConfig {
            initial_time: Duration::from_secs(300),
            ..GameConfig::default()
        };
        let mut game = Game::new(config, Box::new(FirstLegalMoveSelector)).unwrap();
        assert!(game.play(idx(2, 4)));
        game.advance_clock(Player::White, Duration::from_millis(7_250));
        assert!(game.play(idx(2, 3)));
        game
    }

    #[test]
    fn capture_restore_reproduces_the_whole_game_state() {
        let game = timed_game_after_two_moves();
        let snapshot = GameSnapshot::capture(&game);

        let restored = Game::restore(&snapshot, Box::new(FirstLegalMoveSelector)).unwrap();

        assert_eq!(restored.status(), game.status());
        assert_eq!(restored.last_flipped(), game.last_flipped());
        assert_eq!(restored.current_player(), game.current_player());
        assert_eq!(restored.is_vs_ai(), game.is_vs_ai());
        for player in [Player::Black, Player::White] {
            assert_eq!(restored.time_left(player), game.time_left(player));
            // Scores are not stored; they must come back derived.
            assert_eq!(restored.score(player), game.score(player));
        }
    }

    #[test]
    fn binary_encoding_round_trips_every_field() {
        let snapshot = GameSnapshot::capture(&timed_game_after_two_moves());

        let decoded = GameSnapshot::decode(&snapshot.encode()).unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn serde_round_trip_preserves_the_snapshot() {
        let snapshot = GameSnapshot::capture(&timed_game_after_two_moves());

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: GameSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn restoring_an_all_empty_center_reseeds_the_opening() {
        let game = Game::restore(&blank_snapshot(), Box::new(FirstLegalMoveSelector)).unwrap();

        let board = game.board();
        assert_eq!(board.cell(idx(3, 3)).unwrap().disc, Disc::Black);
        assert_eq!(board.cell(idx(3, 4)).unwrap().disc, Disc::White);
        assert_eq!(board.cell(idx(4, 3)).unwrap().disc, Disc::White);
        assert_eq!(board.cell(idx(4, 4)).unwrap().disc, Disc::Black);
        assert_eq!(game.score(Player::Black), 2);
        assert_eq!(game.score(Player::White), 2);
    }

    #[test]
    fn restoring_with_any_occupied_center_trusts_the_stored_cells() {
        let mut snapshot = blank_snapshot();
        snapshot.cells[idx(3, 4)] = 2;

        let game = Game::restore(&snapshot, Box::new(FirstLegalMoveSelector)).unwrap();

        let board = game.board();
        assert_eq!(board.cell(idx(3, 3)).unwrap().disc, Disc::Empty);
        assert_eq!(board.cell(idx(3, 4)).unwrap().disc, Disc::White);
        assert_eq!(board.cell(idx(4, 4)).unwrap().disc, Disc::Empty);
        assert_eq!(game.score(Player::White), 1);
    }

    #[test]
    fn restore_rejects_an_odd_board_size() {
        let mut snapshot = blank_snapshot();
        snapshot.size = 7;

        let err = Game::restore(&snapshot, Box::new(FirstLegalMoveSelector)).unwrap_err();
        assert_eq!(err, SnapshotError::BoardSize { size: 7 });
    }

    #[test]
    fn restore_rejects_a_wrong_cell_count() {
        let mut snapshot = blank_snapshot();
        snapshot.cells.pop();

        let err = Game::restore(&snapshot, Box::new(FirstLegalMoveSelector)).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::CellCount {
                expected: 64,
                actual: 63
            }
        );
    }

    #[test]
    fn restore_rejects_an_out_of_range_occupancy() {
        let mut snapshot = blank_snapshot();
        snapshot.cells[5] = 3;

        let err = Game::restore(&snapshot, Box::new(FirstLegalMoveSelector)).unwrap_err();
        assert_eq!(err, SnapshotError::InvalidCell { index: 5, value: 3 });
    }

    #[test]
    fn decode_rejects_invalid_magic() {
        let mut bytes = blank_snapshot().encode();
        bytes[0] = b'X';

        assert_eq!(GameSnapshot::decode(&bytes), Err(SnapshotError::BadMagic));
    }

    #[test]
    fn decode_rejects_unsupported_version() {
        let mut bytes = blank_snapshot().encode();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());

        assert_eq!(
            GameSnapshot::decode(&bytes),
            Err(SnapshotError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn decode_rejects_a_corrupted_payload() {
        let mut bytes = blank_snapshot().encode();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        assert!(matches!(
            GameSnapshot::decode(&bytes),
            Err(SnapshotError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn decode_rejects_truncated_and_padded_blobs() {
        let bytes = blank_snapshot().encode();

        assert_eq!(
            GameSnapshot::decode(&bytes[..bytes.len() - 1]),
            Err(SnapshotError::Truncated)
        );
        assert_eq!(
            GameSnapshot::decode(&bytes[..8]),
            Err(SnapshotError::Truncated)
        );

        let mut padded = bytes.clone();
        padded.push(0);
        assert_eq!(
            GameSnapshot::decode(&padded),
            Err(SnapshotError::TrailingBytes)
        );
    }

    #[test]
    fn decode_rejects_an_invalid_cell_value_behind_a_valid_checksum() {
        let mut snapshot = blank_snapshot();
        snapshot.cells[9] = 7;
        let bytes = snapshot.encode();

        assert_eq!(
            GameSnapshot::decode(&bytes),
            Err(SnapshotError::InvalidCell { index: 9, value: 7 })
        );
    }

    #[test]
    fn decode_rejects_an_invalid_player_behind_a_valid_checksum() {
        let snapshot = blank_snapshot();
        let mut bytes = snapshot.encode();
        // The player byte sits right after both cell tables.
        let player_at = HEADER_SIZE + 2 * SIZE * SIZE;
        bytes[player_at] = 9;
        let crc = crc32fast::hash(&bytes[HEADER_SIZE..]);
        bytes[12..16].copy_from_slice(&crc.to_le_bytes());

        assert_eq!(
            GameSnapshot::decode(&bytes),
            Err(SnapshotError::InvalidPlayer(9))
        );
    }
}
