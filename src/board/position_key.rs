//! Zobrist-style position hashing for repetition detection.
//!
//! Keyed by grid square index rather than bit index, and deliberately
//! excluding the halfmove/fullmove counters from the hash.
use super::board::Board;
use super::color::Color;
use super::piece::PieceKind;
use once_cell::sync::Lazy;
use rand::Rng;

const NUM_SQUARES: usize = 64;
const NUM_PIECE_KINDS: usize = 6;
const NUM_COLORS: usize = 2;

pub type PositionKey = u64;

fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    }
}

struct Zobrist {
    table: [[[u64; NUM_SQUARES]; NUM_COLORS]; NUM_PIECE_KINDS],
    castling_rights: [u64; 16],
    en_passant: [u64; NUM_SQUARES],
    side_to_move: u64,
}

impl Zobrist {
    fn new() -> Self {
        let mut rng = rand::thread_rng();
        Zobrist {
            table: [[[0u64; NUM_SQUARES]; NUM_COLORS]; NUM_PIECE_KINDS]
                .map(|c| c.map(|s| s.map(|_| rng.gen::<u64>()))),
            castling_rights: [0u64; 16].map(|_| rng.gen::<u64>()),
            en_passant: [0u64; NUM_SQUARES].map(|_| rng.gen::<u64>()),
            side_to_move: rng.gen::<u64>(),
        }
    }
}

static HASHER: Lazy<Zobrist> = Lazy::new(Zobrist::new);

/// Computes the position key: piece placement, side to move,
/// both castling-rights flags, and the en-passant target. No move counters.
pub fn compute_position_key(board: &Board) -> PositionKey {
    let mut hash: u64 = 0;
    let hasher = &*HASHER;

    for row in 0..8u8 {
        for col in 0..8u8 {
            if let Some(piece) = board.piece_at(super::square::Square::new(row, col)) {
                let color_idx = piece.color.index();
                let square_idx = row as usize * 8 + col as usize;
                hash ^= hasher.table[kind_index(piece.kind)][color_idx][square_idx];
            }
        }
    }

    let castling_index = board.castling_rights(Color::White).as_index()
        | (board.castling_rights(Color::Black).as_index() << 2);
    hash ^= hasher.castling_rights[castling_index];

    if let Some(ep) = board.en_passant_target() {
        hash ^= hasher.en_passant[ep.index()];
    }

    if board.side_to_move() == Color::Black {
        hash ^= hasher.side_to_move;
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board::Board;

    #[test]
    fn starting_position_key_is_stable_across_copies() {
        let a = Board::new();
        let b = a.clone();
        assert_eq!(compute_position_key(&a), compute_position_key(&b));
    }

    #[test]
    fn side_to_move_changes_the_key() {
        let board = Board::new();
        let key_white = compute_position_key(&board);
        let moves = board.legal_moves();
        let mut after = board.clone();
        after.apply_move_unchecked(moves[0]);
        let key_black = compute_position_key(&after);
        assert_ne!(key_white, key_black);
    }
}
