//! Pseudo-legal move generation and attack detection.
//!
//! Generation proceeds per piece kind, one function per geometry (leapers,
//! sliders, pawns, castling); destinations are grid squares rather than
//! bitboard rays.
use super::board::Board;
use super::castling_rights::CastlingRights;
use super::chess_move::{ChessMove, Special};
use super::color::Color;
use super::piece::{Piece, PieceKind, PROMOTABLE_KINDS};
use super::square::Square;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn leaper_destinations(board: &Board, from: Square, color: Color, offsets: &[(i32, i32)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&sq| !matches!(board.piece_at(sq), Some(p) if p.color == color))
        .collect()
}

fn slider_destinations(board: &Board, from: Square, color: Color, directions: &[(i32, i32)]) -> Vec<Square> {
    let mut out = Vec::new();
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.piece_at(next) {
                None => {
                    out.push(next);
                    current = next;
                }
                Some(occupant) => {
                    if occupant.color != color {
                        out.push(next);
                    }
                    break;
                }
            }
        }
    }
    out
}

/// Squares a pawn of `color` on `from` attacks diagonally, regardless of
/// whether anything actually sits there. Used both for capture generation and
/// for attack detection.
fn pawn_attack_squares(from: Square, color: Color) -> Vec<Square> {
    let dir = color.pawn_direction();
    [-1, 1]
        .iter()
        .filter_map(|&dc| from.offset(dir, dc))
        .collect()
}

/// Destination squares for king moves, deliberately excluding castling so
/// that attack detection never recurses into castling eligibility checks.
fn king_plain_destinations(board: &Board, from: Square, color: Color) -> Vec<Square> {
    leaper_destinations(board, from, color, &KING_OFFSETS)
}

/// Squares holding a `by`-colored piece that attacks `target`, using
/// pseudo-legal destinations. Used both for attack
/// detection and for the evaluator's threat analysis.
pub fn attackers_of(board: &Board, target: Square, by: Color) -> Vec<Square> {
    let mut attackers = Vec::new();
    for row in 0..8u8 {
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            let piece = match board.piece_at(sq) {
                Some(p) if p.color == by => p,
                _ => continue,
            };
            let attacks = match piece.kind {
                PieceKind::Pawn => pawn_attack_squares(sq, by),
                PieceKind::Knight => leaper_destinations(board, sq, by, &KNIGHT_OFFSETS),
                PieceKind::Bishop => slider_destinations(board, sq, by, &BISHOP_DIRECTIONS),
                PieceKind::Rook => slider_destinations(board, sq, by, &ROOK_DIRECTIONS),
                PieceKind::Queen => {
                    let mut v = slider_destinations(board, sq, by, &BISHOP_DIRECTIONS);
                    v.extend(slider_destinations(board, sq, by, &ROOK_DIRECTIONS));
                    v
                }
                PieceKind::King => king_plain_destinations(board, sq, by),
            };
            if attacks.contains(&target) {
                attackers.push(sq);
            }
        }
    }
    attackers
}

/// Answers "is `target` attacked by `by`?" using pseudo-legal destinations
/// .
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    !attackers_of(board, target, by).is_empty()
}

fn push_plain_or_promotion(out: &mut Vec<ChessMove>, from: Square, to: Square, color: Color) {
    let promotion_rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    if to.row == promotion_rank {
        for kind in PROMOTABLE_KINDS {
            out.push(ChessMove::with_special(from, to, Special::Promotion(kind)));
        }
    } else {
        out.push(ChessMove::new(from, to));
    }
}

fn pawn_moves(board: &Board, from: Square, color: Color) -> Vec<ChessMove> {
    let mut out = Vec::new();
    let dir = color.pawn_direction();
    let start_rank = match color {
        Color::White => 6,
        Color::Black => 1,
    };

    if let Some(one) = from.offset(dir, 0) {
        if board.piece_at(one).is_none() {
            push_plain_or_promotion(&mut out, from, one, color);
            if from.row == start_rank {
                if let Some(two) = from.offset(dir * 2, 0) {
                    if board.piece_at(two).is_none() {
                        out.push(ChessMove::with_special(from, two, Special::DoublePawnPush));
                    }
                }
            }
        }
    }

    for target in pawn_attack_squares(from, color) {
        if let Some(occupant) = board.piece_at(target) {
            if occupant.color != color {
                push_plain_or_promotion(&mut out, from, target, color);
            }
        } else if board.en_passant_target() == Some(target) {
            out.push(ChessMove::with_special(from, target, Special::EnPassant));
        }
    }

    out
}

fn castling_home_squares(color: Color) -> (Square, Square, Square) {
    let rank = color.home_rank();
    (
        Square::new(rank, 4),
        Square::new(rank, 0),
        Square::new(rank, 7),
    )
}

/// Appends a kingside/queenside castling move if all five conditions hold.
/// `rights` is the mover's current castling rights.
fn try_add_castling(out: &mut Vec<ChessMove>, board: &Board, color: Color, rights: CastlingRights) {
    let (king_home, rook_long_home, rook_short_home) = castling_home_squares(color);
    let rank = color.home_rank();
    let opponent = color.opposite();

    if board.king_square(color) != king_home {
        return;
    }
    if board.is_square_attacked(king_home, opponent) {
        return;
    }

    if rights.kingside {
        let f = Square::new(rank, 5);
        let g = Square::new(rank, 6);
        let rook_ok = matches!(board.piece_at(rook_short_home), Some(p) if p.kind == PieceKind::Rook && p.color == color && !p.has_moved);
        if rook_ok
            && board.piece_at(f).is_none()
            && board.piece_at(g).is_none()
            && !board.is_square_attacked(f, opponent)
            && !board.is_square_attacked(g, opponent)
        {
            out.push(ChessMove::with_special(king_home, g, Special::KingsideCastle));
        }
    }

    if rights.queenside {
        let d = Square::new(rank, 3);
        let c = Square::new(rank, 2);
        let b = Square::new(rank, 1);
        let rook_ok = matches!(board.piece_at(rook_long_home), Some(p) if p.kind == PieceKind::Rook && p.color == color && !p.has_moved);
        if rook_ok
            && board.piece_at(d).is_none()
            && board.piece_at(c).is_none()
            && board.piece_at(b).is_none()
            && !board.is_square_attacked(d, opponent)
            && !board.is_square_attacked(c, opponent)
        {
            out.push(ChessMove::with_special(king_home, c, Special::QueensideCastle));
        }
    }
}

/// Pseudo-legal moves for the piece (if any) standing on `sq`, including
/// castling for the king. Empty if `sq` is empty or holds the wrong color.
pub fn pseudo_legal_moves_for_square(board: &Board, sq: Square) -> Vec<ChessMove> {
    let piece = match board.piece_at(sq) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let color = piece.color;

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, sq, color),
        PieceKind::Knight => leaper_destinations(board, sq, color, &KNIGHT_OFFSETS)
            .into_iter()
            .map(|to| ChessMove::new(sq, to))
            .collect(),
        PieceKind::Bishop => slider_destinations(board, sq, color, &BISHOP_DIRECTIONS)
            .into_iter()
            .map(|to| ChessMove::new(sq, to))
            .collect(),
        PieceKind::Rook => slider_destinations(board, sq, color, &ROOK_DIRECTIONS)
            .into_iter()
            .map(|to| ChessMove::new(sq, to))
            .collect(),
        PieceKind::Queen => {
            let mut moves: Vec<ChessMove> = slider_destinations(board, sq, color, &BISHOP_DIRECTIONS)
                .into_iter()
                .map(|to| ChessMove::new(sq, to))
                .collect();
            moves.extend(
                slider_destinations(board, sq, color, &ROOK_DIRECTIONS)
                    .into_iter()
                    .map(|to| ChessMove::new(sq, to)),
            );
            moves
        }
        PieceKind::King => {
            let mut moves: Vec<ChessMove> = king_plain_destinations(board, sq, color)
                .into_iter()
                .map(|to| ChessMove::new(sq, to))
                .collect();
            try_add_castling(&mut moves, board, color, board.castling_rights(color));
            moves
        }
    }
}

/// All pseudo-legal moves for the side to move.
pub fn pseudo_legal_moves(board: &Board) -> Vec<ChessMove> {
    let color = board.side_to_move();
    let mut out = Vec::new();
    for row in 0..8u8 {
        for col in 0..8u8 {
            let sq = Square::new(row, col);
            if matches!(board.piece_at(sq), Some(p) if p.color == color) {
                out.extend(pseudo_legal_moves_for_square(board, sq));
            }
        }
    }
    out
}

/// Legal moves for the side to move: pseudo-legal moves filtered by
/// leave-mover-not-in-check, per the legality filter.
pub fn legal_moves(board: &Board) -> Vec<ChessMove> {
    let color = board.side_to_move();
    pseudo_legal_moves(board)
        .into_iter()
        .filter(|&mv| {
            let mut scratch = board.clone_for_search();
            scratch.apply_move_unchecked(mv);
            !scratch.is_in_check(color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board::Board;

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let board = Board::new();
        assert_eq!(legal_moves(&board).len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_move_off_the_pin_line() {
        // White king e1, white rook e2, black rook e8 pinning it. The rook
        // must stay on the e-file.
        let mut board = Board::empty();
        board.set_piece_for_test(Square::new(7, 4), Some(Piece::new(PieceKind::King, Color::White)));
        board.set_piece_for_test(Square::new(6, 4), Some(Piece::new(PieceKind::Rook, Color::White)));
        board.set_piece_for_test(Square::new(0, 4), Some(Piece::new(PieceKind::Rook, Color::Black)));
        board.set_piece_for_test(Square::new(0, 0), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set_side_to_move_for_test(Color::White);

        let moves = legal_moves(&board);
        assert!(moves
            .iter()
            .all(|m| m.from != Square::new(6, 4) || m.to.col == 4));
    }
}
