//! The positional evaluator: a signed centipawn-like score, positive
//! favoring White, plus a move-priority ordering heuristic.
use super::tables::{self, table_for, KING_ENDGAME, KING_MIDDLEGAME};
use crate::board::{Board, ChessMove, Color, PieceKind, Square};
use derive_builder::Builder;

/// Scores a position and orders candidate moves. Implemented by
/// [`StandardEvaluator`]; kept as a trait so the search engine and the RL
/// overlay depend on the capability, not the concrete weights.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board) -> i32;
    fn move_priority(&self, board: &Board, mv: ChessMove) -> i32;
}

fn signed_for(color: Color, magnitude: i32) -> i32 {
    match color {
        Color::White => magnitude,
        Color::Black => -magnitude,
    }
}

fn is_central(sq: Square) -> bool {
    (3..=4).contains(&sq.row) && (3..=4).contains(&sq.col)
}

fn is_extended_center(sq: Square) -> bool {
    (2..=5).contains(&sq.row) && (2..=5).contains(&sq.col) && !is_central(sq)
}

fn is_central_4x4(sq: Square) -> bool {
    (2..=5).contains(&sq.row) && (2..=5).contains(&sq.col)
}

fn chebyshev(a: Square, b: Square) -> i32 {
    (a.row as i32 - b.row as i32)
        .abs()
        .max((a.col as i32 - b.col as i32).abs())
}

/// Minimum Chebyshev distance from `sq` to any of the four central squares.
fn distance_to_center(sq: Square) -> i32 {
    [(3, 3), (3, 4), (4, 3), (4, 4)]
        .iter()
        .map(|&(r, c)| chebyshev(sq, Square::new(r, c)))
        .min()
        .unwrap()
}

/// Weighted, configurable implementation of the evaluation terms.
/// Defaults reproduce the specified coefficients exactly; the builder exists
/// so callers may retune without forking the crate.
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct StandardEvaluator {
    #[builder(default = "100")]
    pub pawn_value: i32,
    #[builder(default = "320")]
    pub knight_value: i32,
    #[builder(default = "330")]
    pub bishop_value: i32,
    #[builder(default = "500")]
    pub rook_value: i32,
    #[builder(default = "900")]
    pub queen_value: i32,
    #[builder(default = "20_000")]
    pub king_value: i32,

    #[builder(default = "0.9")]
    pub hanging_penalty_factor: f64,
    #[builder(default = "0.6")]
    pub outnumbered_penalty_factor: f64,
    #[builder(default = "0.3")]
    pub favorable_trade_credit_factor: f64,

    #[builder(default = "100_000")]
    pub checkmate_score: i32,
    #[builder(default = "500")]
    pub check_penalty: i32,

    #[builder(default = "30")]
    pub developed_minor_bonus: i32,
    #[builder(default = "40")]
    pub central_square_bonus: i32,
    #[builder(default = "20")]
    pub extended_center_bonus: i32,

    #[builder(default = "30")]
    pub king_shield_bonus: i32,
    #[builder(default = "50")]
    pub king_exposed_penalty: i32,

    #[builder(default = "20")]
    pub doubled_pawn_penalty: i32,
    #[builder(default = "15")]
    pub isolated_pawn_penalty: i32,

    #[builder(default = "16")]
    pub endgame_piece_count_threshold: u32,
    #[builder(default = "10")]
    pub king_centralization_factor: i32,
    #[builder(default = "20")]
    pub opposition_bonus: i32,
    #[builder(default = "15")]
    pub pawn_advance_factor: i32,
    #[builder(default = "50")]
    pub passed_pawn_base: i32,
    #[builder(default = "20")]
    pub passed_pawn_factor: i32,

    #[builder(default = "10")]
    pub priority_capture_base: i32,
    #[builder(default = "20")]
    pub priority_promotion_bonus: i32,
    #[builder(default = "5")]
    pub priority_check_bonus: i32,
    #[builder(default = "2")]
    pub priority_central_destination_bonus: i32,
}

impl Default for StandardEvaluator {
    fn default() -> Self {
        StandardEvaluatorBuilder::default()
            .build()
            .expect("every field has a default")
    }
}

impl StandardEvaluator {
    pub fn material_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }

    fn total_piece_count(&self, board: &Board) -> u32 {
        let mut count = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                if board.piece_at(Square::new(row, col)).is_some() {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn is_endgame(&self, board: &Board) -> bool {
        self.total_piece_count(board) <= self.endgame_piece_count_threshold
    }

    fn material_and_pst(&self, board: &Board, endgame: bool) -> i32 {
        let mut score = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                if let Some(piece) = board.piece_at(sq) {
                    let material = self.material_value(piece.kind);
                    let table = if piece.kind == PieceKind::King {
                        if endgame {
                            &KING_ENDGAME
                        } else {
                            &KING_MIDDLEGAME
                        }
                    } else {
                        table_for(piece.kind)
                    };
                    let bonus = tables::lookup(table, sq.row, sq.col, piece.color == Color::White);
                    score += signed_for(piece.color, material + bonus);
                }
            }
        }
        score
    }

    fn threats(&self, board: &Board) -> i32 {
        let mut score = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                let piece = match board.piece_at(sq) {
                    Some(p) => p,
                    None => continue,
                };
                let opponent = piece.color.opposite();
                let attackers = crate::board::movegen::attackers_of(board, sq, opponent);
                if attackers.is_empty() {
                    continue;
                }
                let defenders = crate::board::movegen::attackers_of(board, sq, piece.color);
                let value = self.material_value(piece.kind) as f64;
                if defenders.is_empty() {
                    let penalty = (value * self.hanging_penalty_factor).round() as i32;
                    score += signed_for(piece.color, -penalty);
                } else if attackers.len() > defenders.len() {
                    let penalty = (value * self.outnumbered_penalty_factor).round() as i32;
                    score += signed_for(piece.color, -penalty);
                } else {
                    let cheapest_attacker = attackers
                        .iter()
                        .filter_map(|&a| board.piece_at(a))
                        .map(|p| self.material_value(p.kind))
                        .min()
                        .unwrap_or(i32::MAX);
                    let piece_value = self.material_value(piece.kind);
                    if cheapest_attacker < piece_value {
                        let credit = ((piece_value - cheapest_attacker) as f64
                            * self.favorable_trade_credit_factor)
                            .round() as i32;
                        score += signed_for(opponent, credit);
                    }
                }
            }
        }
        score
    }

    fn check_and_mate(&self, board: &Board) -> i32 {
        let mover = board.side_to_move();
        if board.is_checkmate() {
            return signed_for(mover, -self.checkmate_score);
        }
        if board.is_in_check(mover) {
            return signed_for(mover, -self.check_penalty);
        }
        0
    }

    fn activity(&self, board: &Board) -> i32 {
        let mut score = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                let piece = match board.piece_at(sq) {
                    Some(p) => p,
                    None => continue,
                };
                if matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop) && piece.has_moved {
                    score += signed_for(piece.color, self.developed_minor_bonus);
                }
                if is_central(sq) {
                    score += signed_for(piece.color, self.central_square_bonus);
                } else if is_extended_center(sq) {
                    score += signed_for(piece.color, self.extended_center_bonus);
                }
            }
        }
        score
    }

    fn king_safety(&self, board: &Board) -> i32 {
        let mut score = 0;
        let total = self.total_piece_count(board);
        for color in [Color::White, Color::Black] {
            let king_sq = board.king_square(color);
            let ahead = color.pawn_direction();
            for dc in [-1, 0, 1] {
                if let Some(shield_sq) = king_sq.offset(ahead, dc) {
                    if matches!(board.piece_at(shield_sq), Some(p) if p.kind == PieceKind::Pawn && p.color == color)
                    {
                        score += signed_for(color, self.king_shield_bonus);
                    }
                }
            }
            if total > 20 && is_central_4x4(king_sq) {
                score += signed_for(color, -self.king_exposed_penalty);
            }
        }
        score
    }

    fn pawn_structure(&self, board: &Board) -> i32 {
        let mut score = 0;
        for color in [Color::White, Color::Black] {
            let mut files = [0u8; 8];
            for row in 0..8u8 {
                for col in 0..8u8 {
                    if matches!(board.piece_at(Square::new(row, col)), Some(p) if p.kind == PieceKind::Pawn && p.color == color)
                    {
                        files[col as usize] += 1;
                    }
                }
            }
            for (col, &count) in files.iter().enumerate() {
                if count > 1 {
                    score += signed_for(color, -self.doubled_pawn_penalty * (count as i32 - 1));
                }
                if count > 0 {
                    let left = if col > 0 { files[col - 1] } else { 0 };
                    let right = if col < 7 { files[col + 1] } else { 0 };
                    if left == 0 && right == 0 {
                        score += signed_for(color, -self.isolated_pawn_penalty);
                    }
                }
            }
        }
        score
    }

    fn endgame_factors(&self, board: &Board) -> i32 {
        let mut score = 0;
        for color in [Color::White, Color::Black] {
            let king_sq = board.king_square(color);
            let dist = distance_to_center(king_sq);
            score += signed_for(color, (3 - dist) * self.king_centralization_factor);
        }

        let white_king = board.king_square(Color::White);
        let black_king = board.king_square(Color::Black);
        let in_opposition = (white_king.col == black_king.col
            && (white_king.row as i32 - black_king.row as i32).abs() == 2)
            || (white_king.row == black_king.row
                && (white_king.col as i32 - black_king.col as i32).abs() == 2);
        if in_opposition {
            score += signed_for(board.side_to_move(), self.opposition_bonus);
        }

        for row in 0..8u8 {
            for col in 0..8u8 {
                let sq = Square::new(row, col);
                let piece = match board.piece_at(sq) {
                    Some(p) if p.kind == PieceKind::Pawn => p,
                    _ => continue,
                };
                let dist_to_promotion = match piece.color {
                    Color::White => row as i32,
                    Color::Black => 7 - row as i32,
                };
                score += signed_for(
                    piece.color,
                    (7 - dist_to_promotion) * self.pawn_advance_factor,
                );
                if self.is_passed(board, sq, piece.color) {
                    score += signed_for(
                        piece.color,
                        self.passed_pawn_base + (7 - dist_to_promotion) * self.passed_pawn_factor,
                    );
                }
            }
        }
        score
    }

    fn is_passed(&self, board: &Board, sq: Square, color: Color) -> bool {
        let opponent = color.opposite();
        let ahead_rows: Vec<u8> = match color {
            Color::White => (0..sq.row).collect(),
            Color::Black => (sq.row + 1..8).collect(),
        };
        for row in ahead_rows {
            for dc in [-1i32, 0, 1] {
                if let Some(check_sq) = Square::try_new(row as i32, sq.col as i32 + dc) {
                    if matches!(board.piece_at(check_sq), Some(p) if p.kind == PieceKind::Pawn && p.color == opponent)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Whether playing `mv` on `board` leaves the opponent in check.
    pub fn gives_check(&self, board: &Board, mv: ChessMove) -> bool {
        let mut scratch = board.clone_for_search();
        scratch.apply_move_unchecked(mv);
        scratch.is_in_check(scratch.side_to_move())
    }
}

impl Evaluator for StandardEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let endgame = self.is_endgame(board);
        let mut score = self.material_and_pst(board, endgame);
        score += self.threats(board);
        score += self.check_and_mate(board);
        score += self.activity(board);
        score += self.king_safety(board);
        score += self.pawn_structure(board);
        if endgame {
            score += self.endgame_factors(board);
        }
        score
    }

    fn move_priority(&self, board: &Board, mv: ChessMove) -> i32 {
        let mut priority = 0;
        if let Some(victim) = board.piece_at(mv.to) {
            priority += self.priority_capture_base + self.material_value(victim.kind) / 100;
        } else if mv.special == crate::board::Special::EnPassant {
            priority += self.priority_capture_base + self.pawn_value / 100;
        }
        if mv.is_promotion() {
            priority += self.priority_promotion_bonus;
        }
        if self.gives_check(board, mv) {
            priority += self.priority_check_bonus;
        }
        if is_central(mv.to) {
            priority += self.priority_central_destination_bonus;
        }
        priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn starting_position_is_balanced() {
        let evaluator = StandardEvaluator::default();
        assert_eq!(evaluator.evaluate(&Board::new()), 0);
    }

    #[test]
    fn capture_priority_scales_with_victim_value() {
        let evaluator = StandardEvaluator::default();
        let mut board = Board::empty();
        board.set_piece_for_test(Square::new(4, 4), Some(crate::board::Piece::new(PieceKind::Rook, Color::White)));
        board.set_piece_for_test(Square::new(4, 6), Some(crate::board::Piece::new(PieceKind::Queen, Color::Black)));
        board.set_piece_for_test(Square::new(7, 0), Some(crate::board::Piece::new(PieceKind::King, Color::White)));
        board.set_piece_for_test(Square::new(0, 0), Some(crate::board::Piece::new(PieceKind::King, Color::Black)));
        let mv = ChessMove::new(Square::new(4, 4), Square::new(4, 6));
        assert_eq!(evaluator.move_priority(&board, mv), 10 + 9);
    }
}
