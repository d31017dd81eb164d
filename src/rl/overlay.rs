//! The reinforcement-learning overlay: a bounded memory of recent
//! positions, annotated with how the game that contained them turned out,
//! blended into search as a small bias rather than a replacement for it.
use crate::board::{Board, ChessMove, Color, GameResult, PieceKind, PositionDict, Square};
use std::collections::VecDeque;

const CAPACITY: usize = 100;
const RECENCY_WINDOW: usize = 5;
const ANNOTATE_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone)]
pub struct PositionRecord {
    pub position: PositionDict,
    pub mover: Color,
    pub annotation: Option<Annotation>,
}

/// A FIFO of the most recent positions seen across `choose_move` calls. Old
/// entries fall off the front once `CAPACITY` is exceeded.
pub struct RlOverlay {
    records: VecDeque<PositionRecord>,
}

impl RlOverlay {
    pub fn new() -> Self {
        RlOverlay {
            records: VecDeque::with_capacity(CAPACITY),
        }
    }

    pub fn record_position(&mut self, board: &Board) {
        if self.records.len() == CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(PositionRecord {
            position: board.to_position_dict(),
            mover: board.side_to_move(),
            annotation: None,
        });
    }

    /// Labels the most recently recorded positions with how the finished
    /// game turned out for `learner_color`.
    pub fn annotate_outcome(&mut self, result: GameResult, learner_color: Color) {
        let label = match result {
            GameResult::WhiteWins => {
                if learner_color == Color::White {
                    Annotation::Good
                } else {
                    Annotation::Bad
                }
            }
            GameResult::BlackWins => {
                if learner_color == Color::Black {
                    Annotation::Good
                } else {
                    Annotation::Bad
                }
            }
            GameResult::Draw | GameResult::InProgress => Annotation::Neutral,
        };
        let len = self.records.len();
        let start = len.saturating_sub(ANNOTATE_WINDOW);
        for record in self.records.iter_mut().skip(start) {
            record.annotation = Some(label);
        }
    }

    fn recency_bias(&self) -> f64 {
        let len = self.records.len();
        let start = len.saturating_sub(RECENCY_WINDOW);
        self.records
            .iter()
            .skip(start)
            .map(|r| match r.annotation {
                Some(Annotation::Good) => 0.1,
                Some(Annotation::Bad) => -0.1,
                _ => 0.0,
            })
            .sum()
    }

    fn capture_bonus(kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => 0.1,
            PieceKind::Knight | PieceKind::Bishop => 0.3,
            PieceKind::Rook => 0.5,
            PieceKind::Queen => 0.9,
            PieceKind::King => 0.0,
        }
    }

    fn is_central(sq: Square) -> bool {
        (3..=4).contains(&sq.row) && (3..=4).contains(&sq.col)
    }

    fn is_extended_center(sq: Square) -> bool {
        (2..=5).contains(&sq.row) && (2..=5).contains(&sq.col) && !Self::is_central(sq)
    }

    fn total_piece_count(board: &Board) -> u32 {
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

    /// Bounded [-1, 1] estimate of how favorable `mv` looks, evaluated
    /// against the board as it stood *before* `mv` is applied.
    pub fn rl_value(&self, board_before_move: &Board, mv: ChessMove) -> f64 {
        let mut value = 0.0;

        if Self::is_central(mv.to) {
            value += 0.3;
        } else if Self::is_extended_center(mv.to) {
            value += 0.1;
        }

        if let Some(piece) = board_before_move.piece_at(mv.from) {
            if !piece.has_moved && matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop) {
                value += 0.2;
            }
            if piece.kind == PieceKind::King {
                if Self::total_piece_count(board_before_move) > 20
                    && (2..=5).contains(&mv.to.row)
                    && (2..=5).contains(&mv.to.col)
                {
                    value -= 0.4;
                }
            }
        }

        if let Some(target) = board_before_move.piece_at(mv.to) {
            value += Self::capture_bonus(target.kind);
        }

        value += self.recency_bias();

        value.clamp(-1.0, 1.0)
    }
}

impl Default for RlOverlay {
    fn default() -> Self {
        RlOverlay::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ChessMove, Square};

    #[test]
    fn central_destination_is_rewarded() {
        let overlay = RlOverlay::new();
        let board = Board::new();
        let mv = ChessMove::new(Square::new(6, 4), Square::new(4, 4));
        assert!(overlay.rl_value(&board, mv) > 0.0);
    }

    #[test]
    fn capacity_is_bounded_at_one_hundred() {
        let mut overlay = RlOverlay::new();
        let board = Board::new();
        for _ in 0..150 {
            overlay.record_position(&board);
        }
        assert_eq!(overlay.records.len(), CAPACITY);
    }

    #[test]
    fn annotation_only_touches_the_last_ten_records() {
        let mut overlay = RlOverlay::new();
        let board = Board::new();
        for _ in 0..20 {
            overlay.record_position(&board);
        }
        overlay.annotate_outcome(GameResult::WhiteWins, Color::White);
        let annotated = overlay
            .records
            .iter()
            .filter(|r| r.annotation.is_some())
            .count();
        assert_eq!(annotated, ANNOTATE_WINDOW);
    }
}
