//! The tagged strategy hook: `choose_move` takes a
//! `SearchStrategy` so the RL bias can be switched in and out per call while
//! the overlay's memory itself lives for as long as the owning session does.
use crate::board::{Board, ChessMove};
use crate::rl::RlOverlay;

pub enum SearchStrategy<'a> {
    Plain,
    Rl {
        overlay: &'a RlOverlay,
        weight: f64,
    },
}

impl<'a> SearchStrategy<'a> {
    pub fn rl_term(&self, board_before_move: &Board, mv: ChessMove) -> f64 {
        match self {
            SearchStrategy::Plain => 0.0,
            SearchStrategy::Rl { overlay, weight } => weight * overlay.rl_value(board_before_move, mv),
        }
    }

    pub fn is_rl(&self) -> bool {
        matches!(self, SearchStrategy::Rl { .. })
    }
}
