//! The data-sink contract: a narrow, thread-safe recorder interface
//! the engine depends on but never blocks on ordering guarantees for.
use crate::board::{Color, GameResult, MoveDescriptor, PositionDict};
use std::fmt;

#[derive(Debug, Clone)]
pub enum SinkError {
    Unavailable(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Unavailable(msg) => write!(f, "data sink unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SinkError {}

pub trait DataSink: Send + Sync {
    fn begin_game(&self, session_id: &str, mode: &str) -> Result<u64, SinkError>;

    fn record_position(
        &self,
        game_id: u64,
        move_number: u32,
        position: &PositionDict,
        mover: Color,
    ) -> Result<(), SinkError>;

    fn record_move(
        &self,
        game_id: u64,
        move_number: u32,
        mv: &MoveDescriptor,
        evaluation_score: i32,
    ) -> Result<(), SinkError>;

    fn finish_game(
        &self,
        game_id: u64,
        result: GameResult,
        final_position: &PositionDict,
        total_moves: u32,
    ) -> Result<(), SinkError>;
}
