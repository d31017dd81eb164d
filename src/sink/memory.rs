//! An in-memory reference sink: captures every call behind a mutex,
//! for tests and for embedders that want to inspect what would have been
//! recorded without standing up a database.
use super::traits::{DataSink, SinkError};
use crate::board::{Color, GameResult, MoveDescriptor, PositionDict};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum RecordedCall {
    BeginGame { session_id: String, mode: String, game_id: u64 },
    RecordPosition { game_id: u64, move_number: u32, position: PositionDict, mover: Color },
    RecordMove { game_id: u64, move_number: u32, mv: MoveDescriptor, evaluation_score: i32 },
    FinishGame { game_id: u64, result: GameResult, final_position: PositionDict, total_moves: u32 },
}

pub struct InMemorySink {
    calls: Mutex<Vec<RecordedCall>>,
    next_game_id: Mutex<u64>,
}

impl InMemorySink {
    pub fn new() -> Self {
        InMemorySink {
            calls: Mutex::new(Vec::new()),
            next_game_id: Mutex::new(1),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("sink mutex poisoned").clone()
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        InMemorySink::new()
    }
}

impl DataSink for InMemorySink {
    fn begin_game(&self, session_id: &str, mode: &str) -> Result<u64, SinkError> {
        let mut next = self.next_game_id.lock().expect("sink mutex poisoned");
        let game_id = *next;
        *next += 1;
        self.calls.lock().expect("sink mutex poisoned").push(RecordedCall::BeginGame {
            session_id: session_id.to_string(),
            mode: mode.to_string(),
            game_id,
        });
        Ok(game_id)
    }

    fn record_position(
        &self,
        game_id: u64,
        move_number: u32,
        position: &PositionDict,
        mover: Color,
    ) -> Result<(), SinkError> {
        self.calls.lock().expect("sink mutex poisoned").push(RecordedCall::RecordPosition {
            game_id,
            move_number,
            position: position.clone(),
            mover,
        });
        Ok(())
    }

    fn record_move(
        &self,
        game_id: u64,
        move_number: u32,
        mv: &MoveDescriptor,
        evaluation_score: i32,
    ) -> Result<(), SinkError> {
        self.calls.lock().expect("sink mutex poisoned").push(RecordedCall::RecordMove {
            game_id,
            move_number,
            mv: mv.clone(),
            evaluation_score,
        });
        Ok(())
    }

    fn finish_game(
        &self,
        game_id: u64,
        result: GameResult,
        final_position: &PositionDict,
        total_moves: u32,
    ) -> Result<(), SinkError> {
        self.calls.lock().expect("sink mutex poisoned").push(RecordedCall::FinishGame {
            game_id,
            result,
            final_position: final_position.clone(),
            total_moves,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn records_calls_in_order() {
        let sink = InMemorySink::new();
        let game_id = sink.begin_game("session-1", "rl").unwrap();
        let board = Board::new();
        sink.record_position(game_id, 0, &board.to_position_dict(), Color::White).unwrap();
        sink.finish_game(game_id, GameResult::Draw, &board.to_position_dict(), 0).unwrap();

        let calls = sink.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], RecordedCall::BeginGame { .. }));
        assert!(matches!(calls[2], RecordedCall::FinishGame { .. }));
    }
}
