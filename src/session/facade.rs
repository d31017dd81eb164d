//! The session façade: the single entry point an outer system drives,
//! owning exactly one board and one engine configuration.
use crate::board::{Board, ChessMove, GameResult, MoveDescriptor, PositionDict};
use crate::eval::{Evaluator, StandardEvaluator};
use crate::rl::RlOverlay;
use crate::search::{MctsEngine, SearchConfig, SearchStrategy};
use crate::sink::DataSink;
use log::warn;

pub struct Session {
    session_id: String,
    mode: String,
    board: Board,
    evaluator: Box<dyn Evaluator>,
    config: SearchConfig,
    rl_overlay: RlOverlay,
    rl_enabled: bool,
    sink: Option<Box<dyn DataSink>>,
    game_id: Option<u64>,
    move_number: u32,
}

impl Session {
    pub fn new(session_id: impl Into<String>, mode: impl Into<String>) -> Self {
        Session {
            session_id: session_id.into(),
            mode: mode.into(),
            board: Board::new(),
            evaluator: Box::new(StandardEvaluator::default()),
            config: SearchConfig::default(),
            rl_overlay: RlOverlay::new(),
            rl_enabled: false,
            sink: None,
            game_id: None,
            move_number: 0,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DataSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn ensure_game_started(&mut self) {
        if self.game_id.is_some() {
            return;
        }
        if let Some(sink) = &self.sink {
            match sink.begin_game(&self.session_id, &self.mode) {
                Ok(id) => self.game_id = Some(id),
                Err(e) => warn!("sink begin_game failed: {e}"),
            }
        }
    }

    /// Applies `mv` if legal. Returns whether it was applied.
    pub fn apply_move(&mut self, mv: ChessMove) -> bool {
        use crate::board::ApplyOutcome;
        match self.board.apply_move(mv) {
            ApplyOutcome::Applied => {
                self.ensure_game_started();
                self.move_number += 1;
                if let (Some(sink), Some(game_id)) = (&self.sink, self.game_id) {
                    let descriptor: MoveDescriptor = mv.into();
                    let score = self.evaluator.evaluate(&self.board);
                    if let Err(e) = sink.record_move(game_id, self.move_number, &descriptor, score) {
                        warn!("sink record_move failed: {e}");
                    }
                }
                true
            }
            ApplyOutcome::Rejected | ApplyOutcome::Terminal => false,
        }
    }

    /// Runs the engine for the current side to move.
    pub fn choose_move(&mut self) -> Option<ChessMove> {
        self.ensure_game_started();
        self.rl_overlay.record_position(&self.board);
        if let (Some(sink), Some(game_id)) = (&self.sink, self.game_id) {
            let position = self.board.to_position_dict();
            if let Err(e) = sink.record_position(game_id, self.move_number, &position, self.board.side_to_move()) {
                warn!("sink record_position failed: {e}");
            }
        }

        let engine = MctsEngine::new(self.evaluator.as_ref(), self.config.clone());
        let strategy = if self.rl_enabled {
            SearchStrategy::Rl {
                overlay: &self.rl_overlay,
                weight: self.config.rl_weight,
            }
        } else {
            SearchStrategy::Plain
        };
        engine.choose_move(&self.board, strategy)
    }

    /// Restores the starting position. The RL overlay's memory persists
    /// across resets; it is meant to accumulate over many games.
    pub fn reset(&mut self) {
        self.board.reset();
        self.game_id = None;
        self.move_number = 0;
    }

    pub fn enable_rl(&mut self, flag: bool) {
        self.rl_enabled = flag;
    }

    pub fn snapshot(&self) -> PositionDict {
        self.board.to_position_dict()
    }

    /// Forwards the finished game's outcome to the RL overlay's annotation
    /// step and, if a sink is attached, to its own `finish_game`.
    pub fn finish_game(&mut self, result: GameResult, learner_color: crate::board::Color) {
        self.rl_overlay.annotate_outcome(result, learner_color);
        if let (Some(sink), Some(game_id)) = (&self.sink, self.game_id) {
            let final_position = self.board.to_position_dict();
            if let Err(e) = sink.finish_game(game_id, result, &final_position, self.move_number) {
                warn!("sink finish_game failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::sink::InMemorySink;

    #[test]
    fn applying_an_illegal_move_is_rejected() {
        let mut session = Session::new("s1", "human_vs_ai");
        let illegal = ChessMove::new(
            crate::board::Square::new(6, 4),
            crate::board::Square::new(3, 4),
        );
        assert!(!session.apply_move(illegal));
    }

    #[test]
    fn a_failing_sink_never_panics_a_session() {
        struct AlwaysFails;
        impl DataSink for AlwaysFails {
            fn begin_game(&self, _: &str, _: &str) -> Result<u64, crate::sink::SinkError> {
                Err(crate::sink::SinkError::Unavailable("down".into()))
            }
            fn record_position(
                &self,
                _: u64,
                _: u32,
                _: &PositionDict,
                _: Color,
            ) -> Result<(), crate::sink::SinkError> {
                Err(crate::sink::SinkError::Unavailable("down".into()))
            }
            fn record_move(
                &self,
                _: u64,
                _: u32,
                _: &MoveDescriptor,
                _: i32,
            ) -> Result<(), crate::sink::SinkError> {
                Err(crate::sink::SinkError::Unavailable("down".into()))
            }
            fn finish_game(
                &self,
                _: u64,
                _: GameResult,
                _: &PositionDict,
                _: u32,
            ) -> Result<(), crate::sink::SinkError> {
                Err(crate::sink::SinkError::Unavailable("down".into()))
            }
        }

        let mut session = Session::new("s1", "human_vs_ai").with_sink(Box::new(AlwaysFails));
        let mv = session.board().legal_moves()[0];
        assert!(session.apply_move(mv));
        session.finish_game(GameResult::Draw, Color::White);
    }

    #[test]
    fn in_memory_sink_records_one_call_per_lifecycle_step() {
        let sink = std::sync::Arc::new(InMemorySink::new());
        struct ArcSink(std::sync::Arc<InMemorySink>);
        impl DataSink for ArcSink {
            fn begin_game(&self, s: &str, m: &str) -> Result<u64, crate::sink::SinkError> {
                self.0.begin_game(s, m)
            }
            fn record_position(
                &self,
                g: u64,
                n: u32,
                p: &PositionDict,
                c: Color,
            ) -> Result<(), crate::sink::SinkError> {
                self.0.record_position(g, n, p, c)
            }
            fn record_move(
                &self,
                g: u64,
                n: u32,
                mv: &MoveDescriptor,
                s: i32,
            ) -> Result<(), crate::sink::SinkError> {
                self.0.record_move(g, n, mv, s)
            }
            fn finish_game(
                &self,
                g: u64,
                r: GameResult,
                p: &PositionDict,
                n: u32,
            ) -> Result<(), crate::sink::SinkError> {
                self.0.finish_game(g, r, p, n)
            }
        }

        let mut session = Session::new("s1", "human_vs_ai").with_sink(Box::new(ArcSink(sink.clone())));
        let mv = session.board().legal_moves()[0];
        session.apply_move(mv);
        session.finish_game(GameResult::Draw, Color::White);

        let calls = sink.calls();
        assert!(matches!(calls[0], crate::sink::RecordedCall::BeginGame { .. }));
        assert!(matches!(calls[1], crate::sink::RecordedCall::RecordMove { .. }));
        assert!(matches!(calls[2], crate::sink::RecordedCall::FinishGame { .. }));
    }
}
