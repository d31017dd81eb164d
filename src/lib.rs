//! A self-contained chess engine: legal-move generation and the full
//! termination ladder, a positional evaluator, a Monte Carlo tree search
//! driver with an optional reinforcement-learning bias, a narrow data-sink
//! contract for recording games, and a single-session façade tying it all
//! together for a host to embed.
pub mod board;
pub mod eval;
pub mod rl;
pub mod search;
pub mod session;
pub mod sink;

pub mod prelude {
    pub use crate::board::{Board, ChessMove, Color, GameResult, PieceKind, Special, Square};
    pub use crate::eval::{Evaluator, StandardEvaluator};
    pub use crate::rl::RlOverlay;
    pub use crate::search::{MctsEngine, SearchConfig, SearchStrategy};
    pub use crate::session::Session;
    pub use crate::sink::{DataSink, InMemorySink};
}
