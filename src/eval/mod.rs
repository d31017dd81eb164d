//! Static position evaluation: material, piece-square tables, threat
//! analysis, and the move-ordering priority heuristic the search uses before
//! it has any visit statistics to rely on.
pub mod evaluator;
pub mod tables;

pub use evaluator::{Evaluator, StandardEvaluator, StandardEvaluatorBuilder};
