//! Monte Carlo Tree Search: an arena-indexed tree, UCB1
//! selection, playout-based adjudication, and the public engine entry point.
pub mod config;
pub mod engine;
pub mod node;
pub mod strategy;
pub mod tree;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use engine::MctsEngine;
pub use node::NodeHandle;
pub use strategy::SearchStrategy;
pub use tree::Tree;
