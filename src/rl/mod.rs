//! The reinforcement-learning overlay.
pub mod overlay;

pub use overlay::{Annotation, PositionRecord, RlOverlay};
