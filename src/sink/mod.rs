//! The data-sink contract and its reference implementations.
pub mod memory;
pub mod traits;

#[cfg(feature = "sqlite-sink")]
pub mod sqlite;

pub use memory::{InMemorySink, RecordedCall};
pub use traits::{DataSink, SinkError};

#[cfg(feature = "sqlite-sink")]
pub use sqlite::SqliteSink;
