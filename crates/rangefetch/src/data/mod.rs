//! Immutable data types for fetch operations.
//!
//! Configuration, progress events and the value types describing a remote
//! resource. Nothing in here performs I/O.

pub mod metadata;
pub mod options;
pub mod progress;

pub use metadata::{ByteRange, ChunkPlan, ContentMetadata};
pub use options::{ChangeTracking, DEFAULT_MIN_CHUNK_SIZE, FetchOptions, FetchPhase};
pub use progress::{ProgressReceiver, ProgressReport, ProgressSender, progress_channel};
