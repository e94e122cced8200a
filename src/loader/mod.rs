//! Loading - fetch a container, decode it, deliver it to a scene sink.
//!
//! - [`Loader`] - sequences one load and enforces the sink call order
//! - [`LoadWorker`] - runs fetch and decode on a background thread
//! - [`SceneSink`] / [`RecordingSink`] - the consumer side
//! - [`ByteSource`] / [`FileSource`] / [`MemorySource`] - the producer side
//! - [`LoaderConfig`] - id collision policy and decode options

mod config;
mod orchestrator;
mod sink;
mod source;
mod worker;

pub use config::{IdCollisionPolicy, LoaderConfig};
pub use orchestrator::{LoadOutcome, LoadParams, Loader};
pub use sink::{RecordingSink, SceneSink, SinkEvent};
pub use source::{ByteSource, FileSource, MemorySource, SourceBytes};
pub use worker::{LoadCommand, LoadResult, LoadWorker};
