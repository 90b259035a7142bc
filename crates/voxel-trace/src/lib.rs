//! Trace events for inspecting behaviour tree ticks.
//!
//! This crate is intentionally lightweight. The tree runtime emits node visits into any
//! [`TraceSink`]; tests collect them in memory, agents forward them to `tracing`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{TraceEvent, TraceSink, TracingSink, VecTraceSink};
