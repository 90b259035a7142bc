#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use voxel_core::Status;

/// A small trace event recorded while ticking a tree.
///
/// `node` is the arena index of the visited node; `status` is what it returned (absent for
/// events that are not node visits).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub node: u64,
    pub status: Option<Status>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            node: 0,
            status: None,
        }
    }

    pub fn with_node(mut self, node: u64) -> Self {
        self.node = node;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }

    pub fn visited(&self, node: u64) -> bool {
        self.events
            .iter()
            .any(|e| e.node == node && e.status.is_some())
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing` at TRACE level under the `voxel::bt` target.
#[derive(Debug, Clone)]
pub struct TracingSink {
    agent: String,
}

impl TracingSink {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
        }
    }
}

impl TraceSink for TracingSink {
    fn emit(&mut self, event: TraceEvent) {
        tracing::trace!(
            target: "voxel::bt",
            agent = %self.agent,
            tick = event.tick,
            tag = %event.tag,
            node = event.node,
            status = ?event.status,
        );
    }
}
