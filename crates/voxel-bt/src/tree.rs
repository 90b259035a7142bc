use std::fmt::{self, Write as _};

use voxel_core::Status;
use voxel_trace::{TraceEvent, TraceSink};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bt::{Leaf, NodeState};

/// Index of a node inside its [`BehaviourTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Children of a Sequence/Selector plus the child that returned `Running` last tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composite {
    children: Vec<NodeId>,
    running: Option<usize>,
}

impl Composite {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn running(&self) -> Option<usize> {
        self.running
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind<L> {
    /// AND: left to right, stops at the first child that does not succeed.
    Sequence(Composite),
    /// OR: left to right, stops at the first child that does not fail.
    Selector(Composite),
    Leaf(L),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Sequence,
    Selector,
    Leaf,
}

impl<L> NodeKind<L> {
    fn tag(&self) -> Tag {
        match self {
            NodeKind::Sequence(_) => Tag::Sequence,
            NodeKind::Selector(_) => Tag::Selector,
            NodeKind::Leaf(_) => Tag::Leaf,
        }
    }

    fn composite(&self) -> Option<&Composite> {
        match self {
            NodeKind::Sequence(c) | NodeKind::Selector(c) => Some(c),
            NodeKind::Leaf(_) => None,
        }
    }

    fn composite_mut(&mut self) -> Option<&mut Composite> {
        match self {
            NodeKind::Sequence(c) | NodeKind::Selector(c) => Some(c),
            NodeKind::Leaf(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node<L> {
    kind: NodeKind<L>,
    state: NodeState,
}

impl<L> Node<L> {
    pub fn kind(&self) -> &NodeKind<L> {
        &self.kind
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn leaf(&self) -> Option<&L> {
        match &self.kind {
            NodeKind::Leaf(l) => Some(l),
            _ => None,
        }
    }
}

struct Tracer<'s> {
    tick: u64,
    sink: Option<&'s mut dyn TraceSink>,
}

impl Tracer<'_> {
    fn visit(&mut self, tag: &'static str, id: NodeId, status: Status) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.emit(
                TraceEvent::new(self.tick, tag)
                    .with_node(id.0 as u64)
                    .with_status(status),
            );
        }
    }
}

/// Behaviour tree stored as a flat arena.
///
/// Build bottom-up: create leaves, then the composites that own them, then call
/// [`BehaviourTree::set_root`]. Composites remember their running child between ticks and
/// resume from it; the memory is cleared whenever the composite returns a non-`Running`
/// status.
#[derive(Debug, Clone)]
pub struct BehaviourTree<L> {
    nodes: Vec<Node<L>>,
    root: Option<NodeId>,
}

impl<L> Default for BehaviourTree<L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<L> BehaviourTree<L> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind<L>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            state: NodeState::Invalid,
        });
        id
    }

    pub fn leaf(&mut self, leaf: L) -> NodeId {
        self.push(NodeKind::Leaf(leaf))
    }

    pub fn sequence(&mut self, children: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Sequence(Composite {
            children,
            running: None,
        }))
    }

    pub fn selector(&mut self, children: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::Selector(Composite {
            children,
            running: None,
        }))
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id.0]
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.nodes[id.0].state
    }

    /// Remembered running child index of a composite (`None` for leaves).
    pub fn running_child(&self, id: NodeId) -> Option<usize> {
        self.nodes[id.0].kind.composite().and_then(Composite::running)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.0]
            .kind
            .composite()
            .map(Composite::children)
            .unwrap_or(&[])
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> Option<&mut L> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &L)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.leaf().map(|l| (NodeId(i), l)))
    }

    /// First leaf (in arena order) matching `pred`.
    pub fn find_leaf(&self, mut pred: impl FnMut(&L) -> bool) -> Option<NodeId> {
        self.leaves().find(|(_, l)| pred(l)).map(|(id, _)| id)
    }

    /// Tick the whole tree once. A tree without a root fails.
    pub fn tick<C>(&mut self, ctx: &mut C) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        let mut tracer = Tracer { tick: 0, sink: None };
        self.tick_root(ctx, &mut tracer)
    }

    /// Tick once, reporting every visited node into `sink`.
    pub fn tick_traced<C>(&mut self, ctx: &mut C, tick: u64, sink: &mut dyn TraceSink) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        let mut tracer = Tracer {
            tick,
            sink: Some(sink),
        };
        self.tick_root(ctx, &mut tracer)
    }

    fn tick_root<C>(&mut self, ctx: &mut C, tracer: &mut Tracer<'_>) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        match self.root {
            Some(root) => self.tick_node(root, ctx, tracer),
            None => Status::Failure,
        }
    }

    fn tick_node<C>(&mut self, id: NodeId, ctx: &mut C, tracer: &mut Tracer<'_>) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        match self.nodes[id.0].kind.tag() {
            Tag::Leaf => {
                let status = self.tick_leaf(id, ctx);
                tracer.visit("bt.leaf", id, status);
                status
            }
            Tag::Sequence => {
                let status = self.tick_composite(id, ctx, tracer, Status::Success);
                tracer.visit("bt.composite", id, status);
                status
            }
            Tag::Selector => {
                let status = self.tick_composite(id, ctx, tracer, Status::Failure);
                tracer.visit("bt.composite", id, status);
                status
            }
        }
    }

    fn tick_leaf<C>(&mut self, id: NodeId, ctx: &mut C) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        let node = &mut self.nodes[id.0];
        let was_running = node.state == NodeState::Running;
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return Status::Failure;
        };

        let status = leaf.tick(ctx);
        if was_running && status != Status::Running {
            leaf.on_exit(ctx, status.into());
        }
        node.state = status.into();
        status
    }

    /// `advance_on` is the child status that moves on to the next child (Success for a
    /// Sequence, Failure for a Selector); it is also the result when every child produced it.
    fn tick_composite<C>(
        &mut self,
        id: NodeId,
        ctx: &mut C,
        tracer: &mut Tracer<'_>,
        advance_on: Status,
    ) -> Status
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        let Some((start, len)) = self.nodes[id.0]
            .kind
            .composite()
            .map(|c| (c.running.unwrap_or(0), c.children.len()))
        else {
            return Status::Failure;
        };

        let mut result = advance_on;
        let mut running = None;
        for i in start..len {
            let child = self.children(id)[i];
            let status = self.tick_node(child, ctx, tracer);
            if status == advance_on {
                continue;
            }
            if status == Status::Running {
                running = Some(i);
            }
            result = status;
            break;
        }

        let node = &mut self.nodes[id.0];
        if let Some(c) = node.kind.composite_mut() {
            c.running = running;
        }
        node.state = result.into();
        result
    }

    /// Abandon every running node: leaves get `on_exit(Invalid)`, composites forget their
    /// running child.
    pub fn halt<C>(&mut self, ctx: &mut C)
    where
        C: ?Sized,
        L: Leaf<C>,
    {
        for node in self.nodes.iter_mut() {
            if node.state != NodeState::Running {
                continue;
            }
            match &mut node.kind {
                NodeKind::Leaf(leaf) => leaf.on_exit(ctx, NodeState::Invalid),
                NodeKind::Sequence(c) | NodeKind::Selector(c) => c.running = None,
            }
            node.state = NodeState::Invalid;
        }
    }

    /// Leaves currently in the `Running` state.
    pub fn running_leaves(&self) -> impl Iterator<Item = (NodeId, &L)> {
        self.leaves()
            .filter(|(id, _)| self.nodes[id.0].state == NodeState::Running)
    }
}

impl<L: fmt::Display> BehaviourTree<L> {
    /// Indented text rendering with the last state of every node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.render_node(root, 0, &mut out);
        }
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        let _ = write!(out, "{:indent$}{} ", "", node.state, indent = depth * 2);
        match &node.kind {
            NodeKind::Sequence(c) => {
                let _ = writeln!(out, "Sequence");
                for child in &c.children {
                    self.render_node(*child, depth + 1, out);
                }
            }
            NodeKind::Selector(c) => {
                let _ = writeln!(out, "Selector");
                for child in &c.children {
                    self.render_node(*child, depth + 1, out);
                }
            }
            NodeKind::Leaf(leaf) => {
                let _ = writeln!(out, "{leaf}");
            }
        }
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root: self.root.map(NodeId::index),
            nodes: self
                .nodes
                .iter()
                .map(|node| {
                    let (kind, label) = match &node.kind {
                        NodeKind::Sequence(_) => ("sequence", String::from("Sequence")),
                        NodeKind::Selector(_) => ("selector", String::from("Selector")),
                        NodeKind::Leaf(leaf) => ("leaf", leaf.to_string()),
                    };
                    let composite = node.kind.composite();
                    NodeSnapshot {
                        kind,
                        label,
                        state: node.state,
                        children: composite
                            .map(|c| c.children.iter().map(|id| id.0).collect())
                            .unwrap_or_default(),
                        running: composite.and_then(Composite::running),
                    }
                })
                .collect(),
        }
    }
}

/// Plain-data copy of a tree's node states, for logging or replay tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TreeSnapshot {
    pub root: Option<usize>,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NodeSnapshot {
    pub kind: &'static str,
    pub label: String,
    pub state: NodeState,
    pub children: Vec<usize>,
    pub running: Option<usize>,
}

impl TreeSnapshot {
    pub fn running(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes
            .iter()
            .filter(|n| n.state == NodeState::Running)
    }
}
