use log::trace;
use serde::Serialize;

use crate::access::NodeRef;
use crate::arena::{Arena, NodeId};
use crate::options::ParseMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Object,
    Array,
    /// Every scalar leaf: strings, numbers, booleans and null alike.
    String,
}

impl Kind {
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Object | Kind::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
        }
    }
}

/// Byte range into the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn resolve(self, input: &str) -> Option<&str> {
        input.get(self.start..self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeValue {
    /// Head of the child list of an object or array.
    Children(Option<NodeId>),
    /// Trimmed text of a scalar leaf.
    Text(Span),
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::Children(None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub kind: Kind,
    pub key: Option<Span>,
    pub value: NodeValue,
    pub next: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub count: usize,
}

impl Node {
    pub fn container(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn leaf(text: Span) -> Self {
        Self {
            kind: Kind::String,
            value: NodeValue::Text(text),
            ..Self::default()
        }
    }

    pub fn first_child(&self) -> Option<NodeId> {
        match self.value {
            NodeValue::Children(head) => head,
            NodeValue::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<Span> {
        match self.value {
            NodeValue::Text(span) => Some(span),
            NodeValue::Children(_) => None,
        }
    }
}

/// Structural irregularity noticed while scanning. Offsets are byte positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// A closing bracket with no open container; the scan stopped here.
    UnexpectedClose { offset: usize },
    /// `}` closing an array or `]` closing an object.
    MismatchedClose { offset: usize },
    /// The input ended with containers still open.
    UnclosedContainers { open: usize },
    /// The input ended inside a member name; the scan stopped here.
    TruncatedKey { offset: usize },
    /// A scalar appeared outside any object or array.
    MissingRootContainer { offset: usize },
    /// A value inside an object had no member name before it.
    MissingKey { offset: usize },
}

/// Counts describing a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub mode: ParseMode,
    pub input_len: usize,
    pub nodes: usize,
    pub pages: usize,
    pub arena_bytes: usize,
    pub well_formed: bool,
}

/// A parsed tree borrowing its text from `input`.
///
/// The arena owns every node; dropping or [releasing](Document::release) the
/// document frees them all together.
#[derive(Debug)]
pub struct Document<'a> {
    input: &'a str,
    arena: Arena<Node>,
    root: Option<NodeId>,
    mode: ParseMode,
    anomalies: Vec<Anomaly>,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        input: &'a str,
        arena: Arena<Node>,
        root: Option<NodeId>,
        mode: ParseMode,
        anomalies: Vec<Anomaly>,
    ) -> Self {
        Self {
            input,
            arena,
            root,
            mode,
            anomalies,
        }
    }

    /// The buffer every span points into, cut at the terminating NUL if any.
    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root(&self) -> Option<NodeRef<'_, 'a>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, 'a>> {
        self.arena.get(id).map(|_| NodeRef::new(self, id))
    }

    pub fn raw(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub(crate) fn raw_unchecked(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    /// Looks `key` up among the root's members (prefix match, see [`NodeRef::get`]).
    pub fn get(&self, key: &str) -> Option<NodeRef<'_, 'a>> {
        self.root()?.get(key)
    }

    pub fn is_well_formed(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            mode: self.mode,
            input_len: self.input.len(),
            nodes: self.arena.len(),
            pages: self.arena.page_count(),
            arena_bytes: self.arena.allocated_bytes(),
            well_formed: self.is_well_formed(),
        }
    }

    pub(crate) fn resolve(&self, span: Span) -> &'a str {
        span.resolve(self.input).unwrap_or_default()
    }

    /// Frees the arena and the document in one step.
    pub fn release(mut self) {
        trace!("releasing document with {} nodes", self.arena.len());
        self.arena.release();
    }
}
