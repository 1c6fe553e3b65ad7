//! Read-only views over a parsed [`Document`].
//!
//! Scalars stay untyped spans until one of the coercion helpers here looks at
//! them. Nothing in this module allocates or mutates the tree.

use std::str::FromStr;

use crate::arena::NodeId;
use crate::constants;
use crate::document::{Document, Kind, Node, Span};

/// A node together with the document it lives in.
#[derive(Clone, Copy)]
pub struct NodeRef<'d, 'a> {
    doc: &'d Document<'a>,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("key", &self.key())
            .field("text", &self.text())
            .finish()
    }
}

impl PartialEq for NodeRef<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<'d, 'a> NodeRef<'d, 'a> {
    pub(crate) fn new(doc: &'d Document<'a>, id: NodeId) -> Self {
        Self { doc, id }
    }

    fn node(&self) -> &'d Node {
        self.doc.raw_unchecked(self.id)
    }

    fn at(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.doc, id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document<'a> {
        self.doc
    }

    pub fn kind(&self) -> Kind {
        self.node().kind
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_leaf(&self) -> bool {
        self.kind() == Kind::String
    }

    /// Member name, present when the parent is an object.
    pub fn key(&self) -> Option<&'a str> {
        self.node().key.map(|span| self.doc.resolve(span))
    }

    pub fn key_span(&self) -> Option<Span> {
        self.node().key
    }

    /// Trimmed scalar text; `None` for containers.
    pub fn text(&self) -> Option<&'a str> {
        self.node().text().map(|span| self.doc.resolve(span))
    }

    pub fn span(&self) -> Option<Span> {
        self.node().text()
    }

    pub fn parent(&self) -> Option<Self> {
        self.at(self.node().parent)
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.at(self.node().next)
    }

    pub fn first_child(&self) -> Option<Self> {
        self.at(self.node().first_child())
    }

    /// Children in link order: source order for forward-built trees, reversed
    /// for reverse-built ones.
    pub fn children(&self) -> Children<'d, 'a> {
        Children {
            doc: self.doc,
            cursor: self.node().first_child(),
        }
    }

    /// Element count of an array; 0 for any other kind.
    pub fn count(&self) -> usize {
        match self.kind() {
            Kind::Array => self.node().count,
            _ => 0,
        }
    }

    pub fn as_array(&self) -> Option<ArrayRef<'d, 'a>> {
        self.is_array().then_some(ArrayRef { node: *self })
    }

    /// First child whose key starts with `key`.
    ///
    /// Only the length of `key` is compared, so a member named `"abcdef"`
    /// answers a query for `"abc"`. Use [`NodeRef::get_exact`] for equality.
    pub fn get(&self, key: &str) -> Option<Self> {
        self.children().find(|child| {
            child
                .key()
                .is_some_and(|name| name.as_bytes().starts_with(key.as_bytes()))
        })
    }

    pub fn get_exact(&self, key: &str) -> Option<Self> {
        self.children().find(|child| child.key() == Some(key))
    }

    /// Walks `path` through nested objects with [`NodeRef::get`].
    pub fn path<'p, I>(&self, path: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'p str>,
    {
        path.into_iter()
            .try_fold(*self, |node, segment| node.get(segment))
    }

    pub fn parse_text<T: FromStr>(&self) -> Option<T> {
        self.text()?.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.parse_text()
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.parse_text()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.parse_text()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.text()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.text() == Some("null")
    }

    /// `true`, `false` or `null`, quoted or not.
    pub fn is_literal(&self) -> bool {
        self.text().is_some_and(constants::is_literal)
    }

    pub fn f32_or(&self, default: f32) -> f32 {
        self.as_f32().unwrap_or(default)
    }
}

pub struct Children<'d, 'a> {
    doc: &'d Document<'a>,
    cursor: Option<NodeId>,
}

impl<'d, 'a> Iterator for Children<'d, 'a> {
    type Item = NodeRef<'d, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.doc.raw(id).and_then(|node| node.next);
        Some(NodeRef::new(self.doc, id))
    }
}

/// A node known to be an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayRef<'d, 'a> {
    node: NodeRef<'d, 'a>,
}

impl<'d, 'a> ArrayRef<'d, 'a> {
    pub fn node(&self) -> NodeRef<'d, 'a> {
        self.node
    }

    pub fn count(&self) -> usize {
        self.node.node().count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> Children<'d, 'a> {
        self.node.children()
    }

    /// Copies up to `min(count, max_count, dest.len())` elements into `dest`,
    /// substituting `default` for any element that does not parse as `T`.
    ///
    /// With `source_is_reversed` the destination is filled back to front, so a
    /// reverse-built array comes out in source order. When the limit cuts the
    /// array short in that case, the last elements of the source are the ones
    /// kept. Returns the number of slots written.
    pub fn extract<T>(
        &self,
        dest: &mut [T],
        default: T,
        max_count: Option<usize>,
        source_is_reversed: bool,
    ) -> usize
    where
        T: FromStr + Copy,
    {
        let mut count = self.count().min(dest.len());
        if let Some(max_count) = max_count.filter(|&max| max > 0) {
            count = count.min(max_count);
        }

        let values = self
            .iter()
            .take(count)
            .map(|item| item.parse_text().unwrap_or(default));
        let mut written = 0;
        if source_is_reversed {
            for (slot, value) in dest[..count].iter_mut().rev().zip(values) {
                *slot = value;
                written += 1;
            }
        } else {
            for (slot, value) in dest[..count].iter_mut().zip(values) {
                *slot = value;
                written += 1;
            }
        }
        written
    }

    pub fn extract_f32(
        &self,
        dest: &mut [f32],
        default: f32,
        max_count: Option<usize>,
        source_is_reversed: bool,
    ) -> usize {
        self.extract(dest, default, max_count, source_is_reversed)
    }
}

/// Fills `dest` from the array `node`; does nothing when `node` is not an array.
///
/// A `max_count` of 0 means no limit.
pub fn array_f32(
    dest: &mut [f32],
    node: NodeRef<'_, '_>,
    default: f32,
    max_count: usize,
    source_is_reversed: bool,
) -> usize {
    match node.as_array() {
        Some(array) => array.extract_f32(dest, default, Some(max_count), source_is_reversed),
        None => 0,
    }
}
