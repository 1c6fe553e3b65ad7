//! Single-pass tree builder.
//!
//! One forward scan over the input, dispatching on the byte under the cursor.
//! Open containers live on a scope stack above a synthetic object root that
//! is never allocated. Each scope tracks the head and tail of its child list
//! while it is open; forward mode appends at the tail and writes the head into
//! the node when the scope closes, reverse mode prepends and keeps the node's
//! head current after every insertion.

pub mod scan;

use log::{debug, warn};
use smallvec::SmallVec;

use crate::arena::{Arena, NodeId};
use crate::constants::{is_quote, is_space, INLINE_DEPTH};
use crate::document::{Anomaly, Document, Kind, Node, NodeValue, Span};
use crate::options::{ParseMode, ParseOptions};
use crate::{Error, Result};

use self::scan::{opens_value, scan_key, scan_value, skip_separators, terminated_len};

pub fn parse<'a>(input: &'a str, options: &ParseOptions) -> Result<Document<'a>> {
    let len = terminated_len(input.as_bytes());
    if len == 0 {
        return Err(Error::EmptyInput);
    }
    let mut builder = TreeBuilder::new(&input[..len], options);
    builder.run()?;
    Ok(builder.finish())
}

pub fn parse_bytes<'a>(input: &'a [u8], options: &ParseOptions) -> Result<Document<'a>> {
    let len = terminated_len(input);
    let text = std::str::from_utf8(&input[..len])?;
    parse(text, options)
}

#[derive(Clone, Copy, Debug)]
struct Scope {
    /// `None` for the synthetic root.
    node: Option<NodeId>,
    kind: Kind,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl Scope {
    fn open(node: Option<NodeId>, kind: Kind) -> Self {
        Self {
            node,
            kind,
            head: None,
            tail: None,
        }
    }
}

struct TreeBuilder<'a> {
    input: &'a str,
    mode: ParseMode,
    arena: Arena<Node>,
    root: Scope,
    scopes: SmallVec<[Scope; INLINE_DEPTH]>,
    pending_key: Option<Span>,
    looking_for_key: bool,
    anomalies: Vec<Anomaly>,
}

impl<'a> TreeBuilder<'a> {
    fn new(input: &'a str, options: &ParseOptions) -> Self {
        Self {
            input,
            mode: options.mode,
            arena: Arena::with_config(options.arena),
            root: Scope::open(None, Kind::Object),
            scopes: SmallVec::new(),
            pending_key: None,
            looking_for_key: false,
            anomalies: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let byte = bytes[pos];
            match byte {
                b'{' | b'[' => {
                    self.open(byte, pos)?;
                    pos += 1;
                }
                b'}' | b']' => {
                    if !self.close(byte, pos) {
                        return Ok(());
                    }
                    pos += 1;
                }
                b',' => {
                    self.looking_for_key = self.current_kind() == Kind::Object;
                    pos += 1;
                }
                _ if is_quote(byte) => {
                    if !self.looking_for_key
                        && bytes.get(pos + 1) == Some(&byte)
                        && opens_value(bytes, pos)
                    {
                        self.push_leaf(Span::empty(pos + 1), pos)?;
                        pos += 2;
                    } else {
                        pos += 1;
                    }
                }
                _ if is_space(byte) => pos += 1,
                _ if self.looking_for_key => {
                    let key = scan_key(bytes, pos);
                    if key.stop >= bytes.len() {
                        self.note(Anomaly::TruncatedKey {
                            offset: key.span.start,
                        });
                        return Ok(());
                    }
                    self.pending_key = Some(key.span);
                    self.looking_for_key = false;
                    pos = skip_separators(bytes, key.stop);
                }
                _ => {
                    let value = scan_value(bytes, pos);
                    self.push_leaf(value.span, pos)?;
                    pos = value.stop;
                }
            }
        }
        Ok(())
    }

    fn current_kind(&self) -> Kind {
        self.scopes.last().map_or(self.root.kind, |scope| scope.kind)
    }

    fn open(&mut self, byte: u8, pos: usize) -> Result<()> {
        let kind = if byte == b'{' { Kind::Object } else { Kind::Array };
        let id = self.arena.alloc()?;
        self.arena[id] = Node::container(kind);
        self.attach(id, pos);
        self.scopes.push(Scope::open(Some(id), kind));
        self.looking_for_key = kind == Kind::Object;
        Ok(())
    }

    /// Returns `false` when the scan has to stop.
    fn close(&mut self, byte: u8, pos: usize) -> bool {
        let Some(scope) = self.scopes.pop() else {
            self.note(Anomaly::UnexpectedClose { offset: pos });
            return false;
        };
        let expected = if byte == b'}' { Kind::Object } else { Kind::Array };
        if scope.kind != expected {
            self.note(Anomaly::MismatchedClose { offset: pos });
        }
        self.finalize(scope);
        self.looking_for_key = self.current_kind() == Kind::Object;
        true
    }

    fn push_leaf(&mut self, text: Span, pos: usize) -> Result<()> {
        let id = self.arena.alloc()?;
        self.arena[id] = Node::leaf(text);
        if self.scopes.is_empty()
            && !self
                .anomalies
                .iter()
                .any(|anomaly| matches!(anomaly, Anomaly::MissingRootContainer { .. }))
        {
            self.note(Anomaly::MissingRootContainer { offset: pos });
        }
        self.attach(id, pos);
        Ok(())
    }

    /// Links `child` into the current scope, claims the pending key and bumps
    /// the array count.
    fn attach(&mut self, child: NodeId, pos: usize) {
        let key = self.pending_key.take();
        if key.is_none()
            && self
                .scopes
                .last()
                .is_some_and(|scope| scope.kind == Kind::Object)
        {
            self.note(Anomaly::MissingKey { offset: pos });
        }
        let scope = self.scopes.last_mut().unwrap_or(&mut self.root);
        let parent = scope.node;

        match self.mode {
            ParseMode::Forward => {
                match scope.tail {
                    Some(tail) => self.arena[tail].next = Some(child),
                    None => scope.head = Some(child),
                }
                scope.tail = Some(child);
            }
            ParseMode::Reverse => {
                self.arena[child].next = scope.head;
                scope.head = Some(child);
                if let Some(parent) = parent {
                    self.arena[parent].value = NodeValue::Children(Some(child));
                }
            }
        }

        if let Some(parent) = parent {
            let parent_node = &mut self.arena[parent];
            if parent_node.kind == Kind::Array {
                parent_node.count += 1;
            }
        }

        let node = &mut self.arena[child];
        node.parent = parent;
        node.key = key;
    }

    fn finalize(&mut self, scope: Scope) {
        if self.mode == ParseMode::Reverse {
            return;
        }
        if let Some(id) = scope.node {
            self.arena[id].value = NodeValue::Children(scope.head);
        }
    }

    fn note(&mut self, anomaly: Anomaly) {
        warn!("malformed input: {anomaly:?}");
        self.anomalies.push(anomaly);
    }

    fn finish(mut self) -> Document<'a> {
        if !self.scopes.is_empty() {
            self.note(Anomaly::UnclosedContainers {
                open: self.scopes.len(),
            });
            while let Some(scope) = self.scopes.pop() {
                self.finalize(scope);
            }
        }

        let root = self.root.head;
        debug!(
            "parsed {} bytes into {} nodes across {} pages ({:?} mode, {} anomalies)",
            self.input.len(),
            self.arena.len(),
            self.arena.page_count(),
            self.mode,
            self.anomalies.len()
        );
        Document::new(self.input, self.arena, root, self.mode, self.anomalies)
    }
}
