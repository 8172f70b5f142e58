//! Template parser.
//!
//! Drives the tokenizer and assembles a `Tree`. Keeps an open-element stack
//! whose bottom is always the component root, the current iteration path,
//! and, when built for a module, the tag to file-index lookup used to record
//! references to sibling components.

use std::collections::HashMap;
use std::io::Read;

use tracing::trace;

use crate::error::{CompileError, TokenError};
use crate::node::{Attribute, NodeData, NodeId, PathSegment, Tree};
use crate::normalize;
use crate::table::{self, Atom};
use crate::token::{TokenKind, Tokenizer};

/// Result of parsing one template.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tree: Tree,
    /// Lookup indices of referenced components, in first-reference order.
    pub dependencies: Vec<usize>,
}

/// Parse a standalone template with an unnamed root and no lookup.
pub fn parse<R: Read>(reader: R) -> Result<Tree, CompileError> {
    Parser::new(reader).parse().map(|p| p.tree)
}

struct Frame {
    id: NodeId,
    /// Path length before this frame was opened.
    saved_path: usize,
}

pub struct Parser<'a, R> {
    tokens: Tokenizer<R>,
    tree: Tree,
    stack: Vec<Frame>,
    path: Vec<PathSegment>,
    lookup: Option<&'a HashMap<String, usize>>,
    dependencies: Vec<usize>,
}

impl<'a, R: Read> Parser<'a, R> {
    pub fn new(reader: R) -> Self {
        Parser {
            tokens: Tokenizer::new(reader),
            tree: Tree::new(""),
            stack: vec![Frame {
                id: Tree::ROOT,
                saved_path: 0,
            }],
            path: Vec::new(),
            lookup: None,
            dependencies: Vec::new(),
        }
    }

    /// Display name of the component root.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.tree = Tree::new(name);
        self
    }

    /// Record references to any tag present in `lookup`.
    pub fn with_lookup(mut self, lookup: &'a HashMap<String, usize>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn parse(mut self) -> Result<Parsed, CompileError> {
        loop {
            let kind = self.tokens.next();
            if kind == TokenKind::Error {
                return match self.tokens.take_err() {
                    None | Some(TokenError::Eof) => Ok(Parsed {
                        tree: self.tree,
                        dependencies: self.dependencies,
                    }),
                    Some(TokenError::Io(e)) => Err(CompileError::Io(e)),
                    Some(e @ TokenError::InvalidUtf8 { .. }) => {
                        Err(CompileError::Tokenizer(e.to_string()))
                    }
                };
            }
            self.step(kind);
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().map(|f| f.id).unwrap_or(Tree::ROOT)
    }

    fn append(&mut self, data: NodeData) -> NodeId {
        let parent = self.top();
        self.tree.push_child(parent, data, self.path.clone())
    }

    fn push(&mut self, id: NodeId, saved_path: usize) {
        self.stack.push(Frame { id, saved_path });
    }

    /// Pop every frame from `index` upward and restore the path saved by the
    /// outermost one. The root frame is never popped.
    fn unwind_to(&mut self, index: usize) {
        let index = index.max(1);
        if let Some(frame) = self.stack.get(index) {
            self.path.truncate(frame.saved_path);
            self.stack.truncate(index);
        }
    }

    fn step(&mut self, kind: TokenKind) {
        let named = matches!(
            kind,
            TokenKind::Variable
                | TokenKind::When
                | TokenKind::Unless
                | TokenKind::Range
                | TokenKind::EndControl
        );
        if named && self.tokens.control_name().is_empty() {
            trace!(?kind, "empty brace construct dropped");
            return;
        }
        match kind {
            TokenKind::Text => self.text(),
            TokenKind::TagOpen => self.open_tag(false),
            TokenKind::TagSelfClosing => self.open_tag(true),
            TokenKind::TagClose => self.close_tag(),
            TokenKind::Variable => {
                let name = self.tokens.control_name().to_string();
                self.append(NodeData::Variable { name });
            }
            TokenKind::When => {
                let name = self.tokens.control_name().to_string();
                let id = self.append(NodeData::When { name });
                self.push(id, self.path.len());
            }
            TokenKind::Unless => {
                let name = self.tokens.control_name().to_string();
                let id = self.append(NodeData::Unless { name });
                self.push(id, self.path.len());
            }
            TokenKind::Range => self.range(),
            TokenKind::EndControl => self.end_control(),
            TokenKind::Comment => {
                let text = self.tokens.comment().to_string();
                self.append(NodeData::Comment { text });
            }
            TokenKind::Error => {}
        }
    }

    fn text(&mut self) {
        let raw = self.tokens.raw();
        let text = if self.in_preformatted() {
            (!raw.is_empty()).then(|| raw.to_string())
        } else {
            normalize::collapse_whitespace(raw)
        };
        if let Some(text) = text {
            self.append(NodeData::Text { text });
        }
    }

    /// Nearest open element is one whose whitespace is significant.
    fn in_preformatted(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match &self.tree.node(f.id).data {
                NodeData::Element { atom, .. } => Some(table::is_preformatted(*atom)),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn open_tag(&mut self, self_closing: bool) {
        let tag = self.tokens.tag_name().unwrap_or_default().to_string();
        let found = Atom::lookup(&tag);
        let (atom, name) = if table::is_common_element(found) {
            (found, String::new())
        } else {
            self.mark_dependency(&tag);
            (Atom::UNKNOWN, tag)
        };

        let mut attrs = Vec::new();
        while let Some(a) = self.tokens.tag_attr() {
            attrs.push(Attribute {
                key: a.key.clone(),
                key_atom: Atom::lookup(&a.raw_key),
                value: a.value.clone(),
                is_expression: a.is_expression,
            });
        }

        let id = self.append(NodeData::Element { atom, name, attrs });
        if self_closing || table::is_void_element(atom) {
            return;
        }
        self.push(id, self.path.len());
    }

    fn close_tag(&mut self) {
        let tag = self.tokens.tag_name().unwrap_or_default().to_string();
        let atom = Atom::lookup(&tag);
        let by_atom = table::is_common_element(atom);

        let found = self.stack.iter().rposition(|f| match &self.tree.node(f.id).data {
            NodeData::Element { atom: a, name, .. } => {
                if by_atom {
                    *a == atom
                } else {
                    !a.is_known() && *name == tag
                }
            }
            _ => false,
        });
        match found {
            Some(i) if i > 0 => self.unwind_to(i),
            _ => trace!(%tag, "unmatched close tag ignored"),
        }
    }

    fn range(&mut self) {
        let name = self.tokens.control_name().to_string();
        let saved = self.path.len();
        let parts: Vec<&str> = name.split('.').collect();
        let last = parts.len() - 1;
        for (i, part) in parts.iter().enumerate() {
            self.path.push(PathSegment {
                name: part.to_string(),
                is_iteration: i == last,
            });
        }
        let id = self.append(NodeData::Range { name });
        self.push(id, saved);
    }

    fn end_control(&mut self) {
        let name = self.tokens.control_name().to_string();
        let found = self
            .stack
            .iter()
            .rposition(|f| self.tree.node(f.id).data.control_name() == Some(name.as_str()));
        match found {
            Some(i) if i > 0 => self.unwind_to(i),
            _ => {
                trace!(%name, "orphan end-control unwinds to root");
                self.unwind_to(1);
            }
        }
    }

    fn mark_dependency(&mut self, tag: &str) {
        if let Some(&index) = self.lookup.and_then(|l| l.get(tag)) {
            if !self.dependencies.contains(&index) {
                self.dependencies.push(index);
            }
        }
    }
}
