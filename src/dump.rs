//! Canonical textual dump of a tree.
//!
//! One node per line, indented two spaces per depth:
//!
//! ```text
//! component "Card" imports=[avatar:Avatar]
//!   element <ul> class="list"
//!     range "items" @items*
//!       element <li> @items*
//!         variable "name" @items*
//! ```
//!
//! Attribute keys are shown after normalization; expression values appear
//! in braces. A non-empty scope path is appended after `@`, with `*` marking
//! iteration segments. Children below `MAX_NESTING` levels are elided as a
//! single `...` line.

use std::fmt::Write;

use crate::node::{Attribute, NodeData, NodeId, PathSegment, Tree};
use crate::validate::MAX_NESTING;
use crate::visitor::{walk_node, walk_tree, TreeVisitor};

pub fn dump(tree: &Tree) -> String {
    let mut d = Dumper {
        out: String::new(),
        depth: 0,
    };
    walk_tree(&mut d, tree);
    d.out
}

struct Dumper {
    out: String,
    depth: usize,
}

impl Dumper {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn line(&mut self, tree: &Tree, id: NodeId) {
        let node = tree.node(id);
        self.indent();
        self.out.push_str(node.data.kind_name());
        match &node.data {
            NodeData::Component {
                name,
                imports,
                self_recursive,
            } => {
                let _ = write!(self.out, " {:?}", name);
                if !imports.is_empty() {
                    let list: Vec<String> = imports
                        .iter()
                        .map(|a| format!("{}:{}", a.key, a.value))
                        .collect();
                    let _ = write!(self.out, " imports=[{}]", list.join(", "));
                }
                if *self_recursive {
                    self.out.push_str(" recursive");
                }
            }
            NodeData::Element { attrs, .. } => {
                let _ = write!(self.out, " <{}>", tree.tag_name(id));
                for a in attrs {
                    self.out.push(' ');
                    attribute(&mut self.out, a);
                }
            }
            NodeData::Text { text } | NodeData::Comment { text } => {
                let _ = write!(self.out, " {:?}", text);
            }
            NodeData::Variable { name }
            | NodeData::When { name }
            | NodeData::Unless { name }
            | NodeData::Range { name } => {
                let _ = write!(self.out, " {:?}", name);
            }
            NodeData::Error => {}
        }
        if !node.path.is_empty() {
            self.out.push_str(" @");
            path(&mut self.out, &node.path);
        }
        self.out.push('\n');
    }
}

fn attribute(out: &mut String, a: &Attribute) {
    if a.is_expression {
        let _ = write!(out, "{}={{{}}}", a.key, a.value);
    } else {
        let _ = write!(out, "{}={:?}", a.key, a.value);
    }
}

fn path(out: &mut String, segments: &[PathSegment]) {
    for (i, s) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&s.name);
        if s.is_iteration {
            out.push('*');
        }
    }
}

impl TreeVisitor for Dumper {
    fn visit_node(&mut self, tree: &Tree, id: NodeId) {
        self.line(tree, id);
        self.depth += 1;
        if self.depth > MAX_NESTING {
            if tree.has_children(id) {
                self.indent();
                self.out.push_str("...\n");
            }
        } else {
            walk_node(self, tree, id);
        }
        self.depth -= 1;
    }
}
