//! JSX code generation.
//!
//! Walks a validated `Tree` and writes one self-contained JSX module:
//!
//! ```text
//! import * as React from 'react';
//! import Avatar from "./Avatar.jsx";
//!
//! export default function Card(props) {
//!   return (
//!     <div className="card">
//!       <Avatar />
//!       {props.items.map(($1, key) => (
//!         <li key={key}>{$1.name}</li>
//!       ))}
//!     </div>
//!   );
//! }
//! ```
//!
//! Output is a deterministic function of the tree. Indentation is two
//! spaces per level and starts at level 2 inside `return (`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

use crate::error::{CompileError, RenderError};
use crate::node::{Attribute, NodeData, NodeId, Tree};
use crate::normalize::{component_ident, escape_attr_value, escape_comment, escape_text, member_expr};
use crate::table::{self, Atom};
use crate::validate::check_structure;

/// Comments at least this long are broken across lines.
const INLINE_COMMENT_MAX: usize = 80;

const ROOT_SCOPE: &str = "props";

/// Render `tree` as a JSX module into `writer`.
///
/// The tree is checked with `check_structure` before anything is written.
pub fn render<W: Write>(writer: W, tree: &Tree) -> Result<(), CompileError> {
    check_structure(tree)?;
    let mut r = Renderer::new(BufWriter::new(writer), tree);
    r.component()?;
    r.out.flush()?;
    Ok(())
}

pub fn render_to_string(tree: &Tree) -> Result<String, CompileError> {
    let mut buf = Vec::new();
    render(&mut buf, tree)?;
    String::from_utf8(buf).map_err(|e| RenderError::Malformed(e.to_string()).into())
}

/// JSX name of an attribute on an element.
///
/// Resolution order: global rewrite, tag-scoped rewrite, canonical atom
/// name, normalized literal key.
pub fn attribute_name(element: Atom, attr: &Attribute) -> &str {
    if !attr.key_atom.is_known() {
        return &attr.key;
    }
    if let Some(jsx) = table::global_rewrite(attr.key_atom) {
        return jsx;
    }
    if table::has_scoped_rewrites(element) {
        if let Some(jsx) = table::scoped_rewrite(element, attr.key_atom) {
            return jsx;
        }
    }
    attr.key_atom.as_str()
}

#[derive(Clone, Copy)]
struct Block<'t> {
    id: NodeId,
    name: &'t str,
    negate: bool,
}

struct Renderer<'t, W> {
    out: W,
    tree: &'t Tree,
    indent: usize,
    /// Iteration variables of the enclosing ranges, innermost last.
    scopes: Vec<String>,
    /// Component tag to imported identifier.
    imports: HashMap<String, String>,
}

impl<'t, W: Write> Renderer<'t, W> {
    fn new(out: W, tree: &'t Tree) -> Self {
        let mut imports: HashMap<String, String> = tree
            .imports()
            .iter()
            .map(|a| (a.key.clone(), component_ident(&a.value)))
            .collect();
        if tree.is_self_recursive() {
            let name = tree.component_name();
            imports.insert(name.to_ascii_lowercase(), component_ident(name));
        }
        Renderer {
            out,
            tree,
            indent: 2,
            scopes: Vec::new(),
            imports,
        }
    }

    fn scope(&self) -> &str {
        self.scopes.last().map(String::as_str).unwrap_or(ROOT_SCOPE)
    }

    fn line(&mut self, s: &str) -> io::Result<()> {
        for _ in 0..self.indent {
            self.out.write_all(b"  ")?;
        }
        self.out.write_all(s.as_bytes())?;
        self.out.write_all(b"\n")
    }

    fn component(&mut self) -> Result<(), CompileError> {
        let tree = self.tree;
        writeln!(self.out, "import * as React from 'react';")?;
        for import in tree.imports() {
            writeln!(
                self.out,
                "import {} from \"./{}.jsx\";",
                component_ident(&import.value),
                import.value
            )?;
        }
        writeln!(self.out)?;

        let name = component_ident(tree.component_name());
        if name.is_empty() {
            writeln!(self.out, "export default function (props) {{")?;
        } else {
            writeln!(self.out, "export default function {}(props) {{", name)?;
        }
        writeln!(self.out, "  return (")?;
        self.body(tree.root())?;
        writeln!(self.out, "  );")?;
        writeln!(self.out, "}}")?;
        Ok(())
    }

    /// Children of `parent` as a single JSX expression.
    fn body(&mut self, parent: NodeId) -> Result<(), CompileError> {
        let tree = self.tree;
        let mut kids = tree.children(parent);
        match (kids.next(), kids.next()) {
            (None, _) => self.line("null")?,
            (Some(only), None) if matches!(tree.node(only).data, NodeData::Element { .. }) => {
                self.element(only, false)?
            }
            _ => {
                self.line("<>")?;
                self.indent += 1;
                self.children(parent)?;
                self.indent -= 1;
                self.line("</>")?;
            }
        }
        Ok(())
    }

    fn children(&mut self, parent: NodeId) -> Result<(), CompileError> {
        let tree = self.tree;
        let mut cursor = tree.node(parent).first_child;
        while let Some(id) = cursor {
            let node = tree.node(id);
            match &node.data {
                NodeData::When { name } | NodeData::Unless { name } => {
                    let mut group = vec![id];
                    let mut next = node.next_sibling;
                    while let Some(n) = next {
                        match &tree.node(n).data {
                            NodeData::When { name: m } | NodeData::Unless { name: m } if m == name => {
                                group.push(n);
                                next = tree.node(n).next_sibling;
                            }
                            _ => break,
                        }
                    }
                    self.conditional_group(&group)?;
                    cursor = next;
                }
                data if data.is_inline() => {
                    let mut run = vec![id];
                    let mut next = node.next_sibling;
                    while let Some(n) = next.filter(|n| tree.node(*n).data.is_inline()) {
                        run.push(n);
                        next = tree.node(n).next_sibling;
                    }
                    let text = self.inline_run(&run);
                    self.line(&text)?;
                    cursor = next;
                }
                _ => {
                    self.block(id)?;
                    cursor = node.next_sibling;
                }
            }
        }
        Ok(())
    }

    fn block(&mut self, id: NodeId) -> Result<(), CompileError> {
        let tree = self.tree;
        match &tree.node(id).data {
            NodeData::Element { .. } => self.element(id, false),
            NodeData::Range { .. } => self.range(id),
            NodeData::Comment { text } => self.comment(text),
            NodeData::When { .. } | NodeData::Unless { .. } => self.conditional_group(&[id]),
            NodeData::Text { .. } | NodeData::Variable { .. } => {
                let text = self.inline_run(&[id]);
                Ok(self.line(&text)?)
            }
            NodeData::Component { .. } => Err(RenderError::NestedComponent.into()),
            NodeData::Error => Err(RenderError::ErrorNode.into()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INLINE CONTENT
    // ═══════════════════════════════════════════════════════════════════════════

    /// One line of consecutive Text and Variable siblings.
    ///
    /// Text loses leading space only as a first child and trailing space
    /// only as a last child.
    fn inline_run(&self, run: &[NodeId]) -> String {
        let tree = self.tree;
        let mut out = String::new();
        for &id in run {
            match &tree.node(id).data {
                NodeData::Text { text } if self.in_preformatted(id) => {
                    let mut verbatim = Cow::Borrowed(text.as_str());
                    let node = tree.node(id);
                    let first_in_element = node.prev_sibling.is_none()
                        && node
                            .parent
                            .is_some_and(|p| matches!(tree.node(p).data, NodeData::Element { .. }));
                    if first_in_element && text.starts_with('\n') {
                        verbatim = Cow::Owned(format!("\n{}", text));
                    }
                    let json = serde_json::to_string(verbatim.as_ref())
                        .unwrap_or_else(|_| String::from("\"\""));
                    out.push('{');
                    out.push_str(&json);
                    out.push('}');
                }
                NodeData::Text { text } => {
                    let node = tree.node(id);
                    let mut t = text.as_str();
                    let blank = |c: char| matches!(c, ' ' | '\t' | '\r' | '\n');
                    if node.prev_sibling.is_none() {
                        t = t.trim_start_matches(blank);
                    }
                    if node.next_sibling.is_none() {
                        t = t.trim_end_matches(blank);
                    }
                    out.push_str(&escape_text(t));
                }
                NodeData::Variable { name } => {
                    out.push('{');
                    out.push_str(&member_expr(self.scope(), name));
                    out.push('}');
                }
                _ => {}
            }
        }
        out
    }

    /// Whitespace is significant when the nearest element ancestor is
    /// `pre`, `listing` or `textarea`.
    fn in_preformatted(&self, id: NodeId) -> bool {
        let tree = self.tree;
        let mut cursor = tree.node(id).parent;
        while let Some(p) = cursor {
            if let NodeData::Element { atom, .. } = &tree.node(p).data {
                return table::is_preformatted(*atom);
            }
            cursor = tree.node(p).parent;
        }
        false
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ELEMENTS
    // ═══════════════════════════════════════════════════════════════════════════

    fn element_tag(&self, id: NodeId, atom: Atom) -> String {
        let name = self.tree.tag_name(id);
        if let Some(svg) = table::svg_tag_case(name) {
            return svg.to_string();
        }
        if !atom.is_known() {
            if let Some(ident) = self.imports.get(name) {
                return ident.clone();
            }
        }
        name.to_string()
    }

    fn attribute(&self, element: Atom, a: &Attribute) -> String {
        let name = attribute_name(element, a);
        if a.is_expression {
            format!("{}={{{}}}", name, member_expr(self.scope(), &a.value))
        } else if a.value.is_empty() && table::is_boolean_attr(a.key_atom) {
            name.to_string()
        } else {
            format!("{}=\"{}\"", name, escape_attr_value(&a.value))
        }
    }

    /// Render an element; `keyed` prepends `key={key}` for range bodies.
    fn element(&mut self, id: NodeId, keyed: bool) -> Result<(), CompileError> {
        let tree = self.tree;
        let NodeData::Element { atom, attrs, .. } = &tree.node(id).data else {
            return Err(RenderError::Malformed(format!("{} is not an element", id)).into());
        };
        let atom = *atom;
        let tag = self.element_tag(id, atom);

        let mut open = format!("<{}", tag);
        if keyed {
            open.push_str(" key={key}");
        }
        for a in attrs {
            open.push(' ');
            open.push_str(&self.attribute(atom, a));
        }

        if tree.is_void(id) {
            if tree.has_children(id) {
                return Err(RenderError::VoidChildren(tag).into());
            }
            open.push_str(" />");
            return Ok(self.line(&open)?);
        }
        if !tree.has_children(id) {
            if atom.is_known() {
                open.push_str(&format!("></{}>", tag));
            } else {
                open.push_str(" />");
            }
            return Ok(self.line(&open)?);
        }

        open.push('>');
        if tree.children(id).all(|c| tree.node(c).data.is_inline()) {
            let run: Vec<NodeId> = tree.children(id).collect();
            let inner = self.inline_run(&run);
            return Ok(self.line(&format!("{}{}</{}>", open, inner, tag))?);
        }

        self.line(&open)?;
        self.indent += 1;
        self.children(id)?;
        self.indent -= 1;
        self.line(&format!("</{}>", tag))?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONTROL BLOCKS
    // ═══════════════════════════════════════════════════════════════════════════

    fn condition(&self, b: Block<'_>) -> String {
        let expr = member_expr(self.scope(), b.name);
        if b.negate {
            format!("!{}", expr)
        } else {
            expr
        }
    }

    /// Consecutive When/Unless siblings sharing one condition name.
    fn conditional_group(&mut self, group: &[NodeId]) -> Result<(), CompileError> {
        let tree = self.tree;
        let blocks: Vec<Block<'t>> = group
            .iter()
            .filter_map(|&id| match &tree.node(id).data {
                NodeData::When { name } => Some(Block {
                    id,
                    name,
                    negate: false,
                }),
                NodeData::Unless { name } => Some(Block {
                    id,
                    name,
                    negate: true,
                }),
                _ => None,
            })
            .collect();

        match blocks.as_slice() {
            [] => Ok(()),
            [only] => self.single(*only),
            [a, b] if a.name == b.name && a.negate != b.negate => {
                if a.negate {
                    self.ternary(*b, *a)
                } else {
                    self.ternary(*a, *b)
                }
            }
            [a, b] => {
                self.single(*a)?;
                self.single(*b)
            }
            _ => self.chain(&blocks),
        }
    }

    fn branch(&mut self, id: NodeId) -> Result<(), CompileError> {
        self.indent += 1;
        self.body(id)?;
        self.indent -= 1;
        Ok(())
    }

    fn single(&mut self, b: Block<'_>) -> Result<(), CompileError> {
        let cond = self.condition(b);
        self.line(&format!("{{{} && (", cond))?;
        self.branch(b.id)?;
        self.line(")}")?;
        Ok(())
    }

    fn ternary(&mut self, positive: Block<'_>, negative: Block<'_>) -> Result<(), CompileError> {
        let cond = self.condition(positive);
        self.line(&format!("{{{} ? (", cond))?;
        self.branch(positive.id)?;
        self.line(") : (")?;
        self.branch(negative.id)?;
        self.line(")}")?;
        Ok(())
    }

    fn chain(&mut self, blocks: &[Block<'_>]) -> Result<(), CompileError> {
        for (i, b) in blocks.iter().enumerate() {
            let cond = self.condition(*b);
            if i == 0 {
                self.line(&format!("{{{} ? (", cond))?;
            } else {
                self.line(&format!(") : {} ? (", cond))?;
            }
            self.branch(b.id)?;
        }
        self.line(") : null}")?;
        Ok(())
    }

    fn range(&mut self, id: NodeId) -> Result<(), CompileError> {
        let tree = self.tree;
        let NodeData::Range { name } = &tree.node(id).data else {
            return Err(RenderError::Malformed(format!("{} is not a range", id)).into());
        };
        let source = member_expr(self.scope(), name);
        let var = format!("${}", self.scopes.len() + 1);
        self.line(&format!("{{{}.map(({}, key) => (", source, var))?;

        self.scopes.push(var);
        self.indent += 1;
        let mut kids = tree.children(id);
        match (kids.next(), kids.next()) {
            (Some(only), None) if matches!(tree.node(only).data, NodeData::Element { .. }) => {
                self.element(only, true)?;
            }
            (None, _) => self.line("<React.Fragment key={key}></React.Fragment>")?,
            _ => {
                self.line("<React.Fragment key={key}>")?;
                self.indent += 1;
                self.children(id)?;
                self.indent -= 1;
                self.line("</React.Fragment>")?;
            }
        }
        self.indent -= 1;
        self.scopes.pop();

        self.line("))}")?;
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), CompileError> {
        let body = escape_comment(text);
        if body.len() < INLINE_COMMENT_MAX {
            self.line(&format!("{{/* {} */}}", body))?;
            return Ok(());
        }
        self.line("{/*")?;
        self.indent += 1;
        for l in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.line(l)?;
        }
        self.indent -= 1;
        self.line("*/}")?;
        Ok(())
    }
}
