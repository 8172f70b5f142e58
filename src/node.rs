//! Arena-backed template AST.
//!
//! All nodes of one parsed file live in a single `Tree`. Parent, child and
//! sibling links are `NodeId` indices into the arena, so the doubly linked
//! shape needs no shared ownership. Index 0 is always the component root.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::table::{self, Atom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub key: String,
    pub key_atom: Atom,
    pub value: String,
    pub is_expression: bool,
}

impl Attribute {
    pub fn literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            key: key.into(),
            key_atom: Atom::UNKNOWN,
            value: value.into(),
            is_expression: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    pub name: String,
    pub is_iteration: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeData {
    Component {
        name: String,
        /// `key` is the imported tag, `value` the source stem.
        imports: Vec<Attribute>,
        #[serde(rename = "selfRecursive")]
        self_recursive: bool,
    },
    Element {
        atom: Atom,
        /// Empty for host elements; the verbatim tag otherwise.
        name: String,
        attrs: Vec<Attribute>,
    },
    Text {
        text: String,
    },
    Variable {
        name: String,
    },
    When {
        name: String,
    },
    Unless {
        name: String,
    },
    Range {
        name: String,
    },
    Comment {
        text: String,
    },
    Error,
}

impl NodeData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeData::Component { .. } => "component",
            NodeData::Element { .. } => "element",
            NodeData::Text { .. } => "text",
            NodeData::Variable { .. } => "variable",
            NodeData::When { .. } => "when",
            NodeData::Unless { .. } => "unless",
            NodeData::Range { .. } => "range",
            NodeData::Comment { .. } => "comment",
            NodeData::Error => "error",
        }
    }

    /// Name of a When, Unless or Range block.
    pub fn control_name(&self) -> Option<&str> {
        match self {
            NodeData::When { name } | NodeData::Unless { name } | NodeData::Range { name } => {
                Some(name)
            }
            _ => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, NodeData::Text { .. } | NodeData::Variable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub data: NodeData,
    /// Iteration path in effect where the node was parsed.
    pub path: Vec<PathSegment>,
}

impl Node {
    fn detached(data: NodeData, path: Vec<PathSegment>) -> Self {
        Node {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
            path,
        }
    }

    fn is_attached(&self) -> bool {
        self.parent.is_some() || self.prev_sibling.is_some() || self.next_sibling.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("node {0} is already attached")]
    Attached(NodeId),
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {0} does not exist")]
    Missing(NodeId),
    #[error("the root node cannot be moved")]
    Root,
    #[error("node {0} cannot be placed under its own subtree")]
    Ancestor(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = NodeId(0);

    /// A tree holding only a component root.
    pub fn new(name: impl Into<String>) -> Self {
        let root = NodeData::Component {
            name: name.into(),
            imports: Vec::new(),
            self_recursive: false,
        };
        Tree {
            nodes: vec![Node::detached(root, Vec::new())],
        }
    }

    pub fn root(&self) -> NodeId {
        Tree::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Allocate an unlinked node.
    pub fn create(&mut self, data: NodeData, path: Vec<PathSegment>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::detached(data, path));
        id
    }

    /// Allocate a node and link it as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, data: NodeData, path: Vec<PathSegment>) -> NodeId {
        let id = self.create(data, path);
        self.link(parent, id, None);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LinkError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`, or at the end when it is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), LinkError> {
        self.check(parent)?;
        self.check(child)?;
        if child == Tree::ROOT {
            return Err(LinkError::Root);
        }
        if self.node(child).is_attached() {
            return Err(LinkError::Attached(child));
        }
        if self.ancestors_or_self(parent).any(|a| a == child) {
            return Err(LinkError::Ancestor(child));
        }
        if let Some(r) = reference {
            self.check(r)?;
            if self.node(r).parent != Some(parent) {
                return Err(LinkError::NotAChild { parent, child: r });
            }
        }
        self.link(parent, child, reference);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LinkError> {
        self.check(parent)?;
        self.check(child)?;
        if self.node(child).parent != Some(parent) {
            return Err(LinkError::NotAChild { parent, child });
        }
        let (prev, next) = {
            let c = self.node(child);
            (c.prev_sibling, c.next_sibling)
        };
        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let c = self.node_mut(child);
        c.parent = None;
        c.prev_sibling = None;
        c.next_sibling = None;
        Ok(())
    }

    fn ancestors_or_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&n| self.node(n).parent)
    }

    fn check(&self, id: NodeId) -> Result<(), LinkError> {
        match self.get(id) {
            Some(_) => Ok(()),
            None => Err(LinkError::Missing(id)),
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let (prev, next) = match reference {
            Some(r) => (self.node(r).prev_sibling, Some(r)),
            None => (self.node(parent).last_child, None),
        };
        match prev {
            Some(p) => self.node_mut(p).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
        let c = self.node_mut(child);
        c.parent = Some(parent);
        c.prev_sibling = prev;
        c.next_sibling = next;
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(id).first_child,
        }
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.node(id).first_child.is_some()
    }

    /// Element tag: the canonical atom name for host elements, the verbatim
    /// name for component references, empty for every other node.
    pub fn tag_name(&self, id: NodeId) -> &str {
        match &self.node(id).data {
            NodeData::Element { atom, .. } if atom.is_known() => atom.as_str(),
            NodeData::Element { name, .. } => name,
            _ => "",
        }
    }

    pub fn is_void(&self, id: NodeId) -> bool {
        matches!(&self.node(id).data, NodeData::Element { atom, .. } if table::is_void_element(*atom))
    }

    pub fn component_name(&self) -> &str {
        match &self.node(Tree::ROOT).data {
            NodeData::Component { name, .. } => name,
            _ => "",
        }
    }

    pub fn imports(&self) -> &[Attribute] {
        match &self.node(Tree::ROOT).data {
            NodeData::Component { imports, .. } => imports,
            _ => &[],
        }
    }

    pub fn is_self_recursive(&self) -> bool {
        matches!(
            &self.node(Tree::ROOT).data,
            NodeData::Component {
                self_recursive: true,
                ..
            }
        )
    }

    /// Replace the root's import list.
    pub fn set_imports(&mut self, list: Vec<Attribute>) {
        if let NodeData::Component { imports, .. } = &mut self.node_mut(Tree::ROOT).data {
            *imports = list;
        }
    }

    pub fn set_self_recursive(&mut self, value: bool) {
        if let NodeData::Component { self_recursive, .. } = &mut self.node_mut(Tree::ROOT).data {
            *self_recursive = value;
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> NodeData {
        NodeData::Text { text: s.to_string() }
    }

    fn texts(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .map(|c| match &tree.node(c).data {
                NodeData::Text { text } => text.clone(),
                other => other.kind_name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_append_and_insert() {
        let mut tree = Tree::new("Card");
        let root = tree.root();
        let a = tree.create(text("a"), Vec::new());
        let c = tree.create(text("c"), Vec::new());
        let b = tree.create(text("b"), Vec::new());
        tree.append_child(root, a).unwrap();
        tree.append_child(root, c).unwrap();
        tree.insert_before(root, b, Some(c)).unwrap();
        assert_eq!(texts(&tree, root), vec!["a", "b", "c"]);
        assert_eq!(tree.node(root).first_child, Some(a));
        assert_eq!(tree.node(root).last_child, Some(c));
        assert_eq!(tree.node(b).prev_sibling, Some(a));
        assert_eq!(tree.node(b).next_sibling, Some(c));
    }

    #[test]
    fn test_remove_child() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let a = tree.push_child(root, text("a"), Vec::new());
        let b = tree.push_child(root, text("b"), Vec::new());
        let c = tree.push_child(root, text("c"), Vec::new());

        tree.remove_child(root, b).unwrap();
        assert_eq!(texts(&tree, root), vec!["a", "c"]);
        assert_eq!(tree.node(a).next_sibling, Some(c));
        assert_eq!(tree.node(c).prev_sibling, Some(a));

        tree.remove_child(root, a).unwrap();
        tree.remove_child(root, c).unwrap();
        assert!(!tree.has_children(root));
        assert_eq!(tree.node(root).last_child, None);

        // Detached nodes can be linked again.
        tree.append_child(root, b).unwrap();
        assert_eq!(texts(&tree, root), vec!["b"]);
    }

    #[test]
    fn test_link_errors() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let a = tree.push_child(root, text("a"), Vec::new());
        let b = tree.create(text("b"), Vec::new());
        assert_eq!(tree.append_child(root, a), Err(LinkError::Attached(a)));
        assert_eq!(
            tree.remove_child(root, b),
            Err(LinkError::NotAChild { parent: root, child: b })
        );
        assert_eq!(tree.append_child(a, root), Err(LinkError::Root));
        assert_eq!(
            tree.insert_before(root, b, Some(b)),
            Err(LinkError::NotAChild { parent: root, child: b })
        );

        let inner = tree.push_child(a, text("inner"), Vec::new());
        tree.remove_child(root, a).unwrap();
        assert_eq!(tree.append_child(inner, a), Err(LinkError::Ancestor(a)));
        assert_eq!(tree.append_child(a, a), Err(LinkError::Ancestor(a)));
    }

    #[test]
    fn test_tag_name() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let host = tree.push_child(
            root,
            NodeData::Element {
                atom: Atom::lookup("div"),
                name: String::new(),
                attrs: Vec::new(),
            },
            Vec::new(),
        );
        let comp = tree.push_child(
            root,
            NodeData::Element {
                atom: Atom::UNKNOWN,
                name: "avatar".to_string(),
                attrs: Vec::new(),
            },
            Vec::new(),
        );
        assert_eq!(tree.tag_name(host), "div");
        assert_eq!(tree.tag_name(comp), "avatar");
        assert_eq!(tree.tag_name(root), "");
    }

    #[test]
    fn test_json_dump() {
        let mut tree = Tree::new("Card");
        let root = tree.root();
        tree.push_child(root, NodeData::Variable { name: "title".into() }, Vec::new());
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"type\": \"component\""));
        assert!(json.contains("\"selfRecursive\": false"));
        assert!(json.contains("\"type\": \"variable\""));
        let back: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
