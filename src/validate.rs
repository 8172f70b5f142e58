//! Tree and input validation.
//!
//! `check_structure` guards the renderer: it must hold before a single byte
//! is written. `check_scope_paths` verifies the iteration-path bookkeeping
//! done by the parser. Basename validation turns file names into component
//! tags for the module builder.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BasenameError, CompileError, RenderError};
use crate::node::{NodeData, NodeId, PathSegment, Tree};

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════════

/// Deepest node level below the root that the renderer accepts.
///
/// Rendering recurses once per level.
pub const MAX_NESTING: usize = 256;

/// Render preconditions: component root, no nested component, no error
/// node, childless void elements, consistent sibling links and at most
/// `MAX_NESTING` levels below the root.
pub fn check_structure(tree: &Tree) -> Result<(), RenderError> {
    let root = tree.root();
    let Some(node) = tree.get(root) else {
        return Err(RenderError::RootNotComponent);
    };
    if !matches!(node.data, NodeData::Component { .. }) {
        return Err(RenderError::RootNotComponent);
    }
    if node.parent.is_some() {
        return Err(RenderError::Malformed("root has a parent".into()));
    }

    let mut visited = 0usize;
    let mut pending = vec![(root, 0usize)];
    let mut children = Vec::new();
    while let Some((id, depth)) = pending.pop() {
        visited += 1;
        if visited > tree.len() {
            return Err(RenderError::Malformed("cycle in child links".into()));
        }
        if depth > MAX_NESTING {
            return Err(RenderError::Malformed(format!(
                "nesting deeper than {} levels at {}",
                MAX_NESTING, id
            )));
        }
        check_node(tree, id)?;
        check_links(tree, id, &mut children)?;
        pending.extend(children.drain(..).map(|c| (c, depth + 1)));
    }
    Ok(())
}

fn check_node(tree: &Tree, id: NodeId) -> Result<(), RenderError> {
    match &tree.node(id).data {
        NodeData::Component { .. } if id != tree.root() => Err(RenderError::NestedComponent),
        NodeData::Error => Err(RenderError::ErrorNode),
        NodeData::Element { .. } if tree.is_void(id) && tree.has_children(id) => {
            Err(RenderError::VoidChildren(tree.tag_name(id).to_string()))
        }
        _ => Ok(()),
    }
}

fn check_links(tree: &Tree, id: NodeId, pending: &mut Vec<NodeId>) -> Result<(), RenderError> {
    let node = tree.node(id);
    if node.first_child.is_some() != node.last_child.is_some() {
        return Err(RenderError::Malformed(format!(
            "node {} has only one of first/last child",
            id
        )));
    }

    let mut prev: Option<NodeId> = None;
    let mut cursor = node.first_child;
    let mut count = 0usize;
    while let Some(c) = cursor {
        count += 1;
        let child = tree
            .get(c)
            .ok_or_else(|| RenderError::Malformed(format!("dangling child {}", c)))?;
        if count > tree.len() {
            return Err(RenderError::Malformed(format!(
                "cycle in siblings of {}",
                id
            )));
        }
        if child.parent != Some(id) {
            return Err(RenderError::Malformed(format!(
                "child {} does not point back to {}",
                c, id
            )));
        }
        if child.prev_sibling != prev {
            return Err(RenderError::Malformed(format!(
                "broken prev link at {}",
                c
            )));
        }
        pending.push(c);
        prev = Some(c);
        cursor = child.next_sibling;
    }
    if node.last_child != prev {
        return Err(RenderError::Malformed(format!(
            "last child of {} is not the end of its sibling list",
            id
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPE PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Every node's path extends its parent's path; a Range node's path is
/// exactly its parent's path plus the dotted parts of its name, with only
/// the last part marked as an iteration.
pub fn check_scope_paths(tree: &Tree) -> Result<(), RenderError> {
    for id in tree.ids() {
        let node = tree.node(id);
        let Some(parent) = node.parent else {
            continue;
        };
        let Some(parent_node) = tree.get(parent) else {
            return Err(RenderError::Malformed(format!(
                "node {} has a dangling parent {}",
                id, parent
            )));
        };
        let base = &parent_node.path;
        if !node.path.starts_with(base) {
            return Err(RenderError::Malformed(format!(
                "path of {} does not extend its parent's",
                id
            )));
        }
        if let NodeData::Range { name } = &node.data {
            let expected = range_path(base, name);
            if node.path != expected {
                return Err(RenderError::Malformed(format!(
                    "range {} {:?} has an inconsistent path",
                    id, name
                )));
            }
        }
    }
    Ok(())
}

fn range_path(base: &[PathSegment], name: &str) -> Vec<PathSegment> {
    let parts: Vec<&str> = name.split('.').collect();
    let last = parts.len() - 1;
    let mut path = base.to_vec();
    path.extend(parts.iter().enumerate().map(|(i, p)| PathSegment {
        name: p.to_string(),
        is_iteration: i == last,
    }));
    path
}

/// Both structural and scope checks.
pub fn check_tree(tree: &Tree) -> Result<(), RenderError> {
    check_structure(tree)?;
    check_scope_paths(tree)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BASENAMES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref STEM_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap();
}

/// A validated input file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basename {
    /// File name without its extension, as written.
    pub stem: String,
    /// Extension without the dot.
    pub extension: Option<String>,
    /// Lower-cased stem used to match element references.
    pub tag: String,
}

pub fn validate_basename(basename: &str) -> Result<Basename, CompileError> {
    let invalid = |reason| CompileError::InvalidBasename {
        basename: basename.to_string(),
        reason,
    };

    let is_file_name = !basename.is_empty()
        && !basename.contains(['/', '\\'])
        && Path::new(basename).file_name().and_then(|n| n.to_str()) == Some(basename);
    if !is_file_name {
        return Err(invalid(BasenameError::NotAFilename));
    }

    let (stem, extension) = match basename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext.to_string())),
        None => (basename, None),
    };
    if stem.is_empty() {
        return Err(invalid(BasenameError::EmptyStem));
    }
    if !STEM_RE.is_match(stem) {
        let mut chars = stem.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(BasenameError::MustStartWithLetter));
        }
        if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
            return Err(invalid(BasenameError::InvalidCharacter(c)));
        }
    }

    Ok(Basename {
        stem: stem.to_string(),
        extension,
        tag: stem.to_ascii_lowercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attribute;
    use crate::parse::parse;
    use crate::table::Atom;

    fn element(tag: &str) -> NodeData {
        NodeData::Element {
            atom: Atom::lookup(tag),
            name: String::new(),
            attrs: Vec::<Attribute>::new(),
        }
    }

    #[test]
    fn test_parsed_trees_pass() {
        let src = "<div>{#a.b}<p>{c}{?d}<img>{/d}</p>{/a.b}<br/></div>";
        let tree = parse(src.as_bytes()).unwrap();
        assert_eq!(check_tree(&tree), Ok(()));
    }

    #[test]
    fn test_void_with_children() {
        let mut tree = Tree::new("");
        let img = tree.push_child(tree.root(), element("img"), Vec::new());
        tree.push_child(img, element("a"), Vec::new());
        assert_eq!(
            check_structure(&tree),
            Err(RenderError::VoidChildren("img".into()))
        );
    }

    #[test]
    fn test_nested_component_and_error_node() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let nested = NodeData::Component {
            name: "x".into(),
            imports: Vec::new(),
            self_recursive: false,
        };
        tree.push_child(root, nested, Vec::new());
        assert_eq!(check_structure(&tree), Err(RenderError::NestedComponent));

        let mut tree = Tree::new("");
        let root = tree.root();
        tree.push_child(root, NodeData::Error, Vec::new());
        assert_eq!(check_structure(&tree), Err(RenderError::ErrorNode));
    }

    #[test]
    fn test_broken_links() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let a = tree.push_child(root, element("p"), Vec::new());
        tree.push_child(root, element("p"), Vec::new());
        tree.node_mut(a).next_sibling = None;
        assert!(matches!(
            check_structure(&tree),
            Err(RenderError::Malformed(_))
        ));
    }

    #[test]
    fn test_range_path_mismatch() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let wrong = vec![PathSegment {
            name: "items".into(),
            is_iteration: false,
        }];
        tree.push_child(root, NodeData::Range { name: "items".into() }, wrong);
        assert!(matches!(
            check_scope_paths(&tree),
            Err(RenderError::Malformed(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let tree = parse("<div>".repeat(MAX_NESTING).as_bytes()).unwrap();
        assert_eq!(check_structure(&tree), Ok(()));

        let tree = parse("<div>".repeat(MAX_NESTING + 1).as_bytes()).unwrap();
        assert!(matches!(
            check_structure(&tree),
            Err(RenderError::Malformed(_))
        ));
    }

    #[test]
    fn test_dangling_parent() {
        let mut tree = Tree::new("");
        let stray = tree.create(element("p"), Vec::new());
        let missing: NodeId = serde_json::from_str("999").unwrap();
        tree.node_mut(stray).parent = Some(missing);
        assert!(matches!(
            check_scope_paths(&tree),
            Err(RenderError::Malformed(_))
        ));
    }

    #[test]
    fn test_basenames() {
        let b = validate_basename("UserCard.stache").unwrap();
        assert_eq!(b.stem, "UserCard");
        assert_eq!(b.tag, "usercard");
        assert_eq!(b.extension.as_deref(), Some("stache"));

        let b = validate_basename("user-card").unwrap();
        assert_eq!(b.stem, "user-card");
        assert_eq!(b.extension, None);

        let reason = |name: &str| match validate_basename(name) {
            Err(CompileError::InvalidBasename { reason, .. }) => reason,
            other => panic!("expected invalid basename, got {:?}", other),
        };
        assert_eq!(reason("dir/Card.stache"), BasenameError::NotAFilename);
        assert_eq!(reason(""), BasenameError::NotAFilename);
        assert_eq!(reason(".stache"), BasenameError::EmptyStem);
        assert_eq!(reason("1Card.stache"), BasenameError::MustStartWithLetter);
        assert_eq!(reason("Ca_rd.stache"), BasenameError::InvalidCharacter('_'));
        assert_eq!(reason("a.b.stache"), BasenameError::InvalidCharacter('.'));
    }
}
