use crate::node::{NodeData, NodeId, Tree};

/// Read-only traversal over a parsed `Tree`.
///
/// Rules:
/// 1. Children are visited in source order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers call the `walk_*` functions to continue into children;
///    not calling them prunes the subtree.
pub trait TreeVisitor {
    fn visit_node(&mut self, tree: &Tree, id: NodeId) {
        walk_node(self, tree, id);
    }

    fn visit_component(&mut self, tree: &Tree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_element(&mut self, tree: &Tree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_text(&mut self, _tree: &Tree, _id: NodeId) {}

    fn visit_variable(&mut self, _tree: &Tree, _id: NodeId) {}

    fn visit_when(&mut self, tree: &Tree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_unless(&mut self, tree: &Tree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_range(&mut self, tree: &Tree, id: NodeId) {
        walk_children(self, tree, id);
    }

    fn visit_comment(&mut self, _tree: &Tree, _id: NodeId) {}

    fn visit_error(&mut self, _tree: &Tree, _id: NodeId) {}
}

pub fn walk_tree<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Tree) {
    visitor.visit_node(tree, tree.root());
}

pub fn walk_node<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Tree, id: NodeId) {
    match &tree.node(id).data {
        NodeData::Component { .. } => visitor.visit_component(tree, id),
        NodeData::Element { .. } => visitor.visit_element(tree, id),
        NodeData::Text { .. } => visitor.visit_text(tree, id),
        NodeData::Variable { .. } => visitor.visit_variable(tree, id),
        NodeData::When { .. } => visitor.visit_when(tree, id),
        NodeData::Unless { .. } => visitor.visit_unless(tree, id),
        NodeData::Range { .. } => visitor.visit_range(tree, id),
        NodeData::Comment { .. } => visitor.visit_comment(tree, id),
        NodeData::Error => visitor.visit_error(tree, id),
    }
}

pub fn walk_children<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &Tree, id: NodeId) {
    for child in tree.children(id) {
        visitor.visit_node(tree, child);
    }
}
