//! Read-only visitor over the C syntax tree.
//!
//! Implement [`Visit`] and override only the hooks you need. Call the matching
//! `walk_*` function from an override to keep the default recursion; leave it
//! out to prune the subtree.

use crate::domain::ast::{Declaration, Node, TranslationUnit};

pub trait Visit: Sized {
    fn visit_translation_unit(&mut self, unit: &TranslationUnit) {
        walk_translation_unit(self, unit);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_declaration(&mut self, _decl: &Declaration) {}

    fn visit_function(&mut self, _name: Option<&str>, _line: usize, body: &[Node]) {
        walk_nodes(self, body);
    }
}

pub fn walk_translation_unit<V: Visit>(v: &mut V, unit: &TranslationUnit) {
    walk_nodes(v, &unit.items);
}

pub fn walk_nodes<V: Visit>(v: &mut V, nodes: &[Node]) {
    for node in nodes {
        v.visit_node(node);
    }
}

/// Dispatch on the node kind. Children are visited in source order, the true
/// branch before the false branch, and for-initializers before the loop body.
pub fn walk_node<V: Visit>(v: &mut V, node: &Node) {
    match node {
        Node::Declaration(decl) => v.visit_declaration(decl),
        Node::FunctionDefinition { name, line, body } => v.visit_function(name.as_deref(), *line, body),
        Node::If {
            then_branch,
            else_branch,
        } => {
            v.visit_node(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_node(else_branch);
            }
        }
        Node::For { init, body } => {
            walk_nodes(v, init);
            v.visit_node(body);
        }
        Node::While { body } | Node::DoWhile { body } | Node::Switch { body } => v.visit_node(body),
        Node::Labeled { body, .. } => v.visit_node(body),
        Node::Case { stmts } | Node::Default { stmts } | Node::Compound(stmts) => walk_nodes(v, stmts),
        Node::Other => {}
    }
}
