//! Uninitialized declaration check.
//!
//! Walks every statement reachable from the translation unit and records each
//! declaration that carries no initializer expression.

use tracing::trace;

use crate::domain::ast::{Declaration, Node, TranslationUnit};
use crate::domain::finding::Finding;
use crate::domain::visit::{walk_nodes, Visit};

#[derive(Debug, Default)]
pub struct UninitializedDeclChecker {
    findings: Vec<Finding>,
}

impl UninitializedDeclChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the check over a whole translation unit. Findings come out in
    /// traversal order, which is source order.
    pub fn check(unit: &TranslationUnit) -> Vec<Finding> {
        let mut checker = Self::new();
        checker.visit_translation_unit(unit);
        checker.into_findings()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl Visit for UninitializedDeclChecker {
    fn visit_function(&mut self, name: Option<&str>, line: usize, body: &[Node]) {
        trace!(function = name.unwrap_or("<unnamed>"), line, "checking function body");
        walk_nodes(self, body);
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        if decl.is_initialized() {
            return;
        }
        self.findings.push(Finding {
            line: decl.line,
            name: decl.name.clone(),
            text: decl.text.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, line: usize) -> Node {
        Node::decl(Declaration::new(Some(name.into()), line, format!("int {}", name)))
    }

    fn init_var(name: &str, line: usize) -> Node {
        Node::decl(Declaration::new(Some(name.into()), line, format!("int {}", name)).with_initializer("0"))
    }

    fn names(findings: &[Finding]) -> Vec<&str> {
        findings.iter().filter_map(|f| f.name.as_deref()).collect()
    }

    #[test]
    fn test_initialized_not_reported() {
        let unit = TranslationUnit {
            items: vec![init_var("b", 1)],
        };
        assert!(UninitializedDeclChecker::check(&unit).is_empty());
    }

    #[test]
    fn test_deeply_nested_declaration() {
        // while { switch { case: do { if {} else { for { {} } } } } }
        let innermost = Node::For {
            init: vec![var("i", 5)],
            body: Box::new(Node::compound(vec![Node::compound(vec![var("deep", 6)])])),
        };
        let tree = Node::While {
            body: Box::new(Node::compound(vec![Node::Switch {
                body: Box::new(Node::compound(vec![Node::Case {
                    stmts: vec![Node::DoWhile {
                        body: Box::new(Node::compound(vec![Node::If {
                            then_branch: Box::new(Node::compound(vec![init_var("ok", 3)])),
                            else_branch: Some(Box::new(Node::compound(vec![innermost]))),
                        }])),
                    }],
                }])),
            }])),
        };
        let unit = TranslationUnit {
            items: vec![Node::FunctionDefinition {
                name: Some("f".into()),
                line: 1,
                body: vec![tree, Node::Default { stmts: vec![var("last", 9)] }],
            }],
        };

        let findings = UninitializedDeclChecker::check(&unit);
        assert_eq!(names(&findings), vec!["i", "deep", "last"]);
        assert_eq!(findings.iter().map(|f| f.line).collect::<Vec<_>>(), vec![5, 6, 9]);
    }

    #[test]
    fn test_labeled_statement_descended() {
        let unit = TranslationUnit {
            items: vec![Node::FunctionDefinition {
                name: None,
                line: 1,
                body: vec![Node::Labeled {
                    body: Box::new(Node::compound(vec![var("x", 3)])),
                }],
            }],
        };
        assert_eq!(names(&UninitializedDeclChecker::check(&unit)), vec!["x"]);
    }
}
