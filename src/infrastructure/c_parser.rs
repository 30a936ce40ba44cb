/// tree-sitter C Parser Adapter
///
/// Parses C source with `tree-sitter-c` and lowers the concrete syntax tree
/// into the domain [`TranslationUnit`]. Multi-declarator statements are split
/// into one `Declaration` per declarator, and bare tag declarations
/// (`struct s { ... };`) become a declaration of their own. Typedefs produce
/// no node. Rendered text is rebuilt from tokens, so comments and source
/// spacing never reach a report.

use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node as TsNode, Parser};

use crate::domain::ast::{Declaration, Node, TranslationUnit};
use crate::ports::SyntaxTreeParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to load the C grammar: {0}")]
    Language(String),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}: {detail}")]
    Syntax {
        line: usize,
        column: usize,
        detail: String,
    },
}

pub struct TreeSitterCParser;

impl TreeSitterCParser {
    pub fn parse_unit(&self, source: &str) -> Result<TranslationUnit, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c::LANGUAGE.into())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let detail = if bad.is_missing() {
                format!("missing `{}`", bad.kind())
            } else {
                let text = bad.utf8_text(source.as_bytes()).unwrap_or("");
                let first_line = text.lines().next().unwrap_or("");
                format!("unexpected `{}`", first_line.chars().take(40).collect::<String>())
            };
            return Err(ParseError::Syntax {
                line: bad.start_position().row + 1,
                column: bad.start_position().column + 1,
                detail,
            });
        }

        let unit = TranslationUnit {
            items: Lowering { src: source }.items(root, &[]),
        };
        debug!(items = unit.items.len(), "lowered translation unit");
        Ok(unit)
    }
}

impl SyntaxTreeParser for TreeSitterCParser {
    fn parse(&self, source: &str) -> anyhow::Result<TranslationUnit> {
        Ok(self.parse_unit(source)?)
    }
}

fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

struct Lowering<'s> {
    src: &'s str,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: TsNode) -> &'s str {
        self.src.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Lower the named children of `parent` as a statement list, leaving out
    /// the nodes in `skip` (conditions, case values, labels).
    fn items(&self, parent: TsNode, skip: &[Option<TsNode>]) -> Vec<Node> {
        let skipped: Vec<usize> = skip.iter().flatten().map(|n| n.id()).collect();
        let mut out = Vec::new();
        let mut cursor = parent.walk();
        for child in parent.named_children(&mut cursor) {
            if skipped.contains(&child.id()) {
                continue;
            }
            self.push_item(child, &mut out);
        }
        out
    }

    fn push_item(&self, node: TsNode, out: &mut Vec<Node>) {
        match node.kind() {
            "comment" => {}
            "declaration" => out.extend(self.declaration(node)),
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                out.push(self.tag_declaration(node))
            }
            // Conditional blocks are flattened in place; every branch is kept.
            "preproc_if" | "preproc_ifdef" | "preproc_elif" | "preproc_elifdef" | "preproc_else" => {
                let skip = [
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("name"),
                ];
                out.extend(self.items(node, &skip));
            }
            _ => out.push(self.statement(node)),
        }
    }

    fn statement(&self, node: TsNode) -> Node {
        match node.kind() {
            "function_definition" => Node::FunctionDefinition {
                name: node
                    .child_by_field_name("declarator")
                    .and_then(|d| self.declarator_name(d)),
                line: node.start_position().row + 1,
                body: node
                    .child_by_field_name("body")
                    .map(|body| self.items(body, &[]))
                    .unwrap_or_default(),
            },
            "compound_statement" => Node::Compound(self.items(node, &[])),
            "if_statement" => Node::If {
                then_branch: self.field_statement(node, "consequence"),
                else_branch: node
                    .child_by_field_name("alternative")
                    .map(|alt| Box::new(self.else_clause(alt))),
            },
            "for_statement" => Node::For {
                init: node
                    .child_by_field_name("initializer")
                    .filter(|init| init.kind() == "declaration")
                    .map(|init| self.declaration(init))
                    .unwrap_or_default(),
                body: self.field_statement(node, "body"),
            },
            "while_statement" => Node::While {
                body: self.field_statement(node, "body"),
            },
            "do_statement" => Node::DoWhile {
                body: self.field_statement(node, "body"),
            },
            "switch_statement" => Node::Switch {
                body: self.field_statement(node, "body"),
            },
            "case_statement" => {
                let value = node.child_by_field_name("value");
                let stmts = self.items(node, &[value]);
                match value {
                    Some(_) => Node::Case { stmts },
                    None => Node::Default { stmts },
                }
            }
            "labeled_statement" => {
                let label = node.child_by_field_name("label");
                Node::Labeled {
                    body: Box::new(Node::Compound(self.items(node, &[label]))),
                }
            }
            "attributed_statement" => match node.named_child(node.named_child_count().saturating_sub(1)) {
                Some(inner) if inner.kind() != "attribute_declaration" => self.statement(inner),
                _ => Node::Other,
            },
            "declaration" => Node::Compound(self.declaration(node)),
            _ => Node::Other,
        }
    }

    fn field_statement(&self, node: TsNode, field: &str) -> Box<Node> {
        Box::new(
            node.child_by_field_name(field)
                .map(|child| self.statement(child))
                .unwrap_or(Node::Other),
        )
    }

    fn else_clause(&self, alt: TsNode) -> Node {
        if alt.kind() != "else_clause" {
            return self.statement(alt);
        }
        alt.named_child(0)
            .map(|stmt| self.statement(stmt))
            .unwrap_or(Node::Other)
    }

    fn declaration(&self, node: TsNode) -> Vec<Node> {
        let mut cursor = node.walk();
        let declarators: Vec<TsNode> = node.children_by_field_name("declarator", &mut cursor).collect();
        let Some(first_start) = declarators.first().map(|d| d.start_byte()) else {
            return Vec::new();
        };

        let mut specifiers = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.start_byte() >= first_start {
                break;
            }
            self.collect_tokens(child, node.kind(), &mut specifiers);
        }

        declarators
            .iter()
            .filter_map(|d| self.declarator(&specifiers, *d))
            .collect()
    }

    fn declarator(&self, specifiers: &[Token<'s>], node: TsNode) -> Option<Node> {
        let (target, initializer) = if node.kind() == "init_declarator" {
            (
                node.child_by_field_name("declarator")?,
                node.child_by_field_name("value").map(|v| self.text(v).to_string()),
            )
        } else {
            (node, None)
        };

        let mut tokens = Vec::new();
        self.collect_tokens(target, node.kind(), &mut tokens);

        Some(Node::Declaration(Declaration {
            name: self.declarator_name(target),
            line: target.start_position().row + 1,
            text: render(&[specifiers, &tokens[..]]),
            initializer,
        }))
    }

    /// `struct s { ... };`, `union u;` or `enum e { A, B };` on its own.
    fn tag_declaration(&self, node: TsNode) -> Node {
        let mut tokens = Vec::new();
        self.collect_tokens(node, "", &mut tokens);
        Node::Declaration(Declaration::new(
            None,
            node.start_position().row + 1,
            render(&[&tokens[..]]),
        ))
    }

    fn collect_tokens(&self, node: TsNode, parent: &'static str, out: &mut Vec<Token<'s>>) {
        if node.kind() == "comment" {
            return;
        }
        if node.child_count() == 0 {
            let text = self.text(node);
            if !text.is_empty() {
                out.push(Token {
                    text,
                    kind: node.kind(),
                    start: node.start_byte(),
                    end: node.end_byte(),
                    binds_right: text == "*" && parent.contains("pointer"),
                });
            }
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_tokens(child, node.kind(), out);
        }
    }

    fn declarator_name(&self, node: TsNode) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.text(node).to_string()),
            "parenthesized_declarator" | "attributed_declarator" => {
                node.named_child(0).and_then(|inner| self.declarator_name(inner))
            }
            _ => node
                .child_by_field_name("declarator")
                .and_then(|inner| self.declarator_name(inner)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token<'s> {
    text: &'s str,
    kind: &'static str,
    start: usize,
    end: usize,
    /// `*` of a pointer declarator, written against what follows.
    binds_right: bool,
}

/// Join tokens the way a declaration is conventionally written: a single
/// space where the source had any gap, none inside brackets or before
/// punctuation, `*p` for pointers and `f(void)` for calls and prototypes.
/// Segments are always separated from each other.
fn render(segments: &[&[Token]]) -> String {
    let mut out = String::new();
    let mut prev: Option<Token> = None;
    for segment in segments {
        for (i, tok) in segment.iter().enumerate() {
            if let Some(p) = prev {
                let gap = i == 0 || tok.start > p.end;
                if gap && spaced(&p, tok) {
                    out.push(' ');
                }
            }
            out.push_str(tok.text);
            prev = Some(*tok);
        }
    }
    out
}

fn spaced(prev: &Token, next: &Token) -> bool {
    if prev.binds_right || matches!(prev.text, "(" | "[") {
        return false;
    }
    if matches!(next.text, ")" | "]" | "," | ";" | "[") {
        return false;
    }
    !(next.text == "(" && matches!(prev.kind, "identifier" | "field_identifier" | ")"))
}
