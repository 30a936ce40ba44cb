// Syntax tree data structures for uninitc.
// These types represent a parsed C translation unit in a form suitable for
// the uninitialized-declaration check. The tree is built once by a parser
// adapter and only read afterwards.

/// The top-level parsed representation of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    pub items: Vec<Node>,
}

/// A statement-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Declaration(Declaration),
    FunctionDefinition {
        name: Option<String>,
        line: usize,
        body: Vec<Node>,
    },
    If {
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    For {
        /// Declarations of the for-initializer section, empty for `for (i = 0; ...)`.
        init: Vec<Node>,
        body: Box<Node>,
    },
    While {
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
    },
    Switch {
        body: Box<Node>,
    },
    /// `case X:` and the statements up to the next label.
    Case {
        stmts: Vec<Node>,
    },
    /// `default:` and the statements up to the next label.
    Default {
        stmts: Vec<Node>,
    },
    Compound(Vec<Node>),
    /// `name: stmt`.
    Labeled {
        body: Box<Node>,
    },
    /// Expression statements, jumps, and anything else without nested declarations.
    Other,
}

/// A single declared entity. `int a, b;` is two of these; a bare
/// `struct s { ... };` is one with no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Option<String>,
    /// 1-based source line of the declarator.
    pub line: usize,
    /// Rendered declaration, e.g. `static const char *p`.
    pub text: String,
    pub initializer: Option<String>,
}

impl Declaration {
    pub fn new(name: Option<String>, line: usize, text: impl Into<String>) -> Self {
        Self {
            name,
            line,
            text: text.into(),
            initializer: None,
        }
    }

    pub fn with_initializer(mut self, init: impl Into<String>) -> Self {
        self.initializer = Some(init.into());
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initializer.is_some()
    }
}

impl Node {
    pub fn compound(stmts: Vec<Node>) -> Self {
        Node::Compound(stmts)
    }

    pub fn decl(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}
