use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Typed label for one node of the abstract syntax representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    TypeDecl,
    FunctionDecl,
    Branch,
    Loop,
    ErrorHandler,
    Return,
    Import,
    Assignment,
    Call,
    StringLiteral,
    NumberLiteral,
    Statement,
}

impl NodeKind {
    fn base_label(self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::TypeDecl => "type_decl",
            NodeKind::FunctionDecl => "function_decl",
            NodeKind::Branch => "branch",
            NodeKind::Loop => "loop",
            NodeKind::ErrorHandler => "error_handler",
            NodeKind::Return => "return",
            NodeKind::Import => "import",
            NodeKind::Assignment => "assignment",
            NodeKind::Call => "call",
            NodeKind::StringLiteral => "string_literal",
            NodeKind::NumberLiteral => "number_literal",
            NodeKind::Statement => "statement",
        }
    }
}

/// One node of the parsed tree. Declarations carry their declared name;
/// control nodes carry the keyword that introduced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, name: Option<String>, line: usize) -> Self {
        SyntaxNode {
            kind,
            name,
            line,
            children: Vec::new(),
        }
    }

    /// Label used for set-based similarity. Control nodes include their
    /// introducing keyword (`branch:if`, `loop:while`) so that files using
    /// different control constructs do not collapse to the same label.
    pub fn label(&self) -> String {
        match self.kind {
            NodeKind::Branch | NodeKind::Loop | NodeKind::ErrorHandler | NodeKind::Import => {
                match &self.name {
                    Some(kw) => format!("{}:{}", self.kind.base_label(), kw),
                    None => self.kind.base_label().to_string(),
                }
            }
            _ => self.kind.base_label().to_string(),
        }
    }

    /// Visit every node in the tree, depth first.
    pub fn walk(&self, visit: &mut impl FnMut(&SyntaxNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Total node count, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Flatten the tree into the set of node-type labels encountered during
    /// a full traversal. Duplicate kinds collapse; this is a set, not a
    /// multiset.
    pub fn kind_set(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.walk(&mut |node| {
            set.insert(node.label());
        });
        set
    }
}
