//! Abstract Syntax Tree definitions
//!
//! The tree is the contract with the parser: every node has a fixed number of
//! optional child slots and an optional next sibling, so statement, parameter
//! and argument sequences are right-leaning chains.
//!
//! Child slot conventions:
//!
//! | Node        | slot 0             | slot 1             | slot 2 |
//! |-------------|--------------------|--------------------|--------|
//! | `Compound`  | local declarations | statements         |        |
//! | `FuncDecl`  | parameters         | body (`Compound`)  |        |
//! | `If`        | condition          | then               |        |
//! | `IfElse`    | condition          | then               | else   |
//! | `While`     | condition          | body               |        |
//! | `Return`    | value              |                    |        |
//! | `Op`        | left operand       | right operand      |        |
//! | `Var`       | index (optional)   |                    |        |
//! | `Assign`    | target (`Var`)     | value              |        |
//! | `Call`      | arguments          |                    |        |

mod interchange;
mod types;

pub use interchange::{load_program, parse_program};
pub use types::{Type, TypeSpec};

use crate::sema::ScopeId;

/// Number of child slots on every node
pub const MAX_CHILDREN: usize = 3;

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Compound statement: `{ locals statements }`
    Compound,

    /// Scalar variable declaration: `int x;`
    VarDecl { name: String, spec: TypeSpec },

    /// Array variable declaration: `int a[size];`
    ArrayDecl { name: String, spec: TypeSpec, size: u32 },

    /// Function declaration: `int f(params) { body }`
    FuncDecl { name: String, returns: TypeSpec },

    /// Scalar parameter: `int x`
    Param { name: String, spec: TypeSpec },

    /// Array parameter: `int a[]`
    ArrayParam { name: String, spec: TypeSpec },

    If,
    IfElse,
    While,

    /// `return expr;`
    Return,

    /// `return;`
    VoidReturn,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Binary operation: `a + b`
    Op(BinOp),

    /// Integer literal
    Const(i64),

    /// Variable reference, indexed when slot 0 is present
    Var { name: String },

    /// Assignment: `target = value`
    Assign,

    /// Function call: `f(args)`
    Call { name: String },
}

/// Node kinds, split into the two top-level categories
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Stmt(StmtKind),
    Expr(ExprKind),
}

/// Syntax tree node
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub children: [Option<Box<Node>>; MAX_CHILDREN],
    pub sibling: Option<Box<Node>>,
    pub lineno: u32,
    /// Type of this node (filled in by the type checker)
    pub ty: Option<Type>,
    /// Innermost scope containing this node (filled in by the builder)
    pub scope: Option<ScopeId>,
}

// Unlink the sibling chain one node at a time; the derived drop would
// recurse once per sibling.
impl Drop for Node {
    fn drop(&mut self) {
        let mut next = self.sibling.take();
        while let Some(mut node) = next {
            next = node.sibling.take();
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind, lineno: u32) -> Self {
        Self {
            kind,
            children: [None, None, None],
            sibling: None,
            lineno,
            ty: None,
            scope: None,
        }
    }

    pub fn stmt(kind: StmtKind, lineno: u32) -> Self {
        Self::new(NodeKind::Stmt(kind), lineno)
    }

    pub fn expr(kind: ExprKind, lineno: u32) -> Self {
        Self::new(NodeKind::Expr(kind), lineno)
    }

    /// Put a single node into a child slot
    pub fn with_child(mut self, slot: usize, child: Node) -> Self {
        self.children[slot] = Some(Box::new(child));
        self
    }

    /// Put a sibling chain into a child slot; an empty list leaves it absent
    pub fn with_chain(mut self, slot: usize, nodes: Vec<Node>) -> Self {
        self.children[slot] = Node::chain(nodes);
        self
    }

    /// Link nodes through their sibling pointers, in order
    pub fn chain(nodes: Vec<Node>) -> Option<Box<Node>> {
        nodes.into_iter().rev().fold(None, |next, mut node| {
            node.sibling = next;
            Some(Box::new(node))
        })
    }

    pub fn child(&self, slot: usize) -> Option<&Node> {
        self.children.get(slot).and_then(|c| c.as_deref())
    }

    /// Type of the node in `slot`, if the slot is filled and typed
    pub fn child_type(&self, slot: usize) -> Option<Type> {
        self.child(slot).and_then(|c| c.ty)
    }

    /// This node followed by every node on its sibling chain
    pub fn iter_chain(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(self), |n| n.sibling.as_deref())
    }

    /// Identifier carried by the node, if its kind has one
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Stmt(
                StmtKind::VarDecl { name, .. }
                | StmtKind::ArrayDecl { name, .. }
                | StmtKind::FuncDecl { name, .. }
                | StmtKind::Param { name, .. }
                | StmtKind::ArrayParam { name, .. },
            )
            | NodeKind::Expr(ExprKind::Var { name } | ExprKind::Call { name }) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    // Constructors mirroring the parser's output shapes

    pub fn compound(locals: Vec<Node>, statements: Vec<Node>, lineno: u32) -> Self {
        Self::stmt(StmtKind::Compound, lineno)
            .with_chain(0, locals)
            .with_chain(1, statements)
    }

    pub fn var_decl(name: &str, spec: TypeSpec, lineno: u32) -> Self {
        Self::stmt(StmtKind::VarDecl { name: name.to_string(), spec }, lineno)
    }

    pub fn array_decl(name: &str, spec: TypeSpec, size: u32, lineno: u32) -> Self {
        Self::stmt(
            StmtKind::ArrayDecl { name: name.to_string(), spec, size },
            lineno,
        )
    }

    pub fn func_decl(
        name: &str,
        returns: TypeSpec,
        params: Vec<Node>,
        body: Node,
        lineno: u32,
    ) -> Self {
        Self::stmt(StmtKind::FuncDecl { name: name.to_string(), returns }, lineno)
            .with_chain(0, params)
            .with_child(1, body)
    }

    pub fn param(name: &str, spec: TypeSpec, lineno: u32) -> Self {
        Self::stmt(StmtKind::Param { name: name.to_string(), spec }, lineno)
    }

    pub fn array_param(name: &str, spec: TypeSpec, lineno: u32) -> Self {
        Self::stmt(StmtKind::ArrayParam { name: name.to_string(), spec }, lineno)
    }

    pub fn if_stmt(condition: Node, then: Node, lineno: u32) -> Self {
        Self::stmt(StmtKind::If, lineno)
            .with_child(0, condition)
            .with_child(1, then)
    }

    pub fn if_else(condition: Node, then: Node, otherwise: Node, lineno: u32) -> Self {
        Self::stmt(StmtKind::IfElse, lineno)
            .with_child(0, condition)
            .with_child(1, then)
            .with_child(2, otherwise)
    }

    pub fn while_stmt(condition: Node, body: Node, lineno: u32) -> Self {
        Self::stmt(StmtKind::While, lineno)
            .with_child(0, condition)
            .with_child(1, body)
    }

    pub fn return_value(value: Node, lineno: u32) -> Self {
        Self::stmt(StmtKind::Return, lineno).with_child(0, value)
    }

    pub fn void_return(lineno: u32) -> Self {
        Self::stmt(StmtKind::VoidReturn, lineno)
    }

    pub fn op(op: BinOp, left: Node, right: Node, lineno: u32) -> Self {
        Self::expr(ExprKind::Op(op), lineno)
            .with_child(0, left)
            .with_child(1, right)
    }

    pub fn constant(value: i64, lineno: u32) -> Self {
        Self::expr(ExprKind::Const(value), lineno)
    }

    pub fn var(name: &str, lineno: u32) -> Self {
        Self::expr(ExprKind::Var { name: name.to_string() }, lineno)
    }

    pub fn index(name: &str, index: Node, lineno: u32) -> Self {
        Self::var(name, lineno).with_child(0, index)
    }

    pub fn assign(target: Node, value: Node, lineno: u32) -> Self {
        Self::expr(ExprKind::Assign, lineno)
            .with_child(0, target)
            .with_child(1, value)
    }

    pub fn call(name: &str, args: Vec<Node>, lineno: u32) -> Self {
        Self::expr(ExprKind::Call { name: name.to_string() }, lineno).with_chain(0, args)
    }
}
