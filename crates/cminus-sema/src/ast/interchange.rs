//! AST interchange format
//!
//! The parser runs as a separate tool and hands its tree over as a TOML
//! document. `program` is the top-level declaration list; every node lists
//! its child slots as arrays of nodes, each array being a sibling chain.
//!
//! ```toml
//! [[program]]
//! line = 1
//! kind = { var-decl = { name = "x", type = "int" } }
//!
//! [[program]]
//! line = 2
//! kind = "assign"
//! children = [[{ line = 2, kind = { var = { name = "x" } } }], [{ line = 2, kind = { const = { value = 1 } } }]]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{BinOp, ExprKind, MAX_CHILDREN, Node, NodeKind, StmtKind, TypeSpec};
use crate::common::{SemaError, SemaResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProgram {
    #[serde(default)]
    program: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNode {
    line: u32,
    kind: RawKind,
    #[serde(default)]
    children: Vec<Vec<RawNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawKind {
    Compound,
    VarDecl {
        name: String,
        #[serde(rename = "type")]
        spec: TypeSpec,
    },
    ArrayDecl {
        name: String,
        #[serde(rename = "type")]
        spec: TypeSpec,
        size: u32,
    },
    FunDecl {
        name: String,
        #[serde(rename = "type")]
        returns: TypeSpec,
    },
    Param {
        name: String,
        #[serde(rename = "type")]
        spec: TypeSpec,
    },
    ArrayParam {
        name: String,
        #[serde(rename = "type")]
        spec: TypeSpec,
    },
    If,
    IfElse,
    While,
    Return,
    VoidReturn,
    Op {
        op: RawOp,
    },
    Const {
        value: i64,
    },
    Var {
        name: String,
    },
    Assign,
    Call {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum RawOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl From<RawOp> for BinOp {
    fn from(op: RawOp) -> Self {
        match op {
            RawOp::Add => BinOp::Add,
            RawOp::Sub => BinOp::Sub,
            RawOp::Mul => BinOp::Mul,
            RawOp::Div => BinOp::Div,
            RawOp::Lt => BinOp::Lt,
            RawOp::Le => BinOp::Le,
            RawOp::Gt => BinOp::Gt,
            RawOp::Ge => BinOp::Ge,
            RawOp::Eq => BinOp::Eq,
            RawOp::Ne => BinOp::Ne,
        }
    }
}

impl From<RawKind> for NodeKind {
    fn from(kind: RawKind) -> Self {
        match kind {
            RawKind::Compound => NodeKind::Stmt(StmtKind::Compound),
            RawKind::VarDecl { name, spec } => NodeKind::Stmt(StmtKind::VarDecl { name, spec }),
            RawKind::ArrayDecl { name, spec, size } => {
                NodeKind::Stmt(StmtKind::ArrayDecl { name, spec, size })
            }
            RawKind::FunDecl { name, returns } => {
                NodeKind::Stmt(StmtKind::FuncDecl { name, returns })
            }
            RawKind::Param { name, spec } => NodeKind::Stmt(StmtKind::Param { name, spec }),
            RawKind::ArrayParam { name, spec } => {
                NodeKind::Stmt(StmtKind::ArrayParam { name, spec })
            }
            RawKind::If => NodeKind::Stmt(StmtKind::If),
            RawKind::IfElse => NodeKind::Stmt(StmtKind::IfElse),
            RawKind::While => NodeKind::Stmt(StmtKind::While),
            RawKind::Return => NodeKind::Stmt(StmtKind::Return),
            RawKind::VoidReturn => NodeKind::Stmt(StmtKind::VoidReturn),
            RawKind::Op { op } => NodeKind::Expr(ExprKind::Op(op.into())),
            RawKind::Const { value } => NodeKind::Expr(ExprKind::Const(value)),
            RawKind::Var { name } => NodeKind::Expr(ExprKind::Var { name }),
            RawKind::Assign => NodeKind::Expr(ExprKind::Assign),
            RawKind::Call { name } => NodeKind::Expr(ExprKind::Call { name }),
        }
    }
}

fn lower_chain(raw: Vec<RawNode>) -> SemaResult<Option<Box<Node>>> {
    let nodes = raw.into_iter().map(lower_node).collect::<SemaResult<Vec<_>>>()?;
    Ok(Node::chain(nodes))
}

fn lower_node(raw: RawNode) -> SemaResult<Node> {
    if raw.children.len() > MAX_CHILDREN {
        return Err(SemaError::malformed_ast(
            format!(
                "node has {} child slots, at most {} are allowed",
                raw.children.len(),
                MAX_CHILDREN
            ),
            raw.line,
        ));
    }

    let mut node = Node::new(raw.kind.into(), raw.line);
    for (slot, chain) in raw.children.into_iter().enumerate() {
        node.children[slot] = lower_chain(chain)?;
    }
    Ok(node)
}

/// Decode a program from its TOML interchange text
pub fn parse_program(source: &str) -> SemaResult<Option<Box<Node>>> {
    let raw: RawProgram = toml::from_str(source)?;
    lower_chain(raw.program)
}

/// Read and decode a program from a TOML interchange file
pub fn load_program(path: impl AsRef<Path>) -> SemaResult<Option<Box<Node>>> {
    let source = fs::read_to_string(path)?;
    parse_program(&source)
}
