//! C-Minus semantic analyzer
//!
//! This library implements the semantic-analysis phase of a C-Minus compiler.
//! It takes the syntax tree produced by the parser, builds a scoped symbol
//! table and annotates every node with its type.
//!
//! ## Architecture
//!
//! The crate is organized into:
//! - **AST** (`ast/`): The node model handed over by the parser, and a loader
//!   for the TOML interchange format
//! - **Sema** (`sema/`): Tree traversal, symbol table, builder and checker passes
//! - **Driver** (`driver/`): Runs both passes and collects the analysis output
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics)

pub mod common;
pub mod ast;
pub mod sema;
pub mod driver;

// Re-exports for convenience
pub use common::{Diagnostic, Diagnostics, SemaError, SemaResult};
pub use ast::{Node, NodeKind, Type};
pub use sema::{AnalysisContext, AnalyzerConfig, SymbolTable};
pub use driver::{Analysis, analyze};
