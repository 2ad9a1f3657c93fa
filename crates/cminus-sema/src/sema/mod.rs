//! Semantic analysis module
//!
//! Two passes over the syntax tree share one [`AnalysisContext`]:
//! the builder creates scopes and symbols and records each node's scope,
//! then the checker computes and validates node types in postorder.

mod builder;
mod checker;
mod context;
mod listing;
mod symtab;
mod traverse;

pub use builder::build_symtab;
pub use checker::type_check;
pub use context::{AnalysisContext, AnalyzerConfig, Phase};
pub use listing::{render_listing, write_listing};
pub use symtab::{BUCKET_COUNT, Enclosing, Scope, ScopeId, Symbol, SymbolId, SymbolTable, hash};
pub use traverse::{Visitor, traverse};
