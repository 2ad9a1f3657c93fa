//! Semantic diagnostics and the sink that accumulates them

use std::fmt;
use std::io;

use thiserror::Error;

/// Where a `void` declaration was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidSite {
    Variable,
    Parameter,
    ArrayParameter,
}

impl fmt::Display for VoidSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoidSite::Variable => f.write_str("Variable Type cannot be void"),
            VoidSite::Parameter => f.write_str("Parameter Type cannot be void"),
            VoidSite::ArrayParameter => f.write_str("Parameter Type cannot be void[]"),
        }
    }
}

/// A non-fatal semantic violation.
///
/// The `Display` output is the exact line written to the listing, without the
/// trailing newline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Error: redefined symbol '{name}' at line {line}")]
    Redefinition { name: String, line: u32 },

    #[error("Error: {site} at line {line} (name : {name})")]
    VoidDeclaration { name: String, site: VoidSite, line: u32 },

    #[error("Error: Undeclared Variable '{name}' at line {line}")]
    UndeclaredVariable { name: String, line: u32 },

    #[error("Error: Undeclared Function '{name}' at line {line}")]
    UndeclaredFunction { name: String, line: u32 },

    #[error(
        "Error: Invalid array indexing at line {line} (name: '{name}'). Indices should be integer"
    )]
    InvalidIndex { name: String, line: u32 },

    #[error("Error: Type error at line {line}: invalid expression")]
    InvalidExpression { line: u32 },

    #[error("Error: Assignment type error at line {line} (name: '{name}')")]
    AssignmentType { name: String, line: u32 },

    #[error("Error: invalid function call at line {line} (name: '{name}')")]
    InvalidFunctionCall { name: String, line: u32 },

    #[error("Error: Parameter error at line {line}: invalid function call (name: '{name}')")]
    Parameter { name: String, line: u32 },

    #[error("Error: Invalid condition at line {line}")]
    InvalidCondition { line: u32 },

    #[error("Error: Type error at line {line}: invalid return type")]
    InvalidReturnType { line: u32 },
}

impl Diagnostic {
    /// Source line the diagnostic points at
    pub fn line(&self) -> u32 {
        match self {
            Diagnostic::Redefinition { line, .. }
            | Diagnostic::VoidDeclaration { line, .. }
            | Diagnostic::UndeclaredVariable { line, .. }
            | Diagnostic::UndeclaredFunction { line, .. }
            | Diagnostic::InvalidIndex { line, .. }
            | Diagnostic::InvalidExpression { line }
            | Diagnostic::AssignmentType { line, .. }
            | Diagnostic::InvalidFunctionCall { line, .. }
            | Diagnostic::Parameter { line, .. }
            | Diagnostic::InvalidCondition { line }
            | Diagnostic::InvalidReturnType { line } => *line,
        }
    }
}

/// Accumulates diagnostics for one compilation unit.
///
/// The error flag is sticky: once raised it stays raised until the sink is
/// dropped.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    had_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.had_error = true;
        self.items.push(diagnostic);
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Write every diagnostic, one per line, in emission order
    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        for diagnostic in &self.items {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(())
    }
}
