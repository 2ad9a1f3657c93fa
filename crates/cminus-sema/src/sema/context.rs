//! Analysis state shared by the two passes

use crate::common::{Diagnostic, Diagnostics};

use super::SymbolTable;

/// Configuration options for the analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Print progress lines to stderr
    pub verbose: bool,
    /// Print the symbol table listing once the builder pass is done
    pub trace: bool,
    /// Give a failed binary operator the poison type instead of leaving it
    /// untyped
    pub poison_failed_operators: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            trace: false,
            poison_failed_operators: true,
        }
    }
}

/// How far the analysis of the current unit has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unbuilt,
    SymbolsBuilt,
    TypesChecked,
}

/// Everything one compilation unit's analysis reads and writes
#[derive(Debug)]
pub struct AnalysisContext {
    pub config: AnalyzerConfig,
    pub symtab: SymbolTable,
    pub diagnostics: Diagnostics,
    pub(super) phase: Phase,
}

impl AnalysisContext {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            symtab: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            phase: Phase::Unbuilt,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.report(diagnostic);
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
