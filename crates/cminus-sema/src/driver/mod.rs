//! Analysis driver
//!
//! Runs the builder pass and then the type checker over one compilation unit
//! and hands back everything code generation needs.

use std::io;

use crate::ast::Node;
use crate::common::{Diagnostic, Diagnostics, SemaResult};
use crate::sema::{self, AnalysisContext, AnalyzerConfig, SymbolTable};

/// Result of analyzing one compilation unit. The tree itself is annotated in
/// place.
#[derive(Debug)]
pub struct Analysis {
    pub config: AnalyzerConfig,
    pub symtab: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Write the diagnostics, followed by the symbol table listing when
    /// tracing is enabled.
    pub fn write_report(&self, out: &mut impl io::Write) -> io::Result<()> {
        self.diagnostics.write_to(out)?;
        if self.config.trace {
            write!(out, "\nSymbol table:\n\n")?;
            sema::write_listing(&self.symtab, out)?;
        }
        Ok(())
    }
}

/// Analyze the tree rooted at `root`: build the symbol table, then type
/// check. Semantic violations never fail the call; they are collected in the
/// returned [`Analysis`].
pub fn analyze(mut root: Option<&mut Node>, config: AnalyzerConfig) -> SemaResult<Analysis> {
    let verbose = config.verbose;
    let mut ctx = AnalysisContext::new(config);

    if verbose {
        eprintln!("Building symbol table...");
    }
    sema::build_symtab(&mut ctx, root.as_deref_mut())?;

    if verbose {
        eprintln!("Type checking...");
    }
    sema::type_check(&mut ctx, root)?;

    if verbose {
        eprintln!("Analysis finished with {} diagnostic(s)", ctx.diagnostics.len());
    }

    Ok(Analysis {
        config: ctx.config,
        symtab: ctx.symtab,
        diagnostics: ctx.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Type, TypeSpec, load_program, parse_program};
    use pretty_assertions::assert_eq;

    fn report(analysis: &Analysis) -> String {
        let mut out = Vec::new();
        analysis.write_report(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_clean_program() {
        // int x; x = 1;
        let mut root = Node::chain(vec![
            Node::var_decl("x", TypeSpec::Int, 1),
            Node::assign(Node::var("x", 2), Node::constant(1, 2), 2),
        ])
        .unwrap();
        let analysis = analyze(Some(&mut root), AnalyzerConfig::default()).unwrap();

        assert!(!analysis.had_error());
        assert_eq!(report(&analysis), "");
        assert_eq!(root.sibling.as_ref().unwrap().ty, Some(Type::Int));
        assert!(root.iter_chain().all(|n| n.scope.is_some()));
    }

    #[test]
    fn test_scenario_d_duplicate_globals() {
        let mut root = Node::chain(vec![
            Node::var_decl("x", TypeSpec::Int, 1),
            Node::var_decl("x", TypeSpec::Int, 2),
        ])
        .unwrap();
        let analysis = analyze(Some(&mut root), AnalyzerConfig::default()).unwrap();

        assert!(analysis.had_error());
        assert_eq!(report(&analysis), "Error: redefined symbol 'x' at line 2\n");

        let global = analysis.symtab.find_scope("global").unwrap();
        let xs: Vec<_> = analysis
            .symtab
            .symbols_in(global)
            .filter(|s| s.name == "x")
            .collect();
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].first_line(), 1);
    }

    #[test]
    fn test_trace_appends_listing() {
        let config = AnalyzerConfig {
            trace: true,
            ..AnalyzerConfig::default()
        };
        let analysis = analyze(None, config).unwrap();
        let text = report(&analysis);

        assert!(text.starts_with("\nSymbol table:\n\nVariable Name  Variable Type"));
        assert!(text.contains("\ninput "));
    }

    #[test]
    fn test_analyze_interchange_program() {
        let source = r#"
[[program]]
line = 1
kind = { fun-decl = { name = "main", type = "void" } }
children = [[], [{ line = 1, kind = "compound", children = [[{ line = 2, kind = { var-decl = { name = "x", type = "int" } } }], [{ line = 3, kind = "void-return" }, { line = 4, kind = "return", children = [[{ line = 4, kind = { var = { name = "x" } } }]] }]] }]]
"#;
        let mut root = parse_program(source).unwrap();
        let analysis = analyze(root.as_deref_mut(), AnalyzerConfig::default()).unwrap();

        assert_eq!(
            report(&analysis),
            "Error: Type error at line 4: invalid return type\n"
        );
    }

    #[test]
    fn test_gcd_demo() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/gcd.toml");
        let mut root = load_program(path).unwrap();
        let config = AnalyzerConfig {
            trace: true,
            ..AnalyzerConfig::default()
        };
        let analysis = analyze(root.as_deref_mut(), config).unwrap();

        let messages: Vec<String> = analysis.diagnostics().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Error: Variable Type cannot be void at line 9 (name : z)",
                "Error: Undeclared Variable 'w' at line 12",
            ]
        );
        assert!(analysis.had_error());

        let text = report(&analysis);
        assert!(text.contains("\nz              Error          main        2            9 \n"));
    }
}
