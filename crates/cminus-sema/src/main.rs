//! cmsema - C-Minus semantic analyzer
//!
//! Usage: cmsema [OPTIONS] <input.toml>

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser as ClapParser;
use cminus_sema::ast;
use cminus_sema::{AnalyzerConfig, analyze};

#[derive(ClapParser, Debug)]
#[command(name = "cmsema")]
#[command(author = "C-Minus Toolchain Team")]
#[command(version)]
#[command(
    about = "Symbol table construction and type checking for C-Minus syntax trees",
    long_about = None
)]
struct Args {
    /// Syntax tree produced by the parser (TOML interchange file)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the symbol table after analysis
    #[arg(short, long)]
    trace: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Leave a failed binary operator untyped instead of poisoning it
    #[arg(long)]
    keep_unset_operator_types: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => process::exit(1),
        Ok(false) => {}
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}

/// Returns whether any semantic error was reported
fn run(args: &Args) -> anyhow::Result<bool> {
    if args.verbose {
        eprintln!("Loading {}", args.input.display());
    }
    let mut root = ast::load_program(&args.input)
        .with_context(|| format!("cannot load syntax tree from {}", args.input.display()))?;

    let config = AnalyzerConfig {
        verbose: args.verbose,
        trace: args.trace,
        poison_failed_operators: !args.keep_unset_operator_types,
    };
    let analysis = analyze(root.as_deref_mut(), config)?;

    if args.dump_ast {
        eprintln!("=== AST ===");
        eprintln!("{root:#?}");
        eprintln!("=== End AST ===\n");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    analysis.write_report(&mut out)?;
    out.flush()?;

    Ok(analysis.had_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cmsema").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn test_run_reports_semantic_errors() {
        let demo = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/gcd.toml");
        assert!(run(&args(&[demo])).unwrap());
    }

    #[test]
    fn test_run_missing_input_is_an_error() {
        let err = run(&args(&["no/such/tree.toml"])).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("cannot load syntax tree from no/such/tree.toml: IO error:"));
    }

    #[test]
    fn test_operator_flag_disables_poisoning() {
        let args = args(&["--keep-unset-operator-types", "-t", "in.toml"]);
        assert!(args.keep_unset_operator_types);
        assert!(args.trace);
        assert!(!args.verbose);
    }
}
