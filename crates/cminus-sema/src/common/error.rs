//! Error types for operations around the analysis

use thiserror::Error;

/// Failure outside the semantic rules themselves: reading input, decoding the
/// AST interchange file, or driving the passes out of order.
///
/// Semantic violations are never reported through this type; they are
/// [`Diagnostic`](super::Diagnostic)s collected while the analysis runs on.
#[derive(Error, Debug)]
pub enum SemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("AST format error: {0}")]
    AstFormat(#[from] toml::de::Error),

    #[error("Malformed AST at line {line}: {message}")]
    MalformedAst { message: String, line: u32 },

    #[error("Pass order error: {message}")]
    PassOrder { message: String },
}

impl SemaError {
    pub fn malformed_ast(message: impl Into<String>, line: u32) -> Self {
        Self::MalformedAst {
            message: message.into(),
            line,
        }
    }

    pub fn pass_order(message: impl Into<String>) -> Self {
        Self::PassOrder {
            message: message.into(),
        }
    }
}

pub type SemaResult<T> = Result<T, SemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_ast_message() {
        let err = SemaError::malformed_ast("too many child slots", 7);
        assert_eq!(
            err.to_string(),
            "Malformed AST at line 7: too many child slots"
        );
    }

    #[test]
    fn test_pass_order_message() {
        let err = SemaError::pass_order("symbol table not built");
        assert_eq!(err.to_string(), "Pass order error: symbol table not built");
    }
}
