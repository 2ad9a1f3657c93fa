//! Semantic types

use std::fmt;

use serde::Deserialize;

/// Type written in a declaration (`int` or `void`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSpec {
    Int,
    Void,
}

/// Type computed for a node or recorded for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Int,
    IntArray,
    VoidFunction,
    IntFunction,
    /// Poison: the root cause was already diagnosed
    SemanticError,
}

impl Type {
    pub fn is_function(self) -> bool {
        matches!(self, Type::VoidFunction | Type::IntFunction)
    }

    pub fn is_poison(self) -> bool {
        self == Type::SemanticError
    }

    /// Function type for a declared return type
    pub fn function_returning(spec: TypeSpec) -> Self {
        match spec {
            TypeSpec::Void => Type::VoidFunction,
            TypeSpec::Int => Type::IntFunction,
        }
    }

    /// Type produced by calling a value of this function type
    pub fn return_type(self) -> Option<Type> {
        match self {
            Type::IntFunction => Some(Type::Int),
            Type::VoidFunction => Some(Type::Void),
            _ => None,
        }
    }

    /// Name used in the symbol table listing
    pub fn listing_name(self) -> &'static str {
        match self {
            Type::Void => "Void",
            Type::Int => "Integer",
            Type::IntArray => "Integer Array",
            Type::VoidFunction | Type::IntFunction => "Function",
            Type::SemanticError => "Error",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.listing_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_types() {
        assert_eq!(Type::function_returning(TypeSpec::Void), Type::VoidFunction);
        assert_eq!(Type::function_returning(TypeSpec::Int), Type::IntFunction);
        assert!(Type::IntFunction.is_function());
        assert!(!Type::IntArray.is_function());
        assert_eq!(Type::IntFunction.return_type(), Some(Type::Int));
        assert_eq!(Type::Int.return_type(), None);
    }

    #[test]
    fn test_both_function_kinds_list_the_same() {
        assert_eq!(Type::VoidFunction.listing_name(), "Function");
        assert_eq!(Type::IntFunction.to_string(), "Function");
        assert_eq!(Type::IntArray.to_string(), "Integer Array");
    }
}
