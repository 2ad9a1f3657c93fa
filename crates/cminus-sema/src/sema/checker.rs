//! Type checker pass
//!
//! Runs in postorder only, so every child is typed before its parent. Names
//! resolve through the scope the builder recorded on each node.

use crate::ast::{ExprKind, Node, NodeKind, StmtKind, Type};
use crate::common::{Diagnostic, SemaError, SemaResult};

use super::context::{AnalysisContext, Phase};
use super::symtab::{Enclosing, ScopeId, SymbolId};
use super::traverse::{Visitor, traverse};

struct TypeChecker<'a> {
    ctx: &'a mut AnalysisContext,
}

/// A poisoned argument or parameter matches anything; its cause is already
/// reported.
fn argument_matches(arg: Option<Type>, param: Type) -> bool {
    param.is_poison() || arg == Some(param) || arg == Some(Type::SemanticError)
}

impl TypeChecker<'_> {
    /// Resolve a use of `name` at `lineno`. A declaration whose first recorded
    /// line comes after the use does not count.
    fn resolve(&self, scope: Option<ScopeId>, name: &str, lineno: u32) -> Option<SymbolId> {
        let table = &self.ctx.symtab;
        table
            .lookup(scope?, name)
            .filter(|id| table.symbol(*id).first_line() <= lineno)
    }

    fn check(&mut self, node: &Node) -> Option<Type> {
        match &node.kind {
            NodeKind::Expr(ExprKind::Op(_)) => self.check_operator(node),
            NodeKind::Expr(ExprKind::Const(_)) => Some(Type::Int),
            NodeKind::Expr(ExprKind::Var { name }) => Some(self.check_variable(node, name)),
            NodeKind::Expr(ExprKind::Assign) => Some(self.check_assign(node)),
            NodeKind::Expr(ExprKind::Call { name }) => Some(self.check_call(node, name)),

            NodeKind::Stmt(StmtKind::If | StmtKind::IfElse | StmtKind::While) => {
                if node.child_type(0) != Some(Type::Int) {
                    self.ctx.report(Diagnostic::InvalidCondition { line: node.lineno });
                }
                None
            }
            NodeKind::Stmt(StmtKind::Return) => {
                let valid = match self.enclosing_function_type(node) {
                    Enclosing::Function(Type::IntFunction) => {
                        node.child_type(0) == Some(Type::Int)
                    }
                    Enclosing::Redefined => true,
                    _ => false,
                };
                if !valid {
                    self.ctx.report(Diagnostic::InvalidReturnType { line: node.lineno });
                }
                None
            }
            NodeKind::Stmt(StmtKind::VoidReturn) => {
                let valid = matches!(
                    self.enclosing_function_type(node),
                    Enclosing::Function(Type::VoidFunction) | Enclosing::Redefined
                );
                if !valid {
                    self.ctx.report(Diagnostic::InvalidReturnType { line: node.lineno });
                }
                None
            }

            NodeKind::Stmt(
                StmtKind::Compound
                | StmtKind::VarDecl { .. }
                | StmtKind::ArrayDecl { .. }
                | StmtKind::FuncDecl { .. }
                | StmtKind::Param { .. }
                | StmtKind::ArrayParam { .. },
            ) => None,
        }
    }

    /// Type of the function a return statement belongs to. The redefinition
    /// case is already reported, so callers accept it.
    fn enclosing_function_type(&self, node: &Node) -> Enclosing<Type> {
        let table = &self.ctx.symtab;
        let Some(scope) = node.scope else {
            return Enclosing::TopLevel;
        };
        table
            .enclosing_function(scope)
            .map(|id| table.symbol(id).ty)
    }

    fn check_operator(&mut self, node: &Node) -> Option<Type> {
        if node.child_type(0) == Some(Type::Int) && node.child_type(1) == Some(Type::Int) {
            return Some(Type::Int);
        }

        self.ctx.report(Diagnostic::InvalidExpression { line: node.lineno });
        self.ctx
            .config
            .poison_failed_operators
            .then_some(Type::SemanticError)
    }

    fn check_variable(&mut self, node: &Node, name: &str) -> Type {
        let Some(symbol) = self.resolve(node.scope, name, node.lineno) else {
            self.ctx.report(Diagnostic::UndeclaredVariable {
                name: name.to_string(),
                line: node.lineno,
            });
            return Type::SemanticError;
        };

        if node.child(0).is_none() {
            return self.ctx.symtab.symbol(symbol).ty;
        }
        if node.child_type(0) != Some(Type::Int) {
            self.ctx.report(Diagnostic::InvalidIndex {
                name: name.to_string(),
                line: node.lineno,
            });
            return Type::SemanticError;
        }
        Type::Int
    }

    fn check_assign(&mut self, node: &Node) -> Type {
        let target_ty = node.child_type(0);
        let value_ty = node.child_type(1);
        let target_name = node.child(0).and_then(Node::name).unwrap_or_default();

        let resolved = node
            .child(0)
            .and_then(|target| self.resolve(target.scope, target_name, target.lineno));
        if resolved.is_none() {
            // The target's own check has already reported it
            if target_ty != Some(Type::SemanticError) {
                self.ctx.report(Diagnostic::UndeclaredVariable {
                    name: target_name.to_string(),
                    line: node.lineno,
                });
            }
            return Type::SemanticError;
        }

        let poisoned =
            target_ty == Some(Type::SemanticError) || value_ty == Some(Type::SemanticError);
        if target_ty != value_ty && !poisoned {
            self.ctx.report(Diagnostic::AssignmentType {
                name: target_name.to_string(),
                line: node.lineno,
            });
            return Type::SemanticError;
        }

        target_ty.unwrap_or(Type::SemanticError)
    }

    fn check_call(&mut self, node: &Node, name: &str) -> Type {
        let Some(symbol) = self.resolve(node.scope, name, node.lineno) else {
            self.ctx.report(Diagnostic::UndeclaredFunction {
                name: name.to_string(),
                line: node.lineno,
            });
            return Type::SemanticError;
        };

        let function = self.ctx.symtab.symbol(symbol);
        let Some(result) = function.ty.return_type() else {
            self.ctx.report(Diagnostic::InvalidFunctionCall {
                name: name.to_string(),
                line: node.lineno,
            });
            return Type::SemanticError;
        };

        let args: Vec<Option<Type>> = node
            .child(0)
            .map(|first| first.iter_chain().map(|arg| arg.ty).collect())
            .unwrap_or_default();
        let matches = args.len() == function.params.len()
            && args
                .iter()
                .zip(&function.params)
                .all(|(arg, param)| argument_matches(*arg, *param));

        if !matches {
            self.ctx.report(Diagnostic::Parameter {
                name: name.to_string(),
                line: node.lineno,
            });
        }
        result
    }
}

impl Visitor for TypeChecker<'_> {
    fn post(&mut self, node: &mut Node) {
        node.ty = self.check(node);
    }
}

/// Run the type checker pass over `root`, filling every expression node's
/// `ty`. The builder pass must have run on the same context first.
pub fn type_check(ctx: &mut AnalysisContext, root: Option<&mut Node>) -> SemaResult<()> {
    match ctx.phase {
        Phase::SymbolsBuilt => {}
        Phase::Unbuilt => {
            return Err(SemaError::pass_order(
                "type checking needs the symbol table to be built first",
            ));
        }
        Phase::TypesChecked => {
            return Err(SemaError::pass_order("this unit is already type checked"));
        }
    }

    let mut checker = TypeChecker { ctx };
    traverse(root, &mut checker);

    ctx.phase = Phase::TypesChecked;
    Ok(())
}
