//! Symbol table builder pass
//!
//! Preorder: open scopes, declare names, record line references and tag every
//! node with its innermost scope. Postorder: close scopes.

use crate::ast::{ExprKind, Node, NodeKind, StmtKind, Type, TypeSpec};
use crate::common::{Diagnostic, SemaError, SemaResult, VoidSite};

use super::context::{AnalysisContext, Phase};
use super::symtab::{ScopeId, SymbolId};
use super::traverse::{Visitor, traverse};

/// Name of the outermost scope
pub const GLOBAL_SCOPE: &str = "global";

struct SymtabBuilder<'a> {
    ctx: &'a mut AnalysisContext,
    /// Name given to the next block scope
    scope_name: String,
    /// Set between a function declaration and its body, whose block must
    /// reuse the function's scope instead of opening a nested one
    entering_function: bool,
    /// The function being declared lost to an earlier declaration
    function_redefined: bool,
}

impl<'a> SymtabBuilder<'a> {
    fn new(ctx: &'a mut AnalysisContext) -> Self {
        Self {
            ctx,
            scope_name: GLOBAL_SCOPE.to_string(),
            entering_function: false,
            function_redefined: false,
        }
    }

    /// Open the global scope and declare `int input(void)` and
    /// `void output(int value)`
    fn install_builtins(&mut self) {
        let table = &mut self.ctx.symtab;
        let global = table.push(GLOBAL_SCOPE);

        let _ = table.declare(global, "input", Type::IntFunction, 0);
        if let Ok(output) = table.declare(global, "output", Type::VoidFunction, 0) {
            let scope = table.push("output");
            let _ = table.declare(scope, "value", Type::Int, 0);
            table.add_parameter(output, Type::Int);
            table.pop();
        }
    }

    /// Declare a variable or parameter. `void` declarations are reported and
    /// stored poisoned; a name already declared in `scope` is reported and
    /// left alone.
    fn declare_object(
        &mut self,
        scope: ScopeId,
        name: &str,
        spec: TypeSpec,
        ty: Type,
        site: VoidSite,
        lineno: u32,
    ) -> Option<SymbolId> {
        let ty = match spec {
            TypeSpec::Int => ty,
            TypeSpec::Void => Type::SemanticError,
        };

        match self.ctx.symtab.declare(scope, name, ty, lineno) {
            Ok(id) => {
                if spec == TypeSpec::Void {
                    self.ctx.report(Diagnostic::VoidDeclaration {
                        name: name.to_string(),
                        site,
                        line: lineno,
                    });
                }
                Some(id)
            }
            Err(_) => {
                self.ctx.report(Diagnostic::Redefinition {
                    name: name.to_string(),
                    line: lineno,
                });
                None
            }
        }
    }

    fn declare_parameter(
        &mut self,
        scope: ScopeId,
        name: &str,
        spec: TypeSpec,
        ty: Type,
        site: VoidSite,
        lineno: u32,
    ) {
        let table = &self.ctx.symtab;
        let owner = table.scope(scope);
        let function = owner
            .parent
            .and_then(|parent| table.lookup_local(parent, &owner.name))
            .filter(|id| table.symbol(*id).ty.is_function());

        if let Some(param) = self.declare_object(scope, name, spec, ty, site, lineno) {
            let param_ty = self.ctx.symtab.symbol(param).ty;
            if let Some(function) = function.filter(|_| !self.function_redefined) {
                self.ctx.symtab.add_parameter(function, param_ty);
            }
        }
    }
}

impl Visitor for SymtabBuilder<'_> {
    fn pre(&mut self, node: &mut Node) {
        let Some(scope) = self.ctx.symtab.top() else {
            return;
        };

        match &node.kind {
            NodeKind::Stmt(StmtKind::Compound) => {
                let block = if self.entering_function {
                    scope
                } else {
                    self.ctx.symtab.push(self.scope_name.clone())
                };
                self.entering_function = false;
                node.scope = Some(block);
            }

            NodeKind::Stmt(StmtKind::VarDecl { name, spec }) => {
                self.declare_object(scope, name, *spec, Type::Int, VoidSite::Variable, node.lineno);
                node.scope = Some(scope);
            }

            NodeKind::Stmt(StmtKind::ArrayDecl { name, spec, .. }) => {
                self.declare_object(
                    scope,
                    name,
                    *spec,
                    Type::IntArray,
                    VoidSite::Variable,
                    node.lineno,
                );
                node.scope = Some(scope);
            }

            NodeKind::Stmt(StmtKind::FuncDecl { name, returns }) => {
                let ty = Type::function_returning(*returns);
                self.function_redefined =
                    self.ctx.symtab.declare(scope, name, ty, node.lineno).is_err();
                if self.function_redefined {
                    self.ctx.report(Diagnostic::Redefinition {
                        name: name.clone(),
                        line: node.lineno,
                    });
                }

                self.scope_name.clone_from(name);
                node.scope = Some(self.ctx.symtab.push(name.clone()));
                self.entering_function = true;
            }

            NodeKind::Stmt(StmtKind::Param { name, spec }) => {
                self.declare_parameter(
                    scope,
                    name,
                    *spec,
                    Type::Int,
                    VoidSite::Parameter,
                    node.lineno,
                );
                node.scope = Some(scope);
            }

            NodeKind::Stmt(StmtKind::ArrayParam { name, spec }) => {
                self.declare_parameter(
                    scope,
                    name,
                    *spec,
                    Type::IntArray,
                    VoidSite::ArrayParameter,
                    node.lineno,
                );
                node.scope = Some(scope);
            }

            // Undeclared names are left to the type checker
            NodeKind::Expr(ExprKind::Var { name } | ExprKind::Call { name }) => {
                if let Some(symbol) = self.ctx.symtab.lookup(scope, name) {
                    self.ctx.symtab.record_reference(symbol, node.lineno);
                }
                node.scope = Some(scope);
            }

            NodeKind::Stmt(
                StmtKind::If
                | StmtKind::IfElse
                | StmtKind::While
                | StmtKind::Return
                | StmtKind::VoidReturn,
            )
            | NodeKind::Expr(ExprKind::Op(_) | ExprKind::Const(_) | ExprKind::Assign) => {
                node.scope = Some(scope);
            }
        }
    }

    fn post(&mut self, node: &mut Node) {
        match &node.kind {
            NodeKind::Stmt(StmtKind::Compound) => self.ctx.symtab.pop(),

            NodeKind::Stmt(StmtKind::FuncDecl { .. }) => {
                // No body consumed the function's scope
                if self.entering_function {
                    self.ctx.symtab.pop();
                    self.entering_function = false;
                }

                let table = &self.ctx.symtab;
                self.scope_name = node
                    .scope
                    .and_then(|own| table.scope(own).parent)
                    .map_or_else(
                        || GLOBAL_SCOPE.to_string(),
                        |parent| table.scope(parent).name.clone(),
                    );
                self.function_redefined = false;
            }

            _ => {}
        }
    }
}

/// Run the builder pass over `root`, filling `ctx.symtab` and every node's
/// `scope`.
pub fn build_symtab(ctx: &mut AnalysisContext, root: Option<&mut Node>) -> SemaResult<()> {
    if ctx.phase != Phase::Unbuilt {
        return Err(SemaError::pass_order(
            "the symbol table of this unit is already built",
        ));
    }

    let mut builder = SymtabBuilder::new(ctx);
    builder.install_builtins();
    traverse(root, &mut builder);

    ctx.symtab.discard_stack();
    ctx.phase = Phase::SymbolsBuilt;
    Ok(())
}
