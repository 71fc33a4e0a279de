//! Declaration hoisting.
//!
//! Before a block's statements are rendered, the names it declares at its
//! own level are bound in the current frame. That way a statement can
//! refer to a function declared further down the same block, and sibling
//! functions can call each other.
//!
//! Only direct statements are scanned. Nested blocks, loops and function
//! bodies hoist their own declarations when they are entered. Hoisting
//! reserves the name only; a function's parameters are bound when the
//! declaration itself is rendered.

use crate::ast::{Stmt, StmtKind};
use crate::context::HygieneContext;

/// Bind the declarations of `stmts` in the current frame.
pub fn hoist(ctx: &mut HygieneContext, stmts: &[Stmt]) {
    for stmt in stmts {
        if let Some(name) = hoisted_name(stmt) {
            ctx.declare(name);
        }
    }
}

/// The name `stmt` contributes to its block, if any.
///
/// A declaration group contributes its first declarator only.
pub fn hoisted_name(stmt: &Stmt) -> Option<&str> {
    match &stmt.kind {
        StmtKind::Var(decl) => decl.first().map(|d| d.name.as_str()),
        StmtKind::Function(func) => func.name.as_deref(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, VarDecl, VarDeclarator, VarKind};
    use crate::span::Span;

    #[test]
    fn test_hoists_vars_and_functions() {
        let stmts = vec![
            Stmt::expr(Expr::call(Expr::ident("g"), vec![])),
            Stmt::var(VarKind::Var, "a", Some(Expr::number(1.0))),
            Stmt::function("g", &[], vec![]),
        ];
        let mut ctx = HygieneContext::new("$");
        hoist(&mut ctx, &stmts);
        assert_eq!(ctx.resolve_reference("a"), "a$0");
        assert_eq!(ctx.resolve_reference("g"), "g$1");
    }

    #[test]
    fn test_does_not_recurse_into_blocks() {
        let stmts = vec![Stmt::block(vec![Stmt::var(VarKind::Let, "inner", None)])];
        let mut ctx = HygieneContext::new("$");
        hoist(&mut ctx, &stmts);
        assert_eq!(ctx.resolve_reference("inner"), "inner");
        assert_eq!(ctx.names().count(), 0);
    }

    #[test]
    fn test_does_not_hoist_params_or_body() {
        let stmts = vec![Stmt::function(
            "f",
            &["p"],
            vec![Stmt::var(VarKind::Var, "local", None)],
        )];
        let mut ctx = HygieneContext::new("$");
        hoist(&mut ctx, &stmts);
        assert_eq!(ctx.resolve_reference("f"), "f$0");
        assert_eq!(ctx.resolve_reference("p"), "p");
        assert_eq!(ctx.resolve_reference("local"), "local");
    }

    #[test]
    fn test_only_first_declarator_is_hoisted() {
        let decl = VarDecl {
            kind: VarKind::Let,
            decls: vec![
                VarDeclarator {
                    name: "a".into(),
                    init: None,
                    span: Span::default(),
                },
                VarDeclarator {
                    name: "b".into(),
                    init: None,
                    span: Span::default(),
                },
            ],
        };
        let stmts = vec![Stmt::new(StmtKind::Var(decl), Span::default())];
        let mut ctx = HygieneContext::new("$");
        hoist(&mut ctx, &stmts);
        assert_eq!(ctx.resolve_reference("a"), "a$0");
        assert_eq!(ctx.resolve_reference("b"), "b");
    }

    #[test]
    fn test_hoisting_twice_is_idempotent() {
        let stmts = vec![Stmt::var(VarKind::Const, "a", None)];
        let mut ctx = HygieneContext::new("$");
        hoist(&mut ctx, &stmts);
        hoist(&mut ctx, &stmts);
        assert_eq!(ctx.names().count(), 1);
    }
}
