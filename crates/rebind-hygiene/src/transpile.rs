//! Hygienic code generator.
//!
//! Renders an AST back to JavaScript while renaming every declaration to
//! a unique name. Rendering is a single recursive descent:
//!
//! - entering a block, a function, or a `for` loop pushes a scope frame,
//!   leaving it pops the frame (on error paths too);
//! - at block entry the block's own declarations are hoisted, so forward
//!   references resolve;
//! - declaration sites go through `declare`, value references through
//!   `resolve_reference`.
//!
//! Expressions are fully parenthesized; only semantic equivalence is
//! guaranteed, not the original layout.

use crate::ast::*;
use crate::context::HygieneContext;
use crate::error::TranspileError;
use crate::hoist::hoist;
use crate::names::DEFAULT_SEPARATOR;
use crate::span::Span;
use tracing::{debug, warn};

type Result<T> = std::result::Result<T, TranspileError>;

/// Code generation options.
#[derive(Debug, Clone)]
pub struct TranspileOptions {
    /// Inserted between an original name and its counter (default: "$").
    ///
    /// Not validated here. It must be non-empty and must not end with a
    /// digit, or two different originals can mint the same name
    /// (`rebind_core::validate_separator` checks this).
    pub separator: String,
    /// Indent string (default: "  ").
    pub indent: Option<String>,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            indent: None,
        }
    }
}

/// Rename with default options.
pub fn transform(program: &Program) -> Result<String> {
    transform_with(program, &TranspileOptions::default())
}

/// Rename with explicit options. Each call starts from a fresh context.
pub fn transform_with(program: &Program, options: &TranspileOptions) -> Result<String> {
    Transpiler::new(options).transpile(program)
}

/// The code generator. One instance renders one program.
pub struct Transpiler {
    ctx: HygieneContext,
    /// Output buffer.
    output: String,
    /// Current indentation level.
    indent_level: usize,
    /// Indent string.
    indent_str: String,
}

impl Transpiler {
    /// Create a code generator with a fresh renaming context.
    pub fn new(options: &TranspileOptions) -> Self {
        let indent_str = options.indent.clone().unwrap_or_else(|| "  ".to_string());
        Self {
            ctx: HygieneContext::new(&options.separator),
            output: String::new(),
            indent_level: 0,
            indent_str,
        }
    }

    /// Render `program`, one top-level statement per line.
    pub fn transpile(mut self, program: &Program) -> Result<String> {
        debug!(statements = program.body.len(), "transpiling program");
        hoist(&mut self.ctx, &program.body);
        for stmt in &program.body {
            self.emit_stmt(stmt)?;
            self.emit_newline();
        }
        debug!(
            declarations = self.ctx.names().count(),
            bytes = self.output.len(),
            "transpiled program"
        );
        Ok(self.output)
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Run `f` inside a new scope frame.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.ctx.enter_scope();
        let result = f(self);
        self.ctx.exit_scope();
        result
    }

    // =========================================================================
    // Statement Emission
    // =========================================================================

    fn emit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Var(decl) => {
                self.emit_var_decl(decl, stmt.span)?;
                self.emit(";");
            }
            StmtKind::Function(func) => {
                self.emit_function_decl(func)?;
            }
            StmtKind::Block(stmts) => {
                self.emit_scoped_block(stmts)?;
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.emit("if (");
                self.emit_expr(test)?;
                self.emit(") ");
                match alternate {
                    Some(alt) => {
                        // A bare consequent could capture the `else` (dangling else).
                        if matches!(consequent.kind, StmtKind::Block(_)) {
                            self.emit_stmt(consequent)?;
                        } else {
                            self.emit_braced(consequent)?;
                        }
                        self.emit(" else ");
                        self.emit_stmt(alt)?;
                    }
                    None => self.emit_stmt(consequent)?,
                }
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                // One frame covers the initializer, test, update and body.
                self.scoped(|this| {
                    this.emit("for (");
                    match init {
                        Some(LoopInit::Declaration(decl)) => this.emit_var_decl(decl, stmt.span)?,
                        Some(LoopInit::Expression(expr)) => this.emit_expr(expr)?,
                        None => {}
                    }
                    this.emit(";");
                    if let Some(test) = test {
                        this.emit(" ");
                        this.emit_expr(test)?;
                    }
                    this.emit(";");
                    if let Some(update) = update {
                        this.emit(" ");
                        this.emit_expr(update)?;
                    }
                    this.emit(") ");
                    this.emit_stmt(body)
                })?;
            }
            StmtKind::While { test, body } => {
                self.emit("while (");
                self.emit_expr(test)?;
                self.emit(") ");
                self.emit_stmt(body)?;
            }
            StmtKind::DoWhile { body, test } => {
                self.emit("do ");
                self.emit_stmt(body)?;
                self.emit(" while (");
                self.emit_expr(test)?;
                self.emit(");");
            }
            StmtKind::Break => self.emit("break;"),
            StmtKind::Continue => self.emit("continue;"),
            StmtKind::Return { arg } => {
                self.emit("return");
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr(arg)?;
                }
                self.emit(";");
            }
            StmtKind::Throw { arg } => {
                self.emit("throw ");
                self.emit_expr(arg)?;
                self.emit(";");
            }
            StmtKind::Expr(expr) => {
                self.emit_expr(expr)?;
                self.emit(";");
            }
            StmtKind::Empty => self.emit(";"),
            StmtKind::Unsupported(kind) => return Err(unsupported(kind, stmt.span)),
        }
        Ok(())
    }

    /// `{ ... }` with the statements laid out one per line.
    ///
    /// Does not touch the scope chain; callers decide which frame the
    /// statements render in.
    fn emit_block_body(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.emit("{");
        if !stmts.is_empty() {
            self.indent();
            for stmt in stmts {
                self.emit_newline();
                self.emit_stmt(stmt)?;
            }
            self.dedent();
            self.emit_newline();
        }
        self.emit("}");
        Ok(())
    }

    fn emit_scoped_block(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.scoped(|this| {
            hoist(&mut this.ctx, stmts);
            this.emit_block_body(stmts)
        })
    }

    /// Wrap a single non-block statement in braces, in the current frame.
    fn emit_braced(&mut self, stmt: &Stmt) -> Result<()> {
        self.emit("{");
        self.indent();
        self.emit_newline();
        self.emit_stmt(stmt)?;
        self.dedent();
        self.emit_newline();
        self.emit("}");
        Ok(())
    }

    /// `<kind> <unique> [= <init>]`, without the trailing semicolon.
    fn emit_var_decl(&mut self, decl: &VarDecl, span: Span) -> Result<()> {
        let Some(first) = decl.first() else {
            return Err(unsupported("VariableDeclaration (empty)", span));
        };
        if decl.decls.len() > 1 {
            warn!(
                kind = decl.kind.as_str(),
                dropped = decl.decls.len() - 1,
                "only the first declarator of a declaration group is rendered"
            );
        }
        let unique = self.ctx.declare(&first.name);
        self.emit(decl.kind.as_str());
        self.emit(" ");
        self.emit(&unique);
        if let Some(init) = &first.init {
            self.emit(" = ");
            self.emit_expr(init)?;
        }
        Ok(())
    }

    fn emit_function_decl(&mut self, func: &Function) -> Result<()> {
        let Some(name) = func.name.as_deref() else {
            // Nothing to bind; an anonymous declaration is just a value.
            self.emit_function_expr(func)?;
            self.emit(";");
            return Ok(());
        };
        // The name belongs to the enclosing frame (already hoisted there).
        let unique = self.ctx.declare(name);
        self.scoped(|this| this.emit_function_tail(Some(&unique), &func.params, &func.body))
    }

    fn emit_function_expr(&mut self, func: &Function) -> Result<()> {
        self.emit("(");
        self.scoped(|this| {
            // A function expression's own name is only visible inside it.
            let unique = func.name.as_deref().map(|name| this.ctx.declare(name));
            this.emit_function_tail(unique.as_deref(), &func.params, &func.body)
        })?;
        self.emit(")");
        Ok(())
    }

    /// `function [name](params) { body }`, rendered in the function's frame.
    ///
    /// Parameters and the body's hoisted declarations share one frame, so
    /// `var x` redeclaring a parameter `x` keeps the parameter's name.
    fn emit_function_tail(
        &mut self,
        name: Option<&str>,
        params: &[Param],
        body: &[Stmt],
    ) -> Result<()> {
        self.emit("function");
        if let Some(name) = name {
            self.emit(" ");
            self.emit(name);
        }
        self.emit_params(params);
        self.emit(" ");
        hoist(&mut self.ctx, body);
        self.emit_block_body(body)
    }

    fn emit_params(&mut self, params: &[Param]) {
        self.emit("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            let unique = self.ctx.declare(&param.name);
            self.emit(&unique);
        }
        self.emit(")");
    }

    /// Arrows become function expressions; a concise body becomes a return.
    fn emit_arrow(&mut self, arrow: &ArrowFunction) -> Result<()> {
        self.emit("(");
        self.scoped(|this| match &arrow.body {
            ArrowBody::Block(stmts) => this.emit_function_tail(None, &arrow.params, stmts),
            ArrowBody::Expr(expr) => {
                this.emit("function");
                this.emit_params(&arrow.params);
                this.emit(" { return ");
                this.emit_expr(expr)?;
                this.emit("; }");
                Ok(())
            }
        })?;
        self.emit(")");
        Ok(())
    }

    // =========================================================================
    // Expression Emission
    // =========================================================================

    fn emit_expr(&mut self, expr: &Expr) -> Result<()> {
        match &expr.kind {
            ExprKind::Null => self.emit("null"),
            ExprKind::Bool(b) => self.emit(if *b { "true" } else { "false" }),
            ExprKind::Number(n) => self.emit(&format_number(*n)),
            ExprKind::String(s) => {
                self.emit("\"");
                self.emit(&escape_string(s));
                self.emit("\"");
            }
            ExprKind::Regex { pattern, flags } => {
                self.emit("/");
                self.emit(pattern);
                self.emit("/");
                self.emit(flags);
            }
            ExprKind::Ident(name) => {
                let resolved = self.ctx.resolve_reference(name);
                self.emit(&resolved);
            }
            ExprKind::Array(elements) => {
                self.emit("[");
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_expr(elem)?;
                    }
                }
                // A trailing hole needs its own comma to count.
                if matches!(elements.last(), Some(None)) {
                    self.emit(",");
                }
                self.emit("]");
            }
            ExprKind::Object(properties) => {
                // Parenthesized so a statement never starts with `{`.
                self.emit("({");
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    // Shorthand `{a}` expands, since the value may be renamed.
                    self.emit_property_key(&prop.key)?;
                    self.emit(": ");
                    self.emit_expr(&prop.value)?;
                }
                self.emit("})");
            }
            ExprKind::Function(func) => self.emit_function_expr(func)?,
            ExprKind::Arrow(arrow) => self.emit_arrow(arrow)?,
            ExprKind::Unary { op, arg } => {
                self.emit(op.as_str());
                self.emit("(");
                self.emit_expr(arg)?;
                self.emit(")");
            }
            ExprKind::Binary { op, left, right } => {
                self.emit("(");
                // A unary expression cannot be the base of `**`.
                if *op == BinaryOp::Pow && matches!(left.kind, ExprKind::Unary { .. }) {
                    self.emit("(");
                    self.emit_expr(left)?;
                    self.emit(")");
                } else {
                    self.emit_expr(left)?;
                }
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                self.emit_expr(right)?;
                self.emit(")");
            }
            ExprKind::Assign { op, target, value } => {
                self.emit("(");
                self.emit_expr(target)?;
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                self.emit_expr(value)?;
                self.emit(")");
            }
            ExprKind::Update { op, prefix, arg } => {
                self.emit("(");
                if *prefix {
                    self.emit(op.as_str());
                    self.emit_expr(arg)?;
                } else {
                    self.emit_expr(arg)?;
                    self.emit(op.as_str());
                }
                self.emit(")");
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit("(");
                self.emit_expr(test)?;
                self.emit(" ? ");
                self.emit_expr(consequent)?;
                self.emit(" : ");
                self.emit_expr(alternate)?;
                self.emit(")");
            }
            ExprKind::Sequence(exprs) => {
                self.emit("(");
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr(e)?;
                }
                self.emit(")");
            }
            ExprKind::Member { object, property } => {
                self.emit_operand(object)?;
                match property {
                    MemberProperty::Named(name) => {
                        self.emit(".");
                        self.emit(name);
                    }
                    MemberProperty::Computed(prop) => {
                        self.emit("[");
                        self.emit_expr(prop)?;
                        self.emit("]");
                    }
                }
            }
            ExprKind::Call { callee, args } => {
                self.emit_operand(callee)?;
                self.emit_args(args)?;
            }
            ExprKind::New { callee, args } => {
                self.emit("new ");
                if matches!(callee.kind, ExprKind::Ident(_)) {
                    self.emit_expr(callee)?;
                } else {
                    self.emit("(");
                    self.emit_expr(callee)?;
                    self.emit(")");
                }
                self.emit_args(args)?;
            }
            ExprKind::Unsupported(kind) => return Err(unsupported(kind, expr.span)),
        }
        Ok(())
    }

    /// Callee or member object, parenthesized unless already delimited.
    fn emit_operand(&mut self, expr: &Expr) -> Result<()> {
        if is_self_delimited(expr) {
            self.emit_expr(expr)
        } else {
            self.emit("(");
            self.emit_expr(expr)?;
            self.emit(")");
            Ok(())
        }
    }

    fn emit_args(&mut self, args: &[Expr]) -> Result<()> {
        self.emit("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_expr(arg)?;
        }
        self.emit(")");
        Ok(())
    }

    fn emit_property_key(&mut self, key: &PropertyKey) -> Result<()> {
        match key {
            PropertyKey::Ident(name) => self.emit(name),
            PropertyKey::String(s) => {
                self.emit("\"");
                self.emit(&escape_string(s));
                self.emit("\"");
            }
            PropertyKey::Number(n) => self.emit(&format_number(*n)),
            PropertyKey::Computed(expr) => {
                self.emit("[");
                self.emit_expr(expr)?;
                self.emit("]");
            }
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn unsupported(kind: &str, span: Span) -> TranspileError {
    TranspileError::UnsupportedSyntax {
        kind: kind.to_string(),
        span,
    }
}

/// Renderings that can take `.x`, `[x]` or `(args)` without parentheses.
fn is_self_delimited(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Ident(_)
            | ExprKind::Member { .. }
            | ExprKind::Call { .. }
            | ExprKind::Function(_)
            | ExprKind::Arrow(_)
            | ExprKind::Object(_)
            | ExprKind::Array(_)
            | ExprKind::String(_)
            | ExprKind::Regex { .. }
            | ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Binary { .. }
            | ExprKind::Assign { .. }
            | ExprKind::Update { .. }
            | ExprKind::Conditional { .. }
            | ExprKind::Sequence(_)
    )
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        let s = format!("{}", n);
        // Use shorter exponential notation if beneficial
        let exp = format!("{:e}", n);
        if exp.len() < s.len() {
            exp
        } else {
            s
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}
