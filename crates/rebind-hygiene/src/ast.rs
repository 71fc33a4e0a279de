//! AST node types for the supported JavaScript subset.
//!
//! Design principle: everything is an Expression or a Statement, each a
//! `kind` plus the `Span` it came from. Declaration sites (variable names,
//! function names, parameters) are plain strings; every other identifier
//! is an `ExprKind::Ident` reference.
//!
//! Node kinds the engine has no rendering rule for are kept as
//! `Unsupported` so that the transform can report them by name.

use crate::span::Span;

/// The root of a parsed script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, in source order.
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    /// Create a program from its statements.
    pub fn new(body: Vec<Stmt>) -> Self {
        Self {
            body,
            span: Span::default(),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // === Literals ===
    /// Null literal
    Null,
    /// Boolean literal
    Bool(bool),
    /// Number literal
    Number(f64),
    /// String literal (unescaped value)
    String(String),
    /// Regular expression literal
    Regex { pattern: String, flags: String },

    // === Identifiers ===
    /// Identifier reference
    Ident(String),

    // === Compound Expressions ===
    /// Array literal: `[a, , c]` (holes are `None`)
    Array(Vec<Option<Expr>>),
    /// Object literal: `{a: 1, b}`
    Object(Vec<Property>),
    /// Function expression: `function (x) { ... }`
    Function(Box<Function>),
    /// Arrow function: `x => x`
    Arrow(Box<ArrowFunction>),

    // === Operations ===
    /// Unary operation: `!x`, `-x`, `typeof x`
    Unary { op: UnaryOp, arg: Box<Expr> },
    /// Binary or logical operation: `a + b`, `a && b`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Assignment: `a = b`, `a += b`
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Update expression: `++a`, `a--`
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
    },
    /// Conditional: `a ? b : c`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Sequence: `a, b, c`
    Sequence(Vec<Expr>),

    // === Member Access & Calls ===
    /// Member expression: `a.b` or `a[b]`
    Member {
        object: Box<Expr>,
        property: MemberProperty,
    },
    /// Function call: `f(a, b)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// New expression: `new Foo(a, b)`
    New { callee: Box<Expr>, args: Vec<Expr> },

    /// An expression kind with no rendering rule, by ESTree type name.
    Unsupported(String),
}

/// The property side of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `object.name`; property names are never renamed.
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

/// Property in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    /// `{a}` rather than `{a: a}`.
    pub shorthand: bool,
}

/// Object literal keys.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    String(String),
    Number(f64),
    Computed(Box<Expr>),
}

// =============================================================================
// Functions
// =============================================================================

/// A function declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Required for declarations, optional for expressions.
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A simple identifier parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: Span::default(),
        }
    }
}

/// An arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Param>,
    pub body: ArrowBody,
    pub span: Span,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Concise body: `x => x + 1`
    Expr(Box<Expr>),
    /// Block body: `x => { return x; }`
    Block(Vec<Stmt>),
}

// =============================================================================
// Statements
// =============================================================================

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // === Declarations ===
    /// Declaration group: `let x = 1, y = 2`
    Var(VarDecl),
    /// Function declaration: `function foo() {}`
    Function(Box<Function>),

    // === Control Flow ===
    /// Block statement: `{ ... }`
    Block(Vec<Stmt>),
    /// If statement; `alternate` is `None` without an `else`.
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    /// For statement: `for (init; test; update) body`
    For {
        init: Option<LoopInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// While statement
    While { test: Expr, body: Box<Stmt> },
    /// Do-while statement
    DoWhile { body: Box<Stmt>, test: Expr },
    /// Break statement
    Break,
    /// Continue statement
    Continue,
    /// Return statement
    Return { arg: Option<Expr> },
    /// Throw statement
    Throw { arg: Expr },

    // === Expressions ===
    /// Expression statement
    Expr(Expr),
    /// Empty statement: `;`
    Empty,

    /// A statement kind with no rendering rule, by ESTree type name.
    Unsupported(String),
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// A declaration group.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
}

impl VarDecl {
    /// The declarator the engine hoists and renders.
    ///
    /// Groups declaring several names are only partially supported: just
    /// the first declarator takes part in renaming and output.
    pub fn first(&self) -> Option<&VarDeclarator> {
        self.decls.first()
    }
}

/// A single `name = init` entry of a declaration group.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// The initializer slot of a `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopInit {
    /// `for (let i = 0; ...)`: declares into the loop's own scope.
    Declaration(VarDecl),
    /// `for (i = 0; ...)`: rendered as a plain expression.
    Expression(Expr),
}

// =============================================================================
// Supporting Types
// =============================================================================

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Typeof => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
        }
    }

    pub fn from_token(op: &str) -> Option<Self> {
        Some(match op {
            "-" => Self::Minus,
            "+" => Self::Plus,
            "!" => Self::Not,
            "~" => Self::BitNot,
            "typeof" => Self::Typeof,
            "void" => Self::Void,
            "delete" => Self::Delete,
            _ => return None,
        })
    }
}

/// Binary and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // **

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Bitwise
    BitOr,  // |
    BitXor, // ^
    BitAnd, // &
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>

    // Logical
    And,             // &&
    Or,              // ||
    NullishCoalesce, // ??

    // Other
    In,         // in
    Instanceof, // instanceof
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::And => "&&",
            Self::Or => "||",
            Self::NullishCoalesce => "??",
            Self::In => "in",
            Self::Instanceof => "instanceof",
        }
    }

    pub fn from_token(op: &str) -> Option<Self> {
        Some(match op {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "**" => Self::Pow,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "===" => Self::StrictEq,
            "!==" => Self::StrictNotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "&" => Self::BitAnd,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            ">>>" => Self::UShr,
            "&&" => Self::And,
            "||" => Self::Or,
            "??" => Self::NullishCoalesce,
            "in" => Self::In,
            "instanceof" => Self::Instanceof,
            _ => return None,
        })
    }

    /// `&&`, `||` and `??` (ESTree `LogicalExpression`).
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::NullishCoalesce)
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,        // =
    AddAssign,     // +=
    SubAssign,     // -=
    MulAssign,     // *=
    DivAssign,     // /=
    ModAssign,     // %=
    PowAssign,     // **=
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    UShrAssign,    // >>>=
    BitOrAssign,   // |=
    BitXorAssign,  // ^=
    BitAndAssign,  // &=
    AndAssign,     // &&=
    OrAssign,      // ||=
    NullishAssign, // ??=
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::PowAssign => "**=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::UShrAssign => ">>>=",
            Self::BitOrAssign => "|=",
            Self::BitXorAssign => "^=",
            Self::BitAndAssign => "&=",
            Self::AndAssign => "&&=",
            Self::OrAssign => "||=",
            Self::NullishAssign => "??=",
        }
    }

    pub fn from_token(op: &str) -> Option<Self> {
        Some(match op {
            "=" => Self::Assign,
            "+=" => Self::AddAssign,
            "-=" => Self::SubAssign,
            "*=" => Self::MulAssign,
            "/=" => Self::DivAssign,
            "%=" => Self::ModAssign,
            "**=" => Self::PowAssign,
            "<<=" => Self::ShlAssign,
            ">>=" => Self::ShrAssign,
            ">>>=" => Self::UShrAssign,
            "|=" => Self::BitOrAssign,
            "^=" => Self::BitXorAssign,
            "&=" => Self::BitAndAssign,
            "&&=" => Self::AndAssign,
            "||=" => Self::OrAssign,
            "??=" => Self::NullishAssign,
            _ => return None,
        })
    }
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================
//
// Shorthand for building trees by hand (tests, benches, embedders that
// already hold a parsed tree in another shape). Spans are left empty.

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()), Span::default())
    }

    pub fn number(value: f64) -> Self {
        Self::new(ExprKind::Number(value), Span::default())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::String(value.into()), Span::default())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::default(),
        )
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::new(
            ExprKind::Assign {
                op: AssignOp::Assign,
                target: Box::new(target),
                value: Box::new(value),
            },
            Span::default(),
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            Span::default(),
        )
    }

    /// Arrow function with a concise expression body.
    pub fn arrow(params: &[&str], body: Expr) -> Self {
        let arrow = ArrowFunction {
            params: params.iter().map(|p| Param::new(*p)).collect(),
            body: ArrowBody::Expr(Box::new(body)),
            span: Span::default(),
        };
        Self::new(ExprKind::Arrow(Box::new(arrow)), Span::default())
    }
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr), Span::default())
    }

    /// Single-declarator declaration group.
    pub fn var(kind: VarKind, name: impl Into<String>, init: Option<Expr>) -> Self {
        let decl = VarDecl {
            kind,
            decls: vec![VarDeclarator {
                name: name.into(),
                init,
                span: Span::default(),
            }],
        };
        Self::new(StmtKind::Var(decl), Span::default())
    }

    pub fn function(name: impl Into<String>, params: &[&str], body: Vec<Stmt>) -> Self {
        let func = Function {
            name: Some(name.into()),
            params: params.iter().map(|p| Param::new(*p)).collect(),
            body,
            span: Span::default(),
        };
        Self::new(StmtKind::Function(Box::new(func)), Span::default())
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block(stmts), Span::default())
    }

    pub fn if_else(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Self {
        Self::new(
            StmtKind::If {
                test,
                consequent: Box::new(consequent),
                alternate: alternate.map(Box::new),
            },
            Span::default(),
        )
    }

    pub fn ret(arg: Option<Expr>) -> Self {
        Self::new(StmtKind::Return { arg }, Span::default())
    }
}
