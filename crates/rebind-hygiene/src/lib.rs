//! rebind-hygiene: hygienic renaming for JavaScript
//!
//! Turns a JavaScript syntax tree into source text in which every
//! declared identifier has a globally unique name, so the output can be
//! concatenated with or injected into other code without accidental
//! capture or shadowing.
//!
//! # Pipeline
//!
//! 1. **Load**: ESTree JSON (as produced by acorn and friends) becomes a
//!    [`Program`] via [`program_from_str`].
//! 2. **Hoist**: on entering a block, its own `var`/`let`/`const` and
//!    function declarations are bound before anything is rendered.
//! 3. **Resolve**: each identifier reference is looked up through the
//!    scope chain; free names (globals) pass through unchanged.
//! 4. **Emit**: the tree is rendered as text with every declaration
//!    rewritten to `name + separator + counter`.
//!
//! # Limitations
//!
//! - Free names are never renamed, and minted names are not checked
//!   against them. A global that already looks generated (say `a$0`) is
//!   captured by a declaration that mints the same name. Pick a separator
//!   that does not occur in the input's free names.
//! - The separator must be non-empty and must not end with a digit;
//!   [`TranspileOptions`] does not validate it.
//! - Only the first declarator of `let a = 1, b = 2;` is rendered.
//!
//! # Example
//!
//! ```
//! use rebind_hygiene::{transform, Expr, Program, Stmt, VarKind};
//!
//! let program = Program::new(vec![
//!     Stmt::var(VarKind::Const, "a", Some(Expr::number(1.0))),
//!     Stmt::block(vec![Stmt::var(VarKind::Const, "a", Some(Expr::number(2.0)))]),
//! ]);
//! let js = transform(&program).unwrap();
//! assert_eq!(js, "const a$0 = 1;\n{\n  const a$1 = 2;\n}\n");
//! ```

mod ast;
mod context;
mod error;
mod estree;
mod hoist;
mod names;
mod scope;
mod span;
mod transpile;

pub use ast::*;
pub use context::HygieneContext;
pub use error::{LoadError, TranspileError};
pub use estree::{program_from_str, program_from_value};
pub use hoist::{hoist, hoisted_name};
pub use names::{NameGenerator, DEFAULT_SEPARATOR};
pub use scope::{Scope, ScopeChain, ScopeId};
pub use span::Span;
pub use transpile::{transform, transform_with, TranspileOptions, Transpiler};
