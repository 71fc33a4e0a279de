//! Per-transform state: the scope chain and the name generator.
//!
//! A context is created fresh for every transform call and dropped at its
//! end. Nothing is shared between contexts, so independent transforms can
//! run on different threads.

use crate::names::NameGenerator;
use crate::scope::{ScopeChain, ScopeId};
use tracing::trace;

/// Caller-owned renaming state.
#[derive(Debug, Default)]
pub struct HygieneContext {
    scopes: ScopeChain,
    names: NameGenerator,
}

impl HygieneContext {
    /// A context with only the root frame and the counter at zero.
    pub fn new(separator: &str) -> Self {
        Self {
            scopes: ScopeChain::new(),
            names: NameGenerator::new(separator),
        }
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn names(&self) -> &NameGenerator {
        &self.names
    }

    /// Bind a declaration site in the current frame.
    pub fn declare(&mut self, name: &str) -> String {
        let unique = self.scopes.declare(name, &mut self.names);
        trace!(original = name, unique = %unique, depth = self.scopes.depth(), "declare");
        unique
    }

    /// Text for an identifier used as a value.
    pub fn resolve_reference(&self, name: &str) -> String {
        self.scopes.resolve(name).to_string()
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        let id = self.scopes.push();
        trace!(depth = self.scopes.depth(), "enter scope");
        id
    }

    pub fn exit_scope(&mut self) {
        let popped = self.scopes.pop().is_some();
        debug_assert!(popped, "attempted to pop the root scope");
        trace!(depth = self.scopes.depth(), "exit scope");
    }
}
