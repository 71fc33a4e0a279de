//! The scope chain.
//!
//! Frames live in an arena and refer to their parent by index. Because
//! frames are strictly nested (entered and left in LIFO order), the arena
//! doubles as the stack: the current frame is always the last one, and
//! leaving a scope drops it.

use crate::names::NameGenerator;
use rustc_hash::FxHashMap;

/// Handle of a frame in the [`ScopeChain`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The root frame, present for the whole transform.
    pub const ROOT: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One level of lexical nesting.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    /// Mapping from original name → unique name.
    bindings: FxHashMap<String, String>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            bindings: FxHashMap::default(),
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// The unique name bound directly in this frame, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Stack of live scope frames. Always holds at least the root.
#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    /// A chain holding only the (empty) root frame.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None)],
        }
    }

    /// Handle of the current (innermost) frame.
    pub fn current(&self) -> ScopeId {
        ScopeId((self.scopes.len() - 1) as u32)
    }

    /// Number of live frames, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    /// Enter a new frame nested in the current one.
    pub fn push(&mut self) -> ScopeId {
        let parent = self.current();
        self.scopes.push(Scope::new(Some(parent)));
        self.current()
    }

    /// Leave the current frame.
    ///
    /// The root frame is never popped: at depth one this returns `None`
    /// and leaves the chain untouched.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() <= 1 {
            return None;
        }
        self.scopes.pop()
    }

    /// Bind `name` in the current frame.
    ///
    /// Idempotent per frame: a name already bound directly in the current
    /// frame keeps its existing unique name. Bindings in outer frames are
    /// shadowed, not reused.
    pub fn declare(&mut self, name: &str, names: &mut NameGenerator) -> String {
        let idx = self.current().index();
        let scope = &mut self.scopes[idx];
        if let Some(existing) = scope.bindings.get(name) {
            return existing.clone();
        }
        let unique = names.fresh(name);
        scope.bindings.insert(name.to_string(), unique.clone());
        unique
    }

    /// Look `name` up from the current frame outward.
    ///
    /// Unbound names are free references and come back unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = Some(self.current());
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(unique) = scope.get(name) {
                return unique;
            }
            current = scope.parent;
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_idempotent_in_one_frame() {
        let mut chain = ScopeChain::new();
        let mut names = NameGenerator::default();
        let first = chain.declare("f", &mut names);
        let again = chain.declare("f", &mut names);
        assert_eq!(first, again);
        assert_eq!(names.count(), 1);
    }

    #[test]
    fn test_nested_declare_shadows() {
        let mut chain = ScopeChain::new();
        let mut names = NameGenerator::default();
        let outer = chain.declare("a", &mut names);
        chain.push();
        let inner = chain.declare("a", &mut names);
        assert_ne!(outer, inner);
        assert_eq!(chain.resolve("a"), inner);
        chain.pop();
        assert_eq!(chain.resolve("a"), outer);
    }

    #[test]
    fn test_resolve_walks_to_parents() {
        let mut chain = ScopeChain::new();
        let mut names = NameGenerator::default();
        let outer = chain.declare("x", &mut names);
        chain.push();
        chain.push();
        assert_eq!(chain.resolve("x"), outer);
    }

    #[test]
    fn test_free_name_resolves_to_itself() {
        let mut chain = ScopeChain::new();
        chain.push();
        assert_eq!(chain.resolve("console"), "console");
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut chain = ScopeChain::new();
        let mut names = NameGenerator::default();
        let root_name = chain.declare("a", &mut names);
        assert!(chain.pop().is_none());
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.resolve("a"), root_name);
    }

    #[test]
    fn test_depth_and_parent_handles() {
        let mut chain = ScopeChain::new();
        assert_eq!(chain.current(), ScopeId::ROOT);
        let child = chain.push();
        let grandchild = chain.push();
        assert_eq!(chain.depth(), 3);
        assert_eq!(chain.scope(grandchild).and_then(Scope::parent), Some(child));
        assert_eq!(chain.scope(child).and_then(Scope::parent), Some(ScopeId::ROOT));
        assert!(chain.scope(ScopeId::ROOT).and_then(Scope::parent).is_none());
    }

    #[test]
    fn test_popped_frame_bindings_are_gone() {
        let mut chain = ScopeChain::new();
        let mut names = NameGenerator::default();
        chain.push();
        chain.declare("tmp", &mut names);
        let popped = chain.pop().unwrap();
        assert_eq!(popped.len(), 1);
        assert_eq!(chain.resolve("tmp"), "tmp");
    }
}
