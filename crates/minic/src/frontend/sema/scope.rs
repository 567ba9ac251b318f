//! Symbol table and scope management
//!
//! Scopes form a parent-linked chain; the scope without a parent is the
//! global scope. Parameters and locals draw their indices from the nearest
//! enclosing function scope, globals from the global scope.

use crate::common::SemanticErrorKind;
use crate::types::DataType;
use std::collections::HashMap;
use std::fmt;

/// Where an identifier lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Param,
    Local,
    Global,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::Param => "param",
            ScopeKind::Local => "local",
            ScopeKind::Global => "global",
        })
    }
}

/// A declared identifier
#[derive(Debug, Clone, PartialEq)]
pub struct IdentDescriptor {
    pub name: String,
    pub ty: DataType,
    pub kind: ScopeKind,
    /// Slot index; meaningful only for non-function identifiers
    pub index: usize,
    pub built_in: bool,
}

impl IdentDescriptor {
    pub fn new(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: ScopeKind::Local,
            index: 0,
            built_in: false,
        }
    }

    pub fn param(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            kind: ScopeKind::Param,
            ..Self::new(name, ty)
        }
    }
}

impl fmt::Display for IdentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, ", self.ty, self.kind)?;
        if self.built_in {
            f.write_str("built-in")
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A scope containing identifiers
#[derive(Debug, Clone, Default)]
pub struct Scope {
    idents: HashMap<String, IdentDescriptor>,
    /// Return type of the function this scope opens, if it opens one
    function: Option<DataType>,
    parent: Option<Box<Scope>>,
    param_index: usize,
    var_index: usize,
}

impl Scope {
    /// Create an empty global scope
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this scope opens a function body
    pub fn is_function(&self) -> bool {
        self.function.is_some()
    }

    /// Return type of the nearest enclosing function, if any
    pub fn current_function(&self) -> Option<&DataType> {
        match (&self.function, &self.parent) {
            (Some(return_type), _) => Some(return_type),
            (None, Some(parent)) => parent.current_function(),
            (None, None) => None,
        }
    }

    pub fn in_function(&self) -> bool {
        self.current_function().is_some()
    }

    /// Push a new child scope
    pub fn push_child(&mut self) {
        let old_scope = std::mem::take(self);
        self.parent = Some(Box::new(old_scope));
    }

    /// Push a child scope that opens a function returning `return_type`
    pub fn push_function(&mut self, return_type: DataType) {
        self.push_child();
        self.function = Some(return_type);
    }

    /// Take the parent scope, replacing self with the parent
    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }

    /// Nearest visible identifier called `name`
    pub fn get_ident(&self, name: &str) -> Option<&IdentDescriptor> {
        if let Some(ident) = self.idents.get(name) {
            Some(ident)
        } else if let Some(parent) = &self.parent {
            parent.get_ident(name)
        } else {
            None
        }
    }

    /// Register `ident` in this scope.
    ///
    /// An explicit `Param` kind is kept; anything else becomes `Local`
    /// inside a function and `Global` outside. A parameter collides only
    /// with another parameter, a local with anything but a global, and a
    /// global with anything. Non-function identifiers receive the next
    /// index of their counter.
    pub fn add_ident(&mut self, mut ident: IdentDescriptor) -> Result<IdentDescriptor, SemanticErrorKind> {
        ident.kind = match ident.kind {
            ScopeKind::Param => ScopeKind::Param,
            _ if self.in_function() => ScopeKind::Local,
            _ => ScopeKind::Global,
        };

        if let Some(existing) = self.get_ident(&ident.name) {
            let collides = match ident.kind {
                ScopeKind::Param => existing.kind == ScopeKind::Param,
                ScopeKind::Local => existing.kind != ScopeKind::Global,
                ScopeKind::Global => true,
            };
            if collides {
                return Err(SemanticErrorKind::DuplicateIdentifier {
                    name: ident.name,
                    function: false,
                });
            }
        }

        if !ident.ty.is_function() {
            ident.index = self.next_index(ident.kind);
        }
        self.idents.insert(ident.name.clone(), ident.clone());
        Ok(ident)
    }

    /// Draw the next index for `kind` from the scope that owns its counter
    fn next_index(&mut self, kind: ScopeKind) -> usize {
        let owns_counter = match kind {
            ScopeKind::Param | ScopeKind::Local => self.is_function() || self.is_global(),
            ScopeKind::Global => self.is_global(),
        };
        if !owns_counter {
            if let Some(parent) = self.parent.as_deref_mut() {
                return parent.next_index(kind);
            }
        }

        let counter = match kind {
            ScopeKind::Param => &mut self.param_index,
            ScopeKind::Local | ScopeKind::Global => &mut self.var_index,
        };
        let index = *counter;
        *counter += 1;
        index
    }

    /// Run `f` on the global scope at the root of the chain
    pub fn with_global<R>(&mut self, f: impl FnOnce(&mut Scope) -> R) -> R {
        match &mut self.parent {
            Some(parent) => parent.with_global(f),
            None => f(self),
        }
    }

    /// Identifiers declared directly in this scope
    pub fn idents(&self) -> impl Iterator<Item = &IdentDescriptor> {
        self.idents.values()
    }

    /// Flag every identifier of this scope as built-in and release the
    /// variable slots they took, so user globals start at index 0
    pub fn mark_built_ins(&mut self) {
        for ident in self.idents.values_mut() {
            ident.built_in = true;
        }
        self.var_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    fn int() -> DataType {
        PrimitiveType::Int.into()
    }

    #[test]
    fn test_globals_take_global_indices() {
        let mut scope = Scope::new();
        let a = scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        let b = scope.add_ident(IdentDescriptor::new("b", int())).unwrap();

        assert_eq!((a.kind, a.index), (ScopeKind::Global, 0));
        assert_eq!((b.kind, b.index), (ScopeKind::Global, 1));
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        scope.push_child();
        scope.push_child();

        assert_eq!(scope.get_ident("a").map(|i| i.kind), Some(ScopeKind::Global));
        assert!(scope.get_ident("missing").is_none());

        assert!(scope.pop_to_parent());
        assert!(scope.pop_to_parent());
        assert!(!scope.pop_to_parent());
        assert!(scope.is_global());
    }

    #[test]
    fn test_nested_block_globals_use_global_counter() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        scope.push_child();
        let b = scope.add_ident(IdentDescriptor::new("b", int())).unwrap();
        scope.pop_to_parent();
        let c = scope.add_ident(IdentDescriptor::new("c", int())).unwrap();

        assert_eq!((b.kind, b.index), (ScopeKind::Global, 1));
        assert_eq!(c.index, 2);
        assert!(scope.get_ident("b").is_none());
    }

    #[test]
    fn test_function_counters_are_independent() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("g", int())).unwrap();
        scope.push_function(int());
        let a = scope.add_ident(IdentDescriptor::param("a", int())).unwrap();
        let b = scope.add_ident(IdentDescriptor::param("b", int())).unwrap();
        scope.push_child();
        let s = scope.add_ident(IdentDescriptor::new("s", int())).unwrap();
        let t = scope.add_ident(IdentDescriptor::new("t", int())).unwrap();

        assert_eq!((a.kind, a.index), (ScopeKind::Param, 0));
        assert_eq!((b.kind, b.index), (ScopeKind::Param, 1));
        assert_eq!((s.kind, s.index), (ScopeKind::Local, 0));
        assert_eq!((t.kind, t.index), (ScopeKind::Local, 1));
        assert_eq!(scope.current_function(), Some(&int()));
    }

    #[test]
    fn test_locals_shadow_globals_only() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("x", int())).unwrap();
        scope.push_function(int());
        scope.add_ident(IdentDescriptor::param("p", int())).unwrap();
        scope.push_child();

        assert!(scope.add_ident(IdentDescriptor::new("x", int())).is_ok());
        assert!(matches!(
            scope.add_ident(IdentDescriptor::new("p", int())),
            Err(SemanticErrorKind::DuplicateIdentifier { name, .. }) if name == "p"
        ));
        scope.push_child();
        assert!(scope.add_ident(IdentDescriptor::new("x", int())).is_err());
    }

    #[test]
    fn test_duplicate_params() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        scope.push_function(int());
        assert!(scope.add_ident(IdentDescriptor::param("a", int())).is_ok());
        assert!(scope.add_ident(IdentDescriptor::param("a", int())).is_err());
    }

    #[test]
    fn test_globals_collide_with_anything() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        scope.push_child();
        assert!(scope.add_ident(IdentDescriptor::new("a", int())).is_err());
    }

    #[test]
    fn test_functions_get_no_index_and_live_in_global() {
        let mut scope = Scope::new();
        scope.push_child();
        scope.push_function(int());

        let func = DataType::function(vec![int()], int());
        let desc = scope
            .with_global(|global| global.add_ident(IdentDescriptor::new("f", func)))
            .unwrap();
        assert_eq!((desc.kind, desc.index), (ScopeKind::Global, 0));

        let v = scope.add_ident(IdentDescriptor::new("v", int())).unwrap();
        assert_eq!(v.index, 0);

        scope.pop_to_parent();
        scope.pop_to_parent();
        assert!(scope.is_global());
        assert!(scope.get_ident("f").is_some());
        let g = scope.add_ident(IdentDescriptor::new("g", int())).unwrap();
        assert_eq!(g.index, 0);
    }

    #[test]
    fn test_mark_built_ins_resets_var_index() {
        let mut scope = Scope::new();
        scope.add_ident(IdentDescriptor::new("pi", PrimitiveType::Double.into())).unwrap();
        scope.mark_built_ins();

        assert!(scope.idents().all(|i| i.built_in));
        let a = scope.add_ident(IdentDescriptor::new("a", int())).unwrap();
        assert_eq!(a.index, 0);
        assert_eq!(scope.get_ident("pi").unwrap().to_string(), "double, global, built-in");
        assert_eq!(a.to_string(), "int, global, 0");
    }
}
