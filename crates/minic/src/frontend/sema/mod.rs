//! Semantic analysis module
//!
//! This module resolves identifiers, infers and checks types, and inserts
//! implicit conversions.

mod scope;
mod analyzer;

pub use scope::{IdentDescriptor, Scope, ScopeKind};
pub use analyzer::{semantic_check, SemanticAnalyzer};
