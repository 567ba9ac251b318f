//! Language frontend
//!
//! The frontend is responsible for:
//! 1. Lexing source text into tokens
//! 2. Parsing tokens into the AST arena
//! 3. Semantic analysis: identifier resolution, type inference and
//!    implicit conversion insertion

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::CompileResult;

pub use ast::{dump, Ast, Child, Node, NodeId, NodeKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, Parser};
pub use sema::{semantic_check, IdentDescriptor, Scope, ScopeKind, SemanticAnalyzer};

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// Build a global scope from a bootstrap program.
///
/// Every identifier the bootstrap declares is marked built-in and the
/// global variable counter restarts at 0, so built-ins never take index
/// slots from user globals. An empty bootstrap yields an empty scope.
pub fn prepare_global_scope(bootstrap: &str) -> CompileResult<Scope> {
    let mut ast = parse(bootstrap)?;
    let mut scope = Scope::new();
    semantic_check(&mut ast, &mut scope)?;
    scope.mark_built_ins();
    Ok(scope)
}
