//! minic - front end for a small C-like language
//!
//! This library turns source text into an annotated syntax tree: it
//! resolves identifiers, infers and checks types, and inserts explicit
//! conversion nodes where a value is implicitly converted.
//!
//! ## Architecture
//!
//! The crate is organized into:
//! - **Common** (`common/`): Shared infrastructure (errors, spans, line map)
//! - **Types** (`types/`): Primitive and function types, conversion and
//!   operator compatibility tables
//! - **Frontend** (`frontend/`): Lexer, parser, AST arena and semantic
//!   analysis
//! - **Driver** (`driver/`): Pipeline glue used by the command-line tool

pub mod common;
pub mod types;
pub mod frontend;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Position, SemanticError, SemanticErrorKind, Span};
pub use driver::Pipeline;
pub use frontend::{dump, parse, prepare_global_scope, semantic_check, Ast, FrontendConfig, NodeId, NodeKind, Scope};
pub use types::{DataType, PrimitiveType};
