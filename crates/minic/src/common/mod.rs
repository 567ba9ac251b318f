//! Common infrastructure shared across the front end

mod error;
mod span;

pub use error::{
    CompileError, CompileResult, DiagnosticReporter, SemanticError, SemanticErrorKind,
    SemanticResult,
};
pub use span::{LineMap, Position, Span};
