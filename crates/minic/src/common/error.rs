//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::{Position, Span};
use crate::types::{BinaryOp, DataType};

/// Compile error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at offset {}: {message}", .span.start)]
    Lexer { message: String, span: Span },

    #[error("Syntax error at offset {}: {message}", .span.start)]
    Syntax { message: String, span: Span },

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Byte offset of the offending input, when the error has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            CompileError::Lexer { span, .. } | CompileError::Syntax { span, .. } => Some(span.start),
            CompileError::Semantic(e) => e.span.map(|s| s.start),
            CompileError::Io(_) => None,
        }
    }

    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            CompileError::Semantic(e) => Some(e),
            _ => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

fn type_list(types: &[DataType]) -> String {
    types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn identifier_noun(function: &bool) -> &'static str {
    if *function { "function" } else { "identifier" }
}

/// What went wrong during semantic analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticErrorKind {
    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("unrecognized literal '{0}'")]
    UnrecognizedLiteral(String),

    #[error("identifier '{0}' is not declared")]
    UndefinedIdentifier(String),

    #[error("{} '{name}' is already declared", identifier_noun(.function))]
    DuplicateIdentifier { name: String, function: bool },

    #[error("parameter '{0}' is already declared")]
    DuplicateParameter(String),

    #[error("operator {op} is not applicable to ({left}, {right})")]
    OperatorNotApplicable {
        op: BinaryOp,
        left: DataType,
        right: DataType,
    },

    #[error("identifier '{0}' is not a function")]
    NotAFunction(String),

    #[error("wrong number of arguments for '{function}' (expected {expected}, got {actual})")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Every argument is checked before this is raised; `failed` lists the
    /// positions whose types could not be converted
    #[error(
        "argument types ({}) of '{function}' do not match and cannot be converted to the declared parameter types ({})",
        type_list(.actual),
        type_list(.expected)
    )]
    ArgumentTypesMismatch {
        function: String,
        expected: Vec<DataType>,
        actual: Vec<DataType>,
        failed: Vec<usize>,
    },

    #[error("cannot assign a value of type {from} to a target of type {to}")]
    IncompatibleAssignment { from: DataType, to: DataType },

    #[error("cannot return a value of type {from} from a function returning {to}")]
    IncompatibleReturn { from: DataType, to: DataType },

    #[error("return is only allowed inside a function")]
    ReturnOutsideFunction,

    #[error("condition of type {0} cannot be converted to bool")]
    ConditionNotBoolConvertible(DataType),

    #[error("nested function '{0}' is not supported")]
    NestedFunctionNotSupported(String),
}

/// Semantic error with the position of the node that raised it
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub position: Option<Position>,
    pub span: Option<Span>,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, position: Option<Position>) -> Self {
        Self {
            kind,
            position,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn row(&self) -> Option<usize> {
        self.position.map(|p| p.row)
    }

    pub fn col(&self) -> Option<usize> {
        self.position.map(|p| p.col)
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(position) = self.position {
            write!(f, " ({})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for SemanticError {}

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the diagnostic for `error` without emitting it
    pub fn diagnostic(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Syntax { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Semantic(e) => {
                let diagnostic = Diagnostic::error().with_message("Semantic error");
                match e.span {
                    Some(span) => diagnostic.with_labels(vec![
                        Label::primary(file_id, span.start..span.end).with_message(e.kind.to_string())
                    ]),
                    None => diagnostic.with_notes(vec![e.to_string()]),
                }
            }

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = Self::diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
