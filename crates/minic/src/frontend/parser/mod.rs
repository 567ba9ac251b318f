//! Recursive descent parser building the AST arena

#[allow(clippy::module_inception)]
mod parser;

pub use parser::{parse, Parser};
