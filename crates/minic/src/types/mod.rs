//! Structural type system
//!
//! Primitive and function types plus the two tables that drive implicit
//! conversion: which primitive converts to which, and which operand pairs
//! each binary operator accepts.

mod data_type;
mod operator;
mod conversion;

pub use data_type::{DataType, PrimitiveType, UnknownType};
pub use operator::BinaryOp;
pub use conversion::{binary_result, can_convert, conversions_from};
