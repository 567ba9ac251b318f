//! Implicit conversion and operator compatibility tables
//!
//! Both tables are declared explicitly. A conversion edge is a single
//! directed hop; `int -> string` is listed on its own, it is not derived
//! from `int -> double -> string`. Order inside each row matters: the
//! analyzer takes the first target that satisfies an operator.

use super::{BinaryOp, DataType, PrimitiveType};
use PrimitiveType::{Bool, Double, Int, Str};

static CONVERSIONS: &[(PrimitiveType, &[PrimitiveType])] = &[
    (Int, &[Double, Bool, Str]),
    (Double, &[Str]),
    (Bool, &[Str]),
];

type Row = &'static [((PrimitiveType, PrimitiveType), PrimitiveType)];

static ARITHMETIC: Row = &[
    ((Int, Int), Int),
    ((Double, Double), Double),
    ((Int, Double), Double),
    ((Double, Int), Double),
];

static ADDITION: Row = &[
    ((Int, Int), Int),
    ((Double, Double), Double),
    ((Str, Str), Str),
    ((Int, Double), Double),
    ((Double, Int), Double),
];

static COMPARISON: Row = &[
    ((Int, Int), Bool),
    ((Double, Double), Bool),
    ((Str, Str), Bool),
];

static BITWISE: Row = &[((Int, Int), Int)];

static LOGICAL: Row = &[((Bool, Bool), Bool)];

fn compatibility(op: BinaryOp) -> Row {
    match op {
        BinaryOp::Add => ADDITION,
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => ARITHMETIC,
        BinaryOp::Gt | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Le | BinaryOp::Eq | BinaryOp::Ne => {
            COMPARISON
        }
        BinaryOp::BitAnd | BinaryOp::BitOr => BITWISE,
        BinaryOp::LogAnd | BinaryOp::LogOr => LOGICAL,
    }
}

/// Conversion targets of `from`, in declaration order
pub fn conversions_from(from: PrimitiveType) -> &'static [PrimitiveType] {
    CONVERSIONS
        .iter()
        .find(|(source, _)| *source == from)
        .map(|(_, targets)| *targets)
        .unwrap_or_default()
}

/// Whether a value of type `from` may be wrapped in a conversion to `to`.
/// Only simple types take part; identical types need no conversion and
/// are not reported here.
pub fn can_convert(from: &DataType, to: &DataType) -> bool {
    match (from.primitive(), to.primitive()) {
        (Some(from), Some(to)) => conversions_from(from).contains(&to),
        _ => false,
    }
}

/// Result type of `left op right` for an exact operand pair
pub fn binary_result(op: BinaryOp, left: PrimitiveType, right: PrimitiveType) -> Option<PrimitiveType> {
    compatibility(op)
        .iter()
        .find(|(operands, _)| *operands == (left, right))
        .map(|(_, result)| *result)
}
