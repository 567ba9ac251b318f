//! Primitive and data types

use std::fmt;
use thiserror::Error;

/// Built-in primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Void,
    Int,
    Double,
    Bool,
    Str,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 5] = [
        PrimitiveType::Void,
        PrimitiveType::Int,
        PrimitiveType::Double,
        PrimitiveType::Bool,
        PrimitiveType::Str,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Int => "int",
            PrimitiveType::Double => "double",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Str => "string",
        }
    }

    /// Look up a primitive by its source spelling
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that does not denote any primitive type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown type '{0}'")]
pub struct UnknownType(pub String);

/// Type of an expression or identifier.
///
/// Equality is structural: function types compare return type and the
/// parameter list element-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Simple(PrimitiveType),
    Function {
        params: Vec<DataType>,
        return_type: Box<DataType>,
    },
}

/// Canonical simple types, indexed in `PrimitiveType::ALL` order
static SIMPLE_TYPES: [DataType; 5] = [
    DataType::Simple(PrimitiveType::Void),
    DataType::Simple(PrimitiveType::Int),
    DataType::Simple(PrimitiveType::Double),
    DataType::Simple(PrimitiveType::Bool),
    DataType::Simple(PrimitiveType::Str),
];

impl DataType {
    /// Shared instance of the simple type wrapping `primitive`
    pub fn of(primitive: PrimitiveType) -> &'static DataType {
        match primitive {
            PrimitiveType::Void => &SIMPLE_TYPES[0],
            PrimitiveType::Int => &SIMPLE_TYPES[1],
            PrimitiveType::Double => &SIMPLE_TYPES[2],
            PrimitiveType::Bool => &SIMPLE_TYPES[3],
            PrimitiveType::Str => &SIMPLE_TYPES[4],
        }
    }

    pub fn void() -> &'static DataType {
        Self::of(PrimitiveType::Void)
    }

    pub fn bool() -> &'static DataType {
        Self::of(PrimitiveType::Bool)
    }

    pub fn function(params: Vec<DataType>, return_type: DataType) -> DataType {
        DataType::Function {
            params,
            return_type: Box::new(return_type),
        }
    }

    /// Resolve a type name written in source
    pub fn from_name(name: &str) -> Result<&'static DataType, UnknownType> {
        PrimitiveType::from_name(name)
            .map(Self::of)
            .ok_or_else(|| UnknownType(name.to_string()))
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, DataType::Simple(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, DataType::Function { .. })
    }

    /// Wrapped primitive of a simple type
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            DataType::Simple(p) => Some(*p),
            DataType::Function { .. } => None,
        }
    }

    pub fn params(&self) -> &[DataType] {
        match self {
            DataType::Function { params, .. } => params,
            DataType::Simple(_) => &[],
        }
    }

    pub fn return_type(&self) -> Option<&DataType> {
        match self {
            DataType::Function { return_type, .. } => Some(return_type),
            DataType::Simple(_) => None,
        }
    }
}

impl From<PrimitiveType> for DataType {
    fn from(primitive: PrimitiveType) -> Self {
        DataType::of(primitive).clone()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Simple(p) => write!(f, "{}", p),
            DataType::Function { params, return_type } => {
                write!(f, "{} (", return_type)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                f.write_str(")")
            }
        }
    }
}
