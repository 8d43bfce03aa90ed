//! Scalar type variants.
//!
//! Scalars are the leaves of the type graph. Both runtimes share a carrier
//! for every scalar (numbers are numbers, strings are strings), so a scalar
//! never needs conversion at the boundary.

use serde::Serialize;

/// Scalar type variants
///
/// Following Chalk's pattern, scalar types are consolidated into one enum
/// rather than separate term variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Scalar {
    /// The unit type (`()` in the native runtime, `undefined`-like on the host)
    Unit,

    /// Boolean type
    Bool,

    /// Integer type
    Int,

    /// Floating-point type
    Float,

    /// String type
    String,
}

impl Scalar {
    /// Returns true if this scalar is a numeric type (Int or Float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int | Scalar::Float)
    }

    /// Name used when displaying types.
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::Unit => "unit",
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::String => "string",
        }
    }
}
