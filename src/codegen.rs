/// # C99 code generation
///
/// Turns named vectors of symbolic expressions into a `.c`/`.h` pair. Every
/// routine becomes one function taking its scalar arguments as `double` plus
/// an output pointer:
///
/// ```c
/// void surface(double u, double v, double *out) {
///
///    out[0] = ...;
///
/// }
/// ```
///# Example
/// ```rust, ignore
/// let routine = Routine::new("surface", &["u", "v"], derivation.position.clone())?;
/// let generator = CCodeGen::new("renderer", "surface", vec![routine])?;
/// let paths = generator.write_files(Path::new("."))?;
/// ```
pub mod c_generator;
/// expression printer producing C99 source with `math.h` calls
pub mod c_printer;
#[cfg(test)]
mod codegen_tests;

pub use c_generator::{CCodeGen, Routine};
pub use c_printer::ccode;

use std::fmt;

/// Errors raised while generating or writing C code
#[derive(Debug)]
pub enum CodegenError {
    /// routine or argument name is not a usable C identifier
    InvalidIdentifier(String),
    /// two routines share a name
    DuplicateRoutine(String),
    /// an expression of the routine uses a symbol that is not one of its arguments
    UnboundSymbol { routine: String, symbol: String },
    /// inf and NaN have no C99 literal
    NonFiniteConstant(f64),
    Io(std::io::Error),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodegenError::InvalidIdentifier(name) => {
                write!(f, "'{}' is not a valid C identifier", name)
            }
            CodegenError::DuplicateRoutine(name) => {
                write!(f, "routine '{}' is defined more than once", name)
            }
            CodegenError::UnboundSymbol { routine, symbol } => write!(
                f,
                "symbol '{}' used in routine '{}' is not among its arguments",
                symbol, routine
            ),
            CodegenError::NonFiniteConstant(val) => {
                write!(f, "constant {} cannot be written as a C literal", val)
            }
            CodegenError::Io(err) => write!(f, "failed to write generated code: {}", err),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodegenError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodegenError {
    fn from(err: std::io::Error) -> Self {
        CodegenError::Io(err)
    }
}
