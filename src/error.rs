use miette::Diagnostic;
use nalgebra::RealField;

/// General error for device geometry validation problems
///
/// Raised at construction time: a run whose geometry fails validation can
/// never be started, so none of these are recoverable.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum GeometryError {
    /// A layer or barrier thickness was not strictly positive
    #[error("{0}")]
    Thickness(String),
    /// A relative dielectric constant was not strictly positive
    #[error("{0}")]
    DielectricConstant(String),
    /// The gate contact area was not strictly positive
    #[error("{0}")]
    ContactArea(String),
    /// The barrier height or tunnelling mass was not strictly positive
    #[error("{0}")]
    Barrier(String),
    /// The device file does not describe a four-layer stack
    #[error("{0}")]
    Stack(String),
}

/// Failure modes of the Fowler-Nordheim current evaluation
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum CurrentError<T: RealField> {
    /// The exponent in the current law diverges as the net field approaches zero,
    /// so an exactly-zero field has no defined current density
    #[error("tunnelling field is exactly zero")]
    #[diagnostic(code(tunneller::zero_field))]
    ZeroField,
    /// The exponential term left the representable range for the working precision
    #[error("current density is not finite at a field of {0:?} V/m")]
    #[diagnostic(code(tunneller::overflow))]
    Overflow(T),
}
