//! Error types for the tephigram crate.
use thiserror::Error;

/// Error type for the crate.
///
/// Numerical degeneracies, such as a zero pressure or a non-positive mixing ratio handed to the
/// transforms, are not errors. They show up as NaN or infinite values in the results.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum TephiError {
    /// Bad or invalid input, with a description of what was wrong.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The minimum tick for a plot collection is above its numeric bound.
    #[error("Minimum value of {minimum} exceeds maximum threshold {bound}")]
    MinimumExceedsBound {
        /// The requested minimum.
        minimum: f64,
        /// The largest tick that could be generated.
        bound: f64,
    },

    /// The minimum tick for a plot collection is above every explicit tick value.
    #[error("Minimum value of {minimum} exceeds all other values")]
    MinimumExceedsValues {
        /// The requested minimum.
        minimum: f64,
    },

    /// Partitioning the ticks left every plot group empty.
    #[error("The plot collection failed to generate any plot groups")]
    NoPlotGroups,

    /// A family specification with no `(step, zoom)` pairs, or a zero step.
    #[error("Isopleth family specification is empty or has a zero step")]
    EmptySpec,

    /// The diagram anchor is the wrong shape or has an inverted range.
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(&'static str),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, TephiError>;

impl From<strum::ParseError> for TephiError {
    fn from(err: strum::ParseError) -> Self {
        TephiError::InvalidInput(err.to_string())
    }
}
