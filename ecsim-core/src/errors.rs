use crate::timeseries::Time;
use thiserror::Error;

/// Error type for parameter processing and evaluation.
#[derive(Error, Debug)]
pub enum ECSimError {
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("Cyclic parameter definition: {}", .0.join(" -> "))]
    CyclicParameterDefinition(Vec<String>),
    #[error("Unresolved reference to '{0}'. Process the expression before evaluating it")]
    UnresolvedReference(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Function '{name}' takes at most {expected} argument(s), got {got}")]
    InvalidArguments {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Invalid current function: {0}")]
    InvalidCurrentFunction(String),
    #[error("Cannot evaluate at non-finite time {0}")]
    NonFiniteTime(Time),
    #[error("Extrapolation is not allowed. Target={0}, interpolation range=[{1}, {2}]")]
    ExtrapolationNotAllowed(Time, Time, Time),
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),
    #[error("Invalid parameter configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Could not write parameter configuration: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, ECSimError>`.
pub type ECSimResult<T> = Result<T, ECSimError>;
