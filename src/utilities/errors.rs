use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Numerical,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlsError {
    #[error("too few points: got {got}, need at least {min}")]
    TooFewPoints { got: usize, min: usize },
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("non-finite {field} at index {index}")]
    InvalidNumericValue { field: &'static str, index: usize },
    #[error("positions must be strictly increasing (index {index})")]
    UnorderedPositions { index: usize },
    #[error("length mismatch: {left} vs {right}")]
    MismatchedLengths { left: usize, right: usize },
    #[error("singular matrix at pivot column {column}")]
    SingularMatrix { column: usize },
    #[error("transform length {0} is not a power of two")]
    NotPowerOfTwo(usize),
    #[error("invalid spline knots: {0}")]
    InvalidKnots(&'static str),
    #[error("parse error: {0}")]
    Parse(String),
}

impl AlsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedMethod(_) | Self::InvalidParameter { .. } => ErrorKind::Configuration,
            Self::SingularMatrix { .. } | Self::NotPowerOfTwo(_) | Self::InvalidKnots(_) => {
                ErrorKind::Numerical
            }
            Self::TooFewPoints { .. }
            | Self::InvalidNumericValue { .. }
            | Self::UnorderedPositions { .. }
            | Self::MismatchedLengths { .. }
            | Self::Parse(_) => ErrorKind::Validation,
        }
    }
}

impl From<serde_json::Error> for AlsError {
    fn from(e: serde_json::Error) -> Self {
        AlsError::Parse(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("plan line is empty")]
    EmptyPlanLine,
    #[error("non-finite {field} at index {index}")]
    InvalidNumericValue { field: &'static str, index: usize },
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for OptimizerError {
    fn from(e: serde_json::Error) -> Self {
        OptimizerError::Parse(e.to_string())
    }
}
