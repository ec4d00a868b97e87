use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A non-callable value was given where a class or handler is required.
    /// Raised before any mutation takes place.
    InvalidArgument(String),
    /// An attempt to invoke something that is not a callable object. Silent
    /// lookup misses surface here, at the call, never at the lookup.
    NotCallable(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidArgument(m) => write!(f, "invalid argument: {}", m),
            EngineError::NotCallable(m) => write!(f, "not callable: {}", m),
        }
    }
}

impl Error for EngineError {}
