use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[macro_export]
macro_rules! create_epgsieve_error {
    ($kind:expr, $($arg:tt)*) => {
        $crate::epgsieve_error::EpgsieveError::new($kind, format!($($arg)*))
    };
}

pub use create_epgsieve_error;

#[macro_export]
macro_rules! create_epgsieve_error_result {
    ($kind:expr, $($arg:tt)*) => {
        Err($crate::epgsieve_error::EpgsieveError::new($kind, format!($($arg)*)))
    };
}

pub use create_epgsieve_error_result;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EpgsieveErrorKind {
    /// Missing or unusable configuration, fatal.
    Config,
    /// Fetch failure or non-success status, fatal and never retried.
    Transport,
    /// Malformed guide document, fatal.
    Parse,
    /// Empty playlist, fatal. An empty match result is not an error.
    NoContent,
    /// Output file or directory cannot be written, fatal.
    Io,
}

#[derive(Debug)]
pub struct EpgsieveError {
    pub kind: EpgsieveErrorKind,
    pub message: String,
}

impl EpgsieveError {
    pub const fn new(kind: EpgsieveErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl Display for EpgsieveError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "Epgsieve error: {}", self.message)
    }
}

impl Error for EpgsieveError {}
