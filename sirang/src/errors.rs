use backtrace::Backtrace;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for sirang operations.
///
/// Each kind names a category of failure so callers can react to, for example,
/// a rejected duplicate `_id` differently from an unreachable store.
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::errors::{SirangError, ErrorKind, SirangResult};
///
/// fn example() -> SirangResult<()> {
///     Err(SirangError::new("git is not installed", ErrorKind::ProvenanceUnavailable))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The document store could not be reached
    ConnectionFailure,
    /// The source-control revision could not be determined
    ProvenanceUnavailable,
    /// The document store rejected a duplicate `_id`
    IdCollision,
    /// A wrapped function was used against its declared contract
    ContractViolation,
    /// The provided id is invalid
    InvalidId,
    /// An id template does not contain exactly one positional slot
    InvalidTemplate,
    /// A configuration value is invalid or was set after opening
    InvalidConfiguration,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Error encoding or decoding a value for the store
    EncodingError,
    /// Error from the storage backend
    BackendError,
    /// Generic IO error
    IOError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionFailure => write!(f, "Connection failure"),
            ErrorKind::ProvenanceUnavailable => write!(f, "Provenance unavailable"),
            ErrorKind::IdCollision => write!(f, "Id collision"),
            ErrorKind::ContractViolation => write!(f, "Contract violation"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidTemplate => write!(f, "Invalid template"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom sirang error type.
///
/// `SirangError` carries a message, an [ErrorKind] and an optional cause, and
/// captures a backtrace at construction for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::errors::{SirangError, ErrorKind};
///
/// let cause = SirangError::new("connection refused", ErrorKind::IOError);
/// let err = SirangError::new_with_cause(
///     "Failed to reach document store",
///     ErrorKind::ConnectionFailure,
///     cause,
/// );
/// ```
#[derive(Clone)]
pub struct SirangError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<SirangError>>,
    backtrace: Arc<RwLock<Backtrace>>,
}

impl SirangError {
    /// Creates a new `SirangError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        SirangError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(RwLock::new(Backtrace::new())),
        }
    }

    /// Creates a new `SirangError` with a cause error.
    ///
    /// The cause is preserved so the whole chain shows up in `Debug` output
    /// and through [Error::source].
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: SirangError) -> Self {
        SirangError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(RwLock::new(Backtrace::new())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&SirangError> {
        self.cause.as_deref()
    }
}

impl Display for SirangError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for SirangError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for SirangError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for sirang operations.
///
/// `SirangResult<T>` is shorthand for `Result<T, SirangError>`.
pub type SirangResult<T> = Result<T, SirangError>;

impl From<std::io::Error> for SirangError {
    fn from(err: std::io::Error) -> Self {
        SirangError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<std::string::FromUtf8Error> for SirangError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SirangError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for SirangError {
    fn from(msg: String) -> Self {
        SirangError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for SirangError {
    fn from(msg: &str) -> Self {
        SirangError::new(msg, ErrorKind::InternalError)
    }
}
