use mongodb::error::{Error, ErrorKind as DriverErrorKind, WriteFailure};
use sirang::errors::{ErrorKind, SirangError};

const DUPLICATE_KEY: i32 = 11000;

/// Maps a driver error onto a sirang error kind, logging it on the way.
pub(crate) fn map_driver_error(context: &str, err: Error) -> SirangError {
    let kind = match err.kind.as_ref() {
        DriverErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            ErrorKind::IdCollision
        }
        DriverErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY => {
            ErrorKind::IdCollision
        }
        DriverErrorKind::ServerSelection { .. }
        | DriverErrorKind::Io(_)
        | DriverErrorKind::DnsResolve { .. }
        | DriverErrorKind::ConnectionPoolCleared { .. }
        | DriverErrorKind::Authentication { .. } => ErrorKind::ConnectionFailure,
        DriverErrorKind::InvalidArgument { .. } => ErrorKind::InvalidConfiguration,
        _ => ErrorKind::BackendError,
    };

    log::error!("{}: {}", context, err);
    SirangError::new(&format!("{}: {}", context, err), kind)
}
