use std::io;
use thiserror::Error;

/// Request-level error codes. The numeric values follow the classic
/// `net::Error` table so they can be logged next to other network errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetError {
    #[error("net::ERR_FAILED")]
    Failed,

    #[error("net::ERR_ABORTED")]
    Aborted,

    #[error("net::ERR_FILE_NOT_FOUND")]
    FileNotFound,

    #[error("net::ERR_ACCESS_DENIED")]
    AccessDenied,

    #[error("net::ERR_INVALID_URL")]
    InvalidUrl,

    #[error("net::ERR_UNKNOWN_URL_SCHEME")]
    UnknownUrlScheme,
}

impl NetError {
    pub fn code(&self) -> i32 {
        match self {
            NetError::Failed => -2,
            NetError::Aborted => -3,
            NetError::FileNotFound => -6,
            NetError::AccessDenied => -10,
            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
        }
    }

    pub fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => NetError::FileNotFound,
            io::ErrorKind::PermissionDenied => NetError::AccessDenied,
            _ => NetError::Failed,
        }
    }
}

impl From<io::Error> for NetError {
    fn from(error: io::Error) -> Self {
        NetError::from_io(&error)
    }
}
