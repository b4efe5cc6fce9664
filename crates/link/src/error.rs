//! Error types for link calls and function-table loading

use rsbridge_sdk::RsError;

/// Error returned by a link call
///
/// All variants are transient from the frame loop's point of view: the
/// affected operation is skipped for this tick and retried on the next.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The link library is not loaded or has been shut down
    #[error("Link unavailable")]
    Unavailable,

    #[error("Link not initialised")]
    NotInitialised,

    #[error("Link already initialised")]
    AlreadyInitialised,

    #[error("Invalid handle")]
    InvalidHandle,

    #[error("Maximum number of senders reached")]
    MaxSendersReached,

    #[error("Bad stream type")]
    BadStreamType,

    /// Nothing available, e.g. no frame arrived before the timeout
    #[error("Not found")]
    NotFound,

    /// Requested parameters do not match the schema hash on the controller
    #[error("Incorrect schema")]
    IncorrectSchema,

    #[error("Unspecified link error")]
    Unspecified,

    #[error("Timed out waiting for frame data")]
    Timeout,

    /// Frame data addressed to another asset
    #[error("Frame data for asset {received}, expected {expected}")]
    WrongAsset { expected: u64, received: u64 },

    /// String argument contains an interior nul byte
    #[error("Invalid string argument: {0}")]
    InvalidString(String),

    /// Return code not known to this protocol version
    #[error("Unknown link error code {0}")]
    Code(u32),
}

impl LinkError {
    /// Map a raw return code, `Ok(())` on success
    pub fn check(code: u32) -> Result<(), LinkError> {
        match RsError::from_raw(code) {
            Some(RsError::Success) => Ok(()),
            Some(RsError::NotInitialised) => Err(LinkError::NotInitialised),
            Some(RsError::AlreadyInitialised) => Err(LinkError::AlreadyInitialised),
            Some(RsError::InvalidHandle) => Err(LinkError::InvalidHandle),
            Some(RsError::MaxSendersReached) => Err(LinkError::MaxSendersReached),
            Some(RsError::BadStreamType) => Err(LinkError::BadStreamType),
            Some(RsError::NotFound) => Err(LinkError::NotFound),
            Some(RsError::IncorrectSchema) => Err(LinkError::IncorrectSchema),
            Some(RsError::Unspecified) => Err(LinkError::Unspecified),
            None => Err(LinkError::Code(code)),
        }
    }
}

/// Error type for function-table loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Resolver returned null for a required export
    #[error("Symbol not found: {0}")]
    MissingSymbol(String),

    /// Symbol name was not nul-terminated
    #[error("Invalid symbol name: {0}")]
    InvalidSymbolName(String),

    /// Library speaks a different protocol version
    #[error("Unsupported link version {found_major}.{found_minor}, expected {expected_major}.{expected_minor}")]
    VersionMismatch {
        expected_major: i32,
        expected_minor: i32,
        found_major: i32,
        found_minor: i32,
    },
}
