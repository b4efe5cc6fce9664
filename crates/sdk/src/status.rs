//! Link error codes
//!
//! Every link export returns one of these as a raw `u32`.

/// Result code of a link call
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsError {
    Success = 0,
    /// Core is not initialised
    NotInitialised = 1,
    /// Core is already initialised
    AlreadyInitialised = 2,
    /// Given handle is invalid
    InvalidHandle = 3,
    /// Maximum number of frame senders have been created
    MaxSendersReached = 4,
    BadStreamType = 5,
    NotFound = 6,
    IncorrectSchema = 7,
    Unspecified = 8,
}

impl RsError {
    /// Convert a raw return code, `None` if it is not a known code
    pub const fn from_raw(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::NotInitialised),
            2 => Some(Self::AlreadyInitialised),
            3 => Some(Self::InvalidHandle),
            4 => Some(Self::MaxSendersReached),
            5 => Some(Self::BadStreamType),
            6 => Some(Self::NotFound),
            7 => Some(Self::IncorrectSchema),
            8 => Some(Self::Unspecified),
            _ => None,
        }
    }

    /// Check for the success code
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
