//! Transport-agnostic outcome of a distribution operation.
//!
//! Every service call reports a `(status, message, code)` triple. Callers map
//! the [`StatusCode`] onto their transport; the numbers follow HTTP so the
//! mapping is the identity for web front ends.
use strum::{AsRefStr, Display};

/// Coarse outcome of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Status {
    Success,
    Error,
}

/// Machine-readable result code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    Created,
    BadRequest,
    NotFound,
    Internal,
    Unavailable,
}

impl StatusCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
            Self::Unavailable => 503,
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.as_u16())
    }
}

/// The `(status, message, code)` triple returned by every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistributionStatus {
    pub status: Status,
    pub message: String,
    pub code: StatusCode,
}

impl DistributionStatus {
    pub fn success(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            code,
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Status triple plus the operation's payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ServiceReply<T> {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub status: DistributionStatus,
    pub payload: T,
}

impl<T> ServiceReply<T> {
    pub fn new(status: DistributionStatus, payload: T) -> Self {
        Self { status, payload }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
