use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// FCM server key sent as `Authorization: key=<api_key>`.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "api_key" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Opaque device registration token as issued by FCM.
///
/// Invariant: non-empty after trimming. The value is not inspected further;
/// the provider is the only authority on token validity.
pub struct RegistrationId(String);

impl RegistrationId {
    /// Create a validated (non-empty) registration id.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "registration_id",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Collapse key for collapsible messages (`collapse_key`).
///
/// Invariant: non-empty after trimming.
pub struct CollapseKey(String);

impl CollapseKey {
    /// Wire field name (`collapse_key`).
    pub const FIELD: &'static str = "collapse_key";

    /// Create a validated [`CollapseKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated collapse key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Message lifetime in seconds (`time_to_live`).
///
/// Invariant: `0..=2_419_200` (four weeks). Zero means now-or-never delivery.
pub struct TtlSeconds(u32);

impl TtlSeconds {
    /// Wire field name (`time_to_live`).
    pub const FIELD: &'static str = "time_to_live";

    /// Maximum allowed lifetime (four weeks, in seconds).
    pub const MAX: u32 = 2_419_200;

    /// Create a validated TTL value.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::TtlOutOfRange {
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying lifetime in seconds.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery priority (`priority`).
pub enum Priority {
    Normal,
    High,
}

impl Priority {
    /// Wire field name (`priority`).
    pub const FIELD: &'static str = "priority";

    /// Wire representation of the priority value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Per-recipient error reason string as reported by FCM.
///
/// The value is preserved as-is even when the reason is unknown to this crate.
pub struct ErrorReason(String);

impl ErrorReason {
    /// Wrap a reason string from a provider response.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the reason string as provided by FCM.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this reason to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownErrorReason> {
        KnownErrorReason::from_reason(&self.0)
    }

    /// Returns `true` if this reason is considered retryable by the crate.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.known(),
            Some(kind) if kind.is_retryable()
        )
    }

    /// Returns `true` if this reason means the registration id should be
    /// removed from the caller's records.
    pub fn indicates_unregistered(&self) -> bool {
        matches!(
            self.known(),
            Some(kind) if kind.indicates_unregistered()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known per-recipient error reasons of the legacy FCM send API.
///
/// Unknown reasons are preserved as [`ErrorReason`] and return `None` from
/// [`KnownErrorReason::from_reason`].
pub enum KnownErrorReason {
    MissingRegistration,
    InvalidRegistration,
    NotRegistered,
    InvalidPackageName,
    MismatchSenderId,
    MessageTooBig,
    InvalidDataKey,
    InvalidTtl,
    Unavailable,
    InternalServerError,
    DeviceMessageRateExceeded,
    TopicsMessageRateExceeded,
}

impl KnownErrorReason {
    /// Convert a raw FCM reason string into a known variant.
    pub fn from_reason(reason: &str) -> Option<Self> {
        Some(match reason {
            "MissingRegistration" => Self::MissingRegistration,
            "InvalidRegistration" => Self::InvalidRegistration,
            "NotRegistered" => Self::NotRegistered,
            "InvalidPackageName" => Self::InvalidPackageName,
            "MismatchSenderId" => Self::MismatchSenderId,
            "MessageTooBig" => Self::MessageTooBig,
            "InvalidDataKey" => Self::InvalidDataKey,
            "InvalidTtl" => Self::InvalidTtl,
            "Unavailable" => Self::Unavailable,
            "InternalServerError" => Self::InternalServerError,
            "DeviceMessageRateExceeded" => Self::DeviceMessageRateExceeded,
            "TopicsMessageRateExceeded" => Self::TopicsMessageRateExceeded,
            _ => return None,
        })
    }

    /// Whether this reason is likely transient and the send can be retried.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Unavailable
                | Self::InternalServerError
                | Self::DeviceMessageRateExceeded
                | Self::TopicsMessageRateExceeded
        )
    }

    /// Whether this reason means the token is gone and should be dropped.
    pub fn indicates_unregistered(self) -> bool {
        matches!(self, Self::NotRegistered | Self::InvalidRegistration)
    }
}
