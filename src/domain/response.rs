use std::collections::BTreeMap;

use crate::domain::value::{ErrorReason, RegistrationId};

#[derive(Debug, Clone, PartialEq)]
/// Decoded send response as FCM returns it: top-level counters plus one
/// result per recipient, positionally aligned with the request.
pub struct SendResponse {
    pub multicast_id: Option<i64>,
    pub success: Option<u64>,
    pub failure: Option<u64>,
    pub canonical_ids: Option<u64>,
    pub results: Vec<RecipientResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One entry of the response `results` array.
pub struct RecipientResult {
    pub message_id: Option<String>,
    pub registration_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Per-recipient outcome of a send, grouped by kind.
///
/// A field is `None` when the response contained no entries of that kind;
/// an entirely empty report is possible.
pub struct SendReport {
    /// Failures grouped by error reason, in first-seen order.
    pub errors: Option<Vec<ErrorGroup>>,
    /// Recipients whose token was replaced, mapped to the new canonical id.
    pub canonical: Option<BTreeMap<RegistrationId, String>>,
    /// Recipients that were accepted, mapped to the provider message id.
    pub success: Option<BTreeMap<RegistrationId, String>>,
}

impl SendReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_none() && self.canonical.is_none() && self.success.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// All recipients that failed with the same reason, in first-seen order.
pub struct ErrorGroup {
    pub reason: ErrorReason,
    pub registration_ids: Vec<RegistrationId>,
}
