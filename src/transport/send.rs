use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{
    ErrorGroup, ErrorReason, RecipientResult, RegistrationId, SendReport, SendResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response carries {actual} results for {expected} recipients")]
    ResultCountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Deserialize)]
struct SendJsonResponse {
    #[serde(default)]
    multicast_id: Option<i64>,
    #[serde(default)]
    success: Option<u64>,
    #[serde(default)]
    failure: Option<u64>,
    #[serde(default)]
    canonical_ids: Option<u64>,
    #[serde(default)]
    results: Vec<ResultJsonEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResultJsonEntry {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    registration_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub fn decode_send_json_response(json: &str) -> Result<SendResponse, TransportError> {
    let parsed: SendJsonResponse = serde_json::from_str(json)?;
    Ok(SendResponse {
        multicast_id: parsed.multicast_id,
        success: parsed.success,
        failure: parsed.failure,
        canonical_ids: parsed.canonical_ids,
        results: parsed
            .results
            .into_iter()
            .map(|entry| RecipientResult {
                message_id: entry.message_id,
                registration_id: entry.registration_id,
                error: entry.error,
            })
            .collect(),
    })
}

/// Pair each recipient with its positional result and group outcomes by kind.
///
/// The provider reports results in request order, so the two sequences must
/// have the same length; a mismatch is an error rather than silent
/// truncation on the shorter side.
pub fn reconcile(
    recipients: &[RegistrationId],
    response: &SendResponse,
) -> Result<SendReport, TransportError> {
    if recipients.len() != response.results.len() {
        return Err(TransportError::ResultCountMismatch {
            expected: recipients.len(),
            actual: response.results.len(),
        });
    }

    let mut errors = Vec::<ErrorGroup>::new();
    let mut canonical = BTreeMap::<RegistrationId, String>::new();
    let mut success = BTreeMap::<RegistrationId, String>::new();

    for (recipient, result) in recipients.iter().zip(&response.results) {
        if let Some(reason) = result.error.as_deref() {
            match errors
                .iter_mut()
                .find(|group| group.reason.as_str() == reason)
            {
                Some(group) => group.registration_ids.push(recipient.clone()),
                None => errors.push(ErrorGroup {
                    reason: ErrorReason::new(reason),
                    registration_ids: vec![recipient.clone()],
                }),
            }
        }
        if let Some(new_id) = result.registration_id.as_ref() {
            canonical.insert(recipient.clone(), new_id.clone());
        }
        if let Some(message_id) = result.message_id.as_ref() {
            success.insert(recipient.clone(), message_id.clone());
        }
    }

    Ok(SendReport {
        errors: (!errors.is_empty()).then_some(errors),
        canonical: (!canonical.is_empty()).then_some(canonical),
        success: (!success.is_empty()).then_some(success),
    })
}
