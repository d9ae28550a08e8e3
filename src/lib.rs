//! Typed Rust client for the legacy FCM HTTP send API.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for wire-format concerns (payload building, response decoding), and a
//! small client layer orchestrating one HTTPS POST per send. A send's
//! positional per-recipient results are reconciled back onto the request's
//! recipient list and grouped by outcome: failures by reason, canonical-id
//! updates, and accepted message ids.
//!
//! ```rust,no_run
//! use fcm_legacy::{ApiKey, FcmClient, Fields, MessageOptions, RegistrationId, SendMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fcm_legacy::FcmError> {
//!     let client = FcmClient::new(ApiKey::new("...")?);
//!     let request = SendMessage::to(
//!         RegistrationId::new("device-token")?,
//!         MessageOptions {
//!             data: Some(Fields::new().with("k", "v")),
//!             ..Default::default()
//!         },
//!     );
//!     let report = client.send_data(request).await?;
//!     if let Some(success) = report.success {
//!         for (recipient, message_id) in success {
//!             println!("{} -> {}", recipient.as_str(), message_id);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{FcmClient, FcmClientBuilder, FcmError};
pub use domain::{
    ApiKey, CollapseKey, ErrorGroup, ErrorReason, FieldValue, Fields, KnownErrorReason,
    MessageOptions, Priority, RecipientResult, RegistrationId, SEND_MAX_RECIPIENTS, SendMessage,
    SendReport, SendResponse, Target, TtlSeconds, ValidationError,
};
