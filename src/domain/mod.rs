//! Domain layer: strong types with validation and invariants (no I/O).

mod fields;
mod request;
mod response;
mod validation;
mod value;

pub use fields::{FieldValue, Fields};
pub use request::{MessageOptions, SEND_MAX_RECIPIENTS, SendMessage, Target};
pub use response::{ErrorGroup, RecipientResult, SendReport, SendResponse};
pub use validation::ValidationError;
pub use value::{
    ApiKey, CollapseKey, ErrorReason, KnownErrorReason, Priority, RegistrationId, TtlSeconds,
};
