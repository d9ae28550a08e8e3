use crate::domain::fields::Fields;
use crate::domain::validation::ValidationError;
use crate::domain::value::{CollapseKey, Priority, RegistrationId, TtlSeconds};

/// Maximum number of registration ids per send request.
pub const SEND_MAX_RECIPIENTS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Recipient addressing: one token (`to`) or an ordered list
/// (`registration_ids`).
pub enum Target {
    Single(RegistrationId),
    Many(Vec<RegistrationId>),
}

impl Target {
    /// Wire field name for a single recipient (`to`).
    pub const TO_FIELD: &'static str = "to";
    /// Wire field name for a recipient list (`registration_ids`).
    pub const IDS_FIELD: &'static str = "registration_ids";
}

#[derive(Debug, Clone, Default)]
/// Optional message content and provider options.
///
/// `extra` carries provider-specific fields this crate does not recognize;
/// they are serialized as-is without validation.
pub struct MessageOptions {
    pub data: Option<Fields>,
    pub notification: Option<Fields>,
    pub collapse_key: Option<CollapseKey>,
    pub priority: Option<Priority>,
    pub content_available: bool,
    pub mutable_content: bool,
    pub delay_while_idle: bool,
    pub time_to_live: Option<TtlSeconds>,
    pub restricted_package_name: Option<String>,
    pub dry_run: bool,
    pub extra: Fields,
}

#[derive(Debug, Clone)]
/// One send request: recipient addressing plus message content.
pub struct SendMessage {
    target: Target,
    options: MessageOptions,
}

impl SendMessage {
    /// Address a single recipient token.
    pub fn to(recipient: RegistrationId, options: MessageOptions) -> Self {
        Self {
            target: Target::Single(recipient),
            options,
        }
    }

    /// Address an ordered list of recipient tokens.
    ///
    /// The list must be non-empty. The 1000-recipient cap is enforced when
    /// the payload is built, before any network I/O.
    pub fn to_many(
        recipients: Vec<RegistrationId>,
        options: MessageOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: Target::IDS_FIELD,
            });
        }
        Ok(Self {
            target: Target::Many(recipients),
            options,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    /// The ordered recipient sequence this request addresses.
    ///
    /// A single `to` target is treated as a one-element sequence, which is
    /// also how responses are reconciled against it.
    pub fn recipients(&self) -> &[RegistrationId] {
        match &self.target {
            Target::Single(recipient) => std::slice::from_ref(recipient),
            Target::Many(recipients) => recipients,
        }
    }
}
