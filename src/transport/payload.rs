use crate::domain::{
    CollapseKey, FieldValue, Fields, Priority, SEND_MAX_RECIPIENTS, SendMessage, Target,
    TtlSeconds, ValidationError,
};

const DATA_FIELD: &str = "data";
const NOTIFICATION_FIELD: &str = "notification";

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

type Validator = fn(&FieldValue) -> Result<(), ValidationError>;

/// Per-field validators, keyed by wire field name. Fields without an entry
/// pass through unvalidated.
const FIELD_VALIDATORS: &[(&str, Validator)] = &[(Target::IDS_FIELD, validate_registration_ids)];

fn field_validator(field: &str) -> Option<Validator> {
    FIELD_VALIDATORS
        .iter()
        .find_map(|(name, validator)| (*name == field).then_some(*validator))
}

fn validate_registration_ids(value: &FieldValue) -> Result<(), ValidationError> {
    if let FieldValue::List(ids) = value {
        if ids.len() > SEND_MAX_RECIPIENTS {
            return Err(ValidationError::TooManyRecipients {
                max: SEND_MAX_RECIPIENTS,
                actual: ids.len(),
            });
        }
    }
    Ok(())
}

fn validate_fields(fields: &Fields) -> Result<(), ValidationError> {
    for (key, value) in fields.iter() {
        if let Some(validate) = field_validator(key) {
            validate(value)?;
        }
    }
    Ok(())
}

/// Assemble the wire field set for a send request.
///
/// Unrecognized `extra` fields are inserted last and may override recognized
/// ones; collisions are the caller's responsibility.
pub fn message_fields(request: &SendMessage) -> Fields {
    let mut fields = Fields::new();

    match request.target() {
        Target::Single(recipient) => fields.insert(Target::TO_FIELD, recipient.as_str()),
        Target::Many(recipients) => fields.insert(
            Target::IDS_FIELD,
            recipients
                .iter()
                .map(|id| FieldValue::from(id.as_str()))
                .collect::<Vec<_>>(),
        ),
    }

    let options = request.options();
    if let Some(collapse_key) = options.collapse_key.as_ref() {
        fields.insert(CollapseKey::FIELD, collapse_key.as_str());
    }
    if let Some(priority) = options.priority {
        fields.insert(Priority::FIELD, priority.as_str());
    }
    if options.content_available {
        fields.insert("content_available", true);
    }
    if options.mutable_content {
        fields.insert("mutable_content", true);
    }
    if options.delay_while_idle {
        fields.insert("delay_while_idle", true);
    }
    if let Some(ttl) = options.time_to_live {
        fields.insert(TtlSeconds::FIELD, ttl.value());
    }
    if let Some(package) = options.restricted_package_name.as_ref() {
        fields.insert("restricted_package_name", package.as_str());
    }
    if options.dry_run {
        fields.insert("dry_run", true);
    }
    if let Some(notification) = options.notification.as_ref() {
        fields.insert(NOTIFICATION_FIELD, notification.clone());
    }
    if let Some(data) = options.data.as_ref() {
        fields.insert(DATA_FIELD, data.clone());
    }
    for (key, value) in options.extra.iter() {
        fields.insert(key, value.clone());
    }

    fields
}

/// Serialize a send request as one JSON object for data/notification sends.
pub fn encode_json_payload(request: &SendMessage) -> Result<String, PayloadError> {
    let fields = message_fields(request);
    validate_fields(&fields)?;
    Ok(serde_json::to_string(&fields)?)
}

/// Encode a send request as flat form parameters for plain-text sends.
///
/// The `data` map is flattened into top-level `data.<key>` entries and
/// removed; list values are comma-joined and nested maps are JSON-encoded.
pub fn encode_plain_text_form(
    request: &SendMessage,
) -> Result<Vec<(String, String)>, PayloadError> {
    let mut fields = message_fields(request);
    validate_fields(&fields)?;

    let data = fields.remove(DATA_FIELD);

    let mut params = Vec::<(String, String)>::new();
    for (key, value) in fields.iter() {
        params.push((key.to_owned(), form_value(value)?));
    }
    if let Some(FieldValue::Map(data)) = data {
        for (key, value) in data.iter() {
            params.push((format!("{DATA_FIELD}.{key}"), form_value(value)?));
        }
    }

    Ok(params)
}

fn form_value(value: &FieldValue) -> Result<String, PayloadError> {
    Ok(match value {
        FieldValue::Str(value) => value.clone(),
        FieldValue::Number(value) => value.to_string(),
        FieldValue::Bool(value) => value.to_string(),
        FieldValue::List(values) => values
            .iter()
            .map(form_value)
            .collect::<Result<Vec<_>, _>>()?
            .join(","),
        FieldValue::Map(fields) => serde_json::to_string(fields)?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{MessageOptions, RegistrationId};

    use super::*;

    fn token(value: &str) -> RegistrationId {
        RegistrationId::new(value).unwrap()
    }

    fn tokens(count: usize) -> Vec<RegistrationId> {
        (0..count).map(|idx| token(&format!("token-{idx}"))).collect()
    }

    #[test]
    fn json_payload_for_single_recipient() {
        let options = MessageOptions {
            data: Some(Fields::new().with("k", "v")),
            dry_run: true,
            ..Default::default()
        };
        let request = SendMessage::to(token("token-1"), options);

        let payload = encode_json_payload(&request).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            decoded,
            json!({
                "to": "token-1",
                "dry_run": true,
                "data": {"k": "v"},
            })
        );
    }

    #[test]
    fn json_payload_round_trips_full_field_set() {
        let options = MessageOptions {
            data: Some(Fields::new().with("score", 5_i64).with("event", "goal")),
            notification: Some(Fields::new().with("title", "Update").with("body", "5-0")),
            collapse_key: Some(CollapseKey::new("score_update").unwrap()),
            priority: Some(Priority::High),
            content_available: true,
            time_to_live: Some(TtlSeconds::new(3600).unwrap()),
            extra: Fields::new().with("custom_flag", "on"),
            ..Default::default()
        };
        let request =
            SendMessage::to_many(vec![token("token-1"), token("token-2")], options).unwrap();

        let payload = encode_json_payload(&request).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            decoded,
            json!({
                "registration_ids": ["token-1", "token-2"],
                "collapse_key": "score_update",
                "priority": "high",
                "content_available": true,
                "time_to_live": 3600,
                "notification": {"title": "Update", "body": "5-0"},
                "data": {"score": 5, "event": "goal"},
                "custom_flag": "on",
            })
        );
    }

    #[test]
    fn recipient_cap_is_enforced_before_serialization() {
        let request =
            SendMessage::to_many(tokens(SEND_MAX_RECIPIENTS), MessageOptions::default()).unwrap();
        assert!(encode_json_payload(&request).is_ok());

        let request = SendMessage::to_many(tokens(SEND_MAX_RECIPIENTS + 1), MessageOptions::default())
            .unwrap();
        let err = encode_json_payload(&request).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Validation(ValidationError::TooManyRecipients {
                max: SEND_MAX_RECIPIENTS,
                actual,
            }) if actual == SEND_MAX_RECIPIENTS + 1
        ));
    }

    #[test]
    fn recipient_cap_applies_to_passthrough_fields_too() {
        let smuggled = (0..(SEND_MAX_RECIPIENTS + 1))
            .map(|idx| FieldValue::from(format!("token-{idx}")))
            .collect::<Vec<_>>();
        let options = MessageOptions {
            extra: Fields::new().with(Target::IDS_FIELD, smuggled),
            ..Default::default()
        };
        let request = SendMessage::to(token("token-1"), options);

        let err = encode_json_payload(&request).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Validation(ValidationError::TooManyRecipients { .. })
        ));
    }

    #[test]
    fn plain_text_form_flattens_data_fields() {
        let options = MessageOptions {
            data: Some(Fields::new().with("k", "v").with("count", 2_i64)),
            collapse_key: Some(CollapseKey::new("update").unwrap()),
            ..Default::default()
        };
        let request = SendMessage::to(token("token-1"), options);

        let params = encode_plain_text_form(&request).unwrap();
        assert_eq!(
            params,
            vec![
                ("to".to_owned(), "token-1".to_owned()),
                ("collapse_key".to_owned(), "update".to_owned()),
                ("data.k".to_owned(), "v".to_owned()),
                ("data.count".to_owned(), "2".to_owned()),
            ]
        );
        assert!(!params.iter().any(|(key, _)| key == "data"));
    }

    #[test]
    fn plain_text_form_joins_recipient_lists() {
        let request = SendMessage::to_many(
            vec![token("token-1"), token("token-2")],
            MessageOptions::default(),
        )
        .unwrap();

        let params = encode_plain_text_form(&request).unwrap();
        assert_eq!(
            params,
            vec![("registration_ids".to_owned(), "token-1,token-2".to_owned())]
        );
    }

    #[test]
    fn unlisted_fields_pass_through_unvalidated() {
        let options = MessageOptions {
            extra: Fields::new()
                .with("anything", "goes")
                .with("numeric", 7_i64),
            ..Default::default()
        };
        let request = SendMessage::to(token("token-1"), options);

        let payload = encode_json_payload(&request).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(decoded["anything"], "goes");
        assert_eq!(decoded["numeric"], 7);
    }
}
