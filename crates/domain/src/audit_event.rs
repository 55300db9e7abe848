//! Audit event entity and the defaulting rules applied to caller input.
//!
//! Every persisted field is always populated: missing or unusable input is
//! replaced by a sentinel instead of a null.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Sentinel used for `actor`, `action`, `resource` and `source_ip` when absent.
pub const UNKNOWN: &str = "unknown";

/// Sentinel used when the invoking platform supplied no correlation id.
pub const NO_REQUEST_ID: &str = "no-request-id";

/// Text columns cannot hold NUL, so it is stored as U+FFFD instead.
fn storable(value: String) -> String {
    if value.contains('\0') {
        value.replace('\0', "\u{FFFD}")
    } else {
        value
    }
}

/// Unique identifier for an audit event, generated at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditEventId(Uuid);

impl AuditEventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AuditEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditEventId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Formats an ingestion instant as ISO-8601 UTC with a `Z` suffix.
#[must_use]
pub fn format_event_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Descriptive fields supplied by the caller, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditEventInput {
    /// Who performed the action.
    pub actor: Option<String>,
    /// What was done.
    pub action: Option<String>,
    /// What it was done to.
    pub resource: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

impl AuditEventInput {
    /// Reads input fields from a raw request body.
    ///
    /// An empty, unparseable or non-object body yields an empty input. Only
    /// string values are taken; any other JSON type counts as absent.
    #[must_use]
    pub fn from_json_slice(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            _ => Self::default(),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        };

        Self {
            actor: text("actor"),
            action: text("action"),
            resource: text("resource"),
            note: text("note"),
        }
    }
}

/// Request metadata observed by the front door.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Caller network address.
    pub source_ip: Option<String>,
    /// Platform-assigned correlation id.
    pub request_id: Option<String>,
}

/// Canonical audit record: who did what to what, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    id: AuditEventId,
    timestamp: DateTime<Utc>,
    actor: String,
    action: String,
    resource: String,
    note: String,
    source_ip: String,
    request_id: String,
}

impl AuditEvent {
    /// Builds a fully populated record, substituting sentinels for missing values.
    #[must_use]
    pub fn record(
        id: AuditEventId,
        timestamp: DateTime<Utc>,
        input: AuditEventInput,
        context: RequestContext,
    ) -> Self {
        Self {
            id,
            timestamp,
            actor: storable(input.actor.unwrap_or_else(|| UNKNOWN.to_owned())),
            action: storable(input.action.unwrap_or_else(|| UNKNOWN.to_owned())),
            resource: storable(input.resource.unwrap_or_else(|| UNKNOWN.to_owned())),
            note: storable(input.note.unwrap_or_default()),
            source_ip: storable(
                context
                    .source_ip
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN.to_owned()),
            ),
            request_id: storable(
                context
                    .request_id
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| NO_REQUEST_ID.to_owned()),
            ),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> AuditEventId {
        self.id
    }

    /// Returns the ingestion instant.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the ingestion instant in its wire format.
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        format_event_timestamp(self.timestamp)
    }

    /// Returns the actor.
    #[must_use]
    pub fn actor(&self) -> &str {
        self.actor.as_str()
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns the resource.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the note, empty when none was supplied.
    #[must_use]
    pub fn note(&self) -> &str {
        self.note.as_str()
    }

    /// Returns the caller address.
    #[must_use]
    pub fn source_ip(&self) -> &str {
        self.source_ip.as_str()
    }

    /// Returns the correlation id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        self.request_id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use super::{
        AuditEvent, AuditEventId, AuditEventInput, NO_REQUEST_ID, RequestContext, UNKNOWN,
        format_event_timestamp,
    };

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn empty_object_defaults_every_field() {
        let event = AuditEvent::record(
            AuditEventId::new(),
            fixed_instant(),
            AuditEventInput::from_json_slice(b"{}"),
            RequestContext::default(),
        );

        assert_eq!(event.actor(), UNKNOWN);
        assert_eq!(event.action(), UNKNOWN);
        assert_eq!(event.resource(), UNKNOWN);
        assert_eq!(event.note(), "");
        assert_eq!(event.source_ip(), UNKNOWN);
        assert_eq!(event.request_id(), NO_REQUEST_ID);
    }

    #[test]
    fn provided_fields_are_kept_verbatim() {
        let input = AuditEventInput::from_json_slice(
            br#"{"actor":"alice","action":"delete","resource":"doc42","note":" why "}"#,
        );

        assert_eq!(input.actor.as_deref(), Some("alice"));
        assert_eq!(input.action.as_deref(), Some("delete"));
        assert_eq!(input.resource.as_deref(), Some("doc42"));
        assert_eq!(input.note.as_deref(), Some(" why "));
    }

    #[test]
    fn non_object_and_invalid_bodies_yield_empty_input() {
        let bodies: [&[u8]; 6] = [b"", b"   ", b"not json", b"[1,2]", b"\"alice\"", b"null"];
        for body in bodies {
            assert_eq!(
                AuditEventInput::from_json_slice(body),
                AuditEventInput::default()
            );
        }
    }

    #[test]
    fn non_string_values_count_as_absent() {
        let input = AuditEventInput::from_json_slice(br#"{"actor":42,"action":null}"#);
        assert_eq!(input.actor, None);
        assert_eq!(input.action, None);
    }

    #[test]
    fn blank_context_values_fall_back_to_sentinels() {
        let event = AuditEvent::record(
            AuditEventId::new(),
            fixed_instant(),
            AuditEventInput::default(),
            RequestContext {
                source_ip: Some(" ".to_owned()),
                request_id: Some(String::new()),
            },
        );

        assert_eq!(event.source_ip(), UNKNOWN);
        assert_eq!(event.request_id(), NO_REQUEST_ID);
    }

    #[test]
    fn timestamp_is_iso8601_utc_with_z_suffix() {
        assert_eq!(
            format_event_timestamp(fixed_instant()),
            "2025-03-14T09:26:53.000000Z"
        );
    }

    #[test]
    fn nul_characters_are_replaced_before_storage() {
        let event = AuditEvent::record(
            AuditEventId::new(),
            fixed_instant(),
            AuditEventInput::from_json_slice(br#"{"actor":"al\u0000ice","note":"a\u0000b"}"#),
            RequestContext {
                source_ip: None,
                request_id: Some("req\u{0}1".to_owned()),
            },
        );

        assert_eq!(event.actor(), "al\u{FFFD}ice");
        assert_eq!(event.note(), "a\u{FFFD}b");
        assert_eq!(event.request_id(), "req\u{FFFD}1");
        assert!(!event.note().contains('\0'));
    }

    proptest! {
        #[test]
        fn string_fields_in_body_survive_defaulting(
            actor in "[^\\x00]*",
            action in "[^\\x00]*",
            resource in "[^\\x00]*",
        ) {
            let body = serde_json::json!({
                "actor": actor,
                "action": action,
                "resource": resource,
            });
            let bytes = serde_json::to_vec(&body).unwrap_or_default();
            let event = AuditEvent::record(
                AuditEventId::new(),
                fixed_instant(),
                AuditEventInput::from_json_slice(&bytes),
                RequestContext::default(),
            );

            prop_assert_eq!(event.actor(), actor.as_str());
            prop_assert_eq!(event.action(), action.as_str());
            prop_assert_eq!(event.resource(), resource.as_str());
            prop_assert_eq!(event.note(), "");
        }

        #[test]
        fn arbitrary_bodies_keep_context_defaults(
            body in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let event = AuditEvent::record(
                AuditEventId::new(),
                fixed_instant(),
                AuditEventInput::from_json_slice(&body),
                RequestContext::default(),
            );

            prop_assert_eq!(event.request_id(), NO_REQUEST_ID);
            prop_assert_eq!(event.source_ip(), UNKNOWN);
        }
    }
}
