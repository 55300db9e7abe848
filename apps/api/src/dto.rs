use auditrail_domain::AuditEvent;
use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Acknowledgment returned once an audit event is persisted.
#[derive(Debug, Serialize)]
pub struct IngestEventResponse {
    pub ok: bool,
    pub event_id: String,
    pub ts: String,
    pub request_id: String,
    pub actor: String,
    pub action: String,
    pub resource: String,
}

impl From<&AuditEvent> for IngestEventResponse {
    fn from(event: &AuditEvent) -> Self {
        Self {
            ok: true,
            event_id: event.id().to_string(),
            ts: event.formatted_timestamp(),
            request_id: event.request_id().to_owned(),
            actor: event.actor().to_owned(),
            action: event.action().to_owned(),
            resource: event.resource().to_owned(),
        }
    }
}
