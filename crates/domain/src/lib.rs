//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit_event;

pub use audit_event::{
    AuditEvent, AuditEventId, AuditEventInput, NO_REQUEST_ID, RequestContext, UNKNOWN,
    format_event_timestamp,
};
