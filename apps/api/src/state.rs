use std::sync::Arc;

use auditrail_application::AuditIngestService;

use crate::request_context::RequestContextResolver;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub audit_ingest_service: AuditIngestService,
    pub request_context: Arc<RequestContextResolver>,
}
