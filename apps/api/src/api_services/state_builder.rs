use std::sync::Arc;

use auditrail_application::{
    AuditEventStore, AuditIngestService, SecretProvider, SystemEventClock,
};

use crate::api_config::ApiConfig;
use crate::request_context::RequestContextResolver;
use crate::state::AppState;

pub fn build_app_state(
    config: &ApiConfig,
    secret_provider: Arc<dyn SecretProvider>,
    store: Arc<dyn AuditEventStore>,
) -> AppState {
    AppState {
        audit_ingest_service: AuditIngestService::new(
            secret_provider,
            store,
            Arc::new(SystemEventClock::new()),
            config.secret_reference.clone(),
        ),
        request_context: Arc::new(RequestContextResolver::new(
            config.request_id_header.clone(),
            config.trusted_proxies.clone(),
        )),
    }
}
