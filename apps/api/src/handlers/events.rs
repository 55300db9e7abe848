use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{Extensions, HeaderMap};
use tracing::{error, info};

use crate::dto::IngestEventResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn ingest_event_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
    body: Bytes,
) -> ApiResult<Json<IngestEventResponse>> {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| *address);
    let context = state.request_context.resolve(&headers, peer);
    let request_id = context.request_id.clone();

    let event = state
        .audit_ingest_service
        .ingest(&body, context)
        .await
        .map_err(|failure| {
            error!(
                request_id = request_id.as_deref().unwrap_or_default(),
                secret_reference = state.audit_ingest_service.secret_reference(),
                error = %failure,
                "audit event ingestion failed"
            );
            failure
        })?;

    info!(
        event_id = %event.id(),
        request_id = event.request_id(),
        action = event.action(),
        "audit event recorded"
    );

    Ok(Json(IngestEventResponse::from(&event)))
}
