use serde::Serialize;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    ok: bool,
    message: String,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self { ok: false, message }
    }
}
