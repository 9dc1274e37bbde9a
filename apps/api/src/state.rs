use std::sync::Arc;

use crate::report::DocumentAssembler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the report configuration, the image placer and the decoded logo.
    pub assembler: Arc<DocumentAssembler>,
}
