use std::sync::Arc;

use crate::auth::confirmation::ConfirmationCodeService;
use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: opusdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Confirmation-code service (injected, never a global).
    pub codes: Arc<ConfirmationCodeService>,
    /// SMTP mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
}
