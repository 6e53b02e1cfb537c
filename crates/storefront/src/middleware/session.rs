//! Session middleware configuration.
//!
//! Sets up sessions using tower-sessions over the configured save handler.

use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::session::SaveHandler;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "minicart_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over the configured save handler.
///
/// # Arguments
///
/// * `store` - Session save handler
/// * `config` - Storefront configuration (for cookie security)
#[must_use]
pub fn create_session_layer(
    store: SaveHandler,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SaveHandler> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
