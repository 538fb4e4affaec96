//! # Visitor Screens
//!
//! Each browser session gets its own `CartScreen`, so checkout state of one
//! buyer never leaks into another's. The session cookie only carries a
//! visitor id; screens idle longer than the session expiry are dropped.

use crate::state::AppConfig;
use cart_core::CartScreen;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "cart_session";

/// Session key holding the visitor id
const VISITOR_KEY: &str = "visitor_id";

/// Session expiry time in seconds (30 minutes of inactivity)
pub const SESSION_EXPIRY_SECONDS: i64 = 30 * 60;

/// A visitor's screen; callbacks of one visitor are serialized
pub type SharedScreen = Arc<AsyncMutex<CartScreen>>;

/// Builds a fresh screen for a new visitor
pub type ScreenFactory = Arc<dyn Fn() -> CartScreen + Send + Sync>;

struct Entry {
    screen: SharedScreen,
    last_seen: Instant,
}

/// Screens keyed by visitor id
pub struct ScreenRegistry {
    factory: ScreenFactory,
    idle_timeout: Duration,
    screens: Mutex<HashMap<String, Entry>>,
}

impl ScreenRegistry {
    pub fn new(factory: ScreenFactory, idle_timeout: Duration) -> Self {
        Self {
            factory,
            idle_timeout,
            screens: Mutex::new(HashMap::new()),
        }
    }

    /// The visitor's screen, created on first use
    pub fn screen(&self, visitor_id: &str) -> SharedScreen {
        let now = Instant::now();
        let mut screens = self.screens.lock().unwrap_or_else(PoisonError::into_inner);

        let before = screens.len();
        screens.retain(|id, entry| {
            id == visitor_id || now.duration_since(entry.last_seen) < self.idle_timeout
        });
        if screens.len() < before {
            tracing::debug!("Dropped {} idle cart screens", before - screens.len());
        }

        let entry = screens.entry(visitor_id.to_string()).or_insert_with(|| Entry {
            screen: Arc::new(AsyncMutex::new((self.factory)())),
            last_seen: now,
        });
        entry.last_seen = now;
        entry.screen.clone()
    }

    /// Number of live screens
    pub fn len(&self) -> usize {
        self.screens.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visitor id stored in the session, assigned on first request
pub async fn visitor_id(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(id) = session.get::<String>(VISITOR_KEY).await? {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    session.insert(VISITOR_KEY, &id).await?;
    Ok(id)
}

/// Create the session layer with an in-memory store.
///
/// Cookies are marked secure when the service is served over HTTPS.
pub fn create_session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
