use std::sync::Arc;

use services::{Clock, DeckSource};
use storage::repository::KeyValueStore;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn deck_source(&self) -> Arc<dyn DeckSource>;
    fn progress_store(&self) -> Arc<dyn KeyValueStore>;
    fn clock(&self) -> Clock;
}

#[derive(Clone)]
pub struct AppContext {
    deck_source: Arc<dyn DeckSource>,
    progress_store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            deck_source: app.deck_source(),
            progress_store: app.progress_store(),
            clock: app.clock(),
        }
    }

    #[must_use]
    pub fn deck_source(&self) -> Arc<dyn DeckSource> {
        Arc::clone(&self.deck_source)
    }

    #[must_use]
    pub fn progress_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.progress_store)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
