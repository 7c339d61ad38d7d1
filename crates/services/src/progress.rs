use std::sync::Arc;

use benki_core::model::{CardId, ProgressKey, ProgressRecord, ProgressStats};
use storage::repository::{KeyValueStore, ProgressRepository};
use tracing::warn;

use crate::Clock;

/// Store-backed study progress for one deck.
///
/// Every mutation is written through before it returns. Storage failures never
/// reach the caller: a record that cannot be read starts empty, and a write
/// that fails is logged and dropped while the in-memory record stays current.
pub struct ProgressTracker {
    key: ProgressKey,
    record: ProgressRecord,
    repo: ProgressRepository,
    clock: Clock,
}

impl ProgressTracker {
    /// Open the progress record for `deck_name`, creating an empty one if
    /// nothing usable is stored.
    pub async fn open(store: Arc<dyn KeyValueStore>, deck_name: &str, clock: Clock) -> Self {
        let key = ProgressKey::for_deck(deck_name);
        let repo = ProgressRepository::new(store);
        let record = match repo.load(&key).await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::default(),
            Err(err) => {
                warn!(key = %key, error = %err, "failed to load progress; starting empty");
                ProgressRecord::default()
            }
        };

        Self {
            key,
            record,
            repo,
            clock,
        }
    }

    #[must_use]
    pub fn key(&self) -> &ProgressKey {
        &self.key
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Record the size of the deck being studied.
    pub async fn init(&mut self, total_cards: usize) {
        self.record
            .initialize(u32::try_from(total_cards).unwrap_or(u32::MAX));
        self.save().await;
    }

    pub async fn mark_seen(&mut self, id: &CardId) {
        self.record.mark_seen(id, self.clock.now_millis());
        self.save().await;
    }

    pub async fn mark_correct(&mut self, id: &CardId) {
        self.record.mark_correct(id, self.clock.now_millis());
        self.save().await;
    }

    pub async fn mark_incorrect(&mut self, id: &CardId) {
        self.record.mark_incorrect(id, self.clock.now_millis());
        self.save().await;
    }

    pub async fn reset(&mut self) {
        self.record.reset();
        self.save().await;
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.record.stats()
    }

    #[must_use]
    pub fn is_seen(&self, id: &str) -> bool {
        self.record.is_seen(id)
    }

    #[must_use]
    pub fn is_correct(&self, id: &str) -> bool {
        self.record.is_correct(id)
    }

    #[must_use]
    pub fn is_incorrect(&self, id: &str) -> bool {
        self.record.is_incorrect(id)
    }

    async fn save(&self) {
        if let Err(err) = self.repo.save(&self.key, &self.record).await {
            warn!(key = %self.key, error = %err, "failed to save progress");
        }
    }
}
