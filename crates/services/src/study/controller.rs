use std::sync::Arc;

use benki_core::model::{Card, DeckInfo, ProgressStats};
use rand::Rng;
use storage::repository::KeyValueStore;
use tracing::{debug, info};

use crate::Clock;
use crate::deck_loader::{DeckLoader, DeckSource, LoadedDeck};
use crate::error::DeckLoadError;
use crate::progress::ProgressTracker;

use super::navigation::{Face, Navigation};
use super::render::{CardView, StudyStatus, clear_card, render_card};

/// Identifies one load attempt. Only the most recently issued ticket may
/// install a deck; results for older tickets are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed { cards: usize },
    /// A newer load was started before this one finished.
    Stale,
}

/// Drives a study run: which card is showing, which side is up, and the
/// progress events that follow from it.
///
/// Every card that becomes current is rendered and marked seen. All
/// navigation calls are no-ops until a deck is loaded.
pub struct StudyController<V> {
    view: V,
    loader: DeckLoader,
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
    tracker: Option<ProgressTracker>,
    navigation: Option<Navigation>,
    latest_ticket: u64,
}

impl<V: CardView> StudyController<V> {
    #[must_use]
    pub fn new(view: V, store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self {
            view,
            loader: DeckLoader::new(),
            store,
            clock,
            tracker: None,
            navigation: None,
            latest_ticket: 0,
        }
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.navigation.is_some()
    }

    #[must_use]
    pub fn deck_info(&self) -> Option<&DeckInfo> {
        self.is_loaded().then(|| self.loader.deck_info())
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        if self.is_loaded() {
            self.loader.cards()
        } else {
            &[]
        }
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        let navigation = self.navigation?;
        self.loader.cards().get(navigation.position())
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.navigation.map(|n| n.position())
    }

    #[must_use]
    pub fn face(&self) -> Option<Face> {
        self.navigation.map(|n| n.face())
    }

    #[must_use]
    pub fn stats(&self) -> Option<ProgressStats> {
        self.tracker.as_ref().map(ProgressTracker::stats)
    }

    #[must_use]
    pub fn tracker(&self) -> Option<&ProgressTracker> {
        self.tracker.as_ref()
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Fetch and install a deck from `source`.
    ///
    /// # Errors
    ///
    /// Returns the `DeckLoadError` of a failed attempt after showing it in the view.
    pub async fn load(&mut self, source: &dyn DeckSource) -> Result<LoadOutcome, DeckLoadError> {
        let ticket = self.begin_load();
        let result = DeckLoader::fetch(source).await;
        self.finish_load(ticket, result).await
    }

    /// Start a load attempt: the view switches to its loading state and
    /// navigation is disabled until the attempt settles.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.navigation = None;
        self.tracker = None;
        clear_card(&mut self.view);
        self.view.show_loading();
        LoadTicket(self.latest_ticket)
    }

    /// Settle a load attempt with the result of [`DeckLoader::fetch`].
    ///
    /// A result for anything but the latest ticket is dropped untouched.
    ///
    /// # Errors
    ///
    /// Returns the load error (after showing it) when the latest attempt failed.
    pub async fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedDeck, DeckLoadError>,
    ) -> Result<LoadOutcome, DeckLoadError> {
        if ticket.0 != self.latest_ticket {
            debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale deck load"
            );
            return Ok(LoadOutcome::Stale);
        }

        let deck = match result {
            Ok(deck) => deck,
            Err(err) => {
                self.view.show_error(&err.to_string());
                return Err(err);
            }
        };

        let (cards, deck_info) = self.loader.install(deck);
        let count = cards.len();
        let mut tracker =
            ProgressTracker::open(Arc::clone(&self.store), deck_info.name(), self.clock).await;
        tracker.init(count).await;
        info!(deck = self.loader.deck_info().name(), cards = count, "deck loaded");

        self.tracker = Some(tracker);
        self.navigation = Navigation::new(count);
        self.show_current().await;
        Ok(LoadOutcome::Installed { cards: count })
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    pub async fn next(&mut self) {
        let Some(navigation) = self.navigation.as_mut() else {
            return;
        };
        navigation.next();
        self.show_current().await;
    }

    pub async fn previous(&mut self) {
        let Some(navigation) = self.navigation.as_mut() else {
            return;
        };
        navigation.previous();
        self.show_current().await;
    }

    /// Turn the current card over. Returns the side now showing, or `None`
    /// when no deck is loaded.
    pub fn flip(&mut self) -> Option<Face> {
        let face = self.navigation.as_mut()?.flip();
        self.view.set_face(face);
        Some(face)
    }

    /// Shuffle the deck and start again from the first card.
    pub async fn shuffle_deck(&mut self) {
        let Some(navigation) = self.navigation.as_mut() else {
            return;
        };
        self.loader.shuffle();
        navigation.rewind();
        self.show_current().await;
    }

    /// [`StudyController::shuffle_deck`] with a caller-supplied RNG.
    pub async fn shuffle_deck_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(navigation) = self.navigation.as_mut() else {
            return;
        };
        self.loader.shuffle_with(rng);
        navigation.rewind();
        self.show_current().await;
    }

    //
    // ─── PROGRESS ──────────────────────────────────────────────────────────────
    //

    pub async fn mark_current_correct(&mut self) {
        let Some(card) = self.navigation.and_then(|n| self.loader.cards().get(n.position())) else {
            return;
        };
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.mark_correct(card.id()).await;
        }
        self.publish_status();
    }

    pub async fn mark_current_incorrect(&mut self) {
        let Some(card) = self.navigation.and_then(|n| self.loader.cards().get(n.position())) else {
            return;
        };
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.mark_incorrect(card.id()).await;
        }
        self.publish_status();
    }

    /// Clear this deck's progress. Callers confirm with the user first.
    pub async fn reset_progress(&mut self) {
        if self.navigation.is_none() {
            return;
        }
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset().await;
        }
        self.publish_status();
    }

    //
    // ─── RENDERING ─────────────────────────────────────────────────────────────
    //

    async fn show_current(&mut self) {
        let Some(navigation) = self.navigation else {
            return;
        };
        let Some(card) = self.loader.cards().get(navigation.position()) else {
            return;
        };

        render_card(&mut self.view, card, navigation.face());
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.mark_seen(card.id()).await;
        }
        self.publish_status();
    }

    fn publish_status(&mut self) {
        let (Some(navigation), Some(tracker)) = (self.navigation, self.tracker.as_ref()) else {
            return;
        };
        let status = StudyStatus::new(self.loader.deck_info().name(), &navigation, tracker.stats());
        self.view.show_status(&status);
    }
}
