use std::collections::HashMap;
use std::sync::Arc;

use benki_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    CardField, CardView, DeckLoadError, DeckLoader, Face, LoadOutcome, StaticDeckSource,
    StudyController, StudyStatus,
};
use storage::repository::{InMemoryRepository, KeyValueStore};

#[derive(Default)]
struct RecordingView {
    fields: HashMap<CardField, String>,
    face: Face,
    loading: bool,
    error: Option<String>,
    status: Option<StudyStatus>,
    events: usize,
}

impl CardView for RecordingView {
    fn set_text(&mut self, field: CardField, text: &str) {
        self.fields.insert(field, text.to_owned());
        self.events += 1;
    }

    fn set_markup(&mut self, field: CardField, markup: &str) {
        self.fields.insert(field, markup.to_owned());
        self.events += 1;
    }

    fn set_face(&mut self, face: Face) {
        self.face = face;
        self.events += 1;
    }

    fn show_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn show_error(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_owned());
    }

    fn show_status(&mut self, status: &StudyStatus) {
        self.loading = false;
        self.status = Some(status.clone());
    }
}

fn deck_json(name: &str, ids: &[&str]) -> String {
    let cards: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{ "id": "{id}", "front": {{ "text": "{id} **ですね**", "focus": "ですね" }},
                     "back": {{ "meaning": "meaning {id}", "description": "", "rule": "",
                                "nuance": "", "example_translation": "" }}, "tags": [] }}"#
            )
        })
        .collect();
    format!(r#"{{ "name": "{name}", "cards": [{}] }}"#, cards.join(","))
}

fn controller(store: &InMemoryRepository) -> StudyController<RecordingView> {
    StudyController::new(RecordingView::default(), Arc::new(store.clone()), fixed_clock())
}

fn current_id(ctl: &StudyController<RecordingView>) -> String {
    ctl.current_card().expect("loaded").id().to_string()
}

#[tokio::test]
async fn controller_ignores_input_before_load() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);

    ctl.next().await;
    ctl.previous().await;
    ctl.shuffle_deck().await;
    ctl.mark_current_correct().await;
    ctl.reset_progress().await;

    assert_eq!(ctl.flip(), None);
    assert!(!ctl.is_loaded());
    assert!(ctl.current_card().is_none());
    assert!(ctl.cards().is_empty());
    assert_eq!(ctl.view().events, 0);
    assert!(store.get("benki_progress_test_deck").await.unwrap().is_none());
}

#[tokio::test]
async fn load_renders_first_card_and_marks_it_seen() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);

    let outcome = ctl
        .load(&StaticDeckSource::json(deck_json("Test Deck", &["a", "b", "c"])))
        .await
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Installed { cards: 3 });

    let view = ctl.view();
    assert_eq!(view.fields[&CardField::FrontText], "a <strong>ですね</strong>");
    assert_eq!(view.fields[&CardField::Focus], "ですね");
    assert_eq!(view.fields[&CardField::Meaning], "meaning a");
    assert_eq!(view.face, Face::Front);

    let status = view.status.as_ref().unwrap();
    assert_eq!(status.deck_name, "Test Deck");
    assert_eq!(status.counter_label, "1/3");
    assert_eq!(status.stats.seen, 1);
    assert_eq!(status.stats.total, 3);
    assert!(status.can_navigate);

    assert!(ctl.tracker().unwrap().is_seen("a"));
    assert!(store.get("benki_progress_test_deck").await.unwrap().is_some());
}

#[tokio::test]
async fn navigation_wraps_resets_face_and_tracks_seen() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    ctl.load(&StaticDeckSource::json(deck_json("Test Deck", &["a", "b", "c"])))
        .await
        .unwrap();

    assert_eq!(ctl.flip(), Some(Face::Back));
    assert_eq!(ctl.view().face, Face::Back);

    ctl.next().await;
    assert_eq!(current_id(&ctl), "b");
    assert_eq!(ctl.face(), Some(Face::Front));
    assert_eq!(ctl.view().face, Face::Front);

    ctl.previous().await;
    ctl.previous().await;
    assert_eq!(current_id(&ctl), "c");
    assert_eq!(ctl.view().status.as_ref().unwrap().counter_label, "3/3");

    // Revisiting does not count twice.
    ctl.next().await;
    ctl.next().await;
    let stats = ctl.stats().unwrap();
    assert_eq!(stats.seen, 3);
    assert!((stats.percent_seen - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn flip_toggles_back_and_forth() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    ctl.load(&StaticDeckSource::json(deck_json("Flip", &["a"])))
        .await
        .unwrap();

    assert_eq!(ctl.flip(), Some(Face::Back));
    assert_eq!(ctl.flip(), Some(Face::Front));
    assert!(!ctl.view().status.as_ref().unwrap().can_navigate);
}

#[tokio::test]
async fn shuffle_restarts_at_first_card() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    let ids = ["a", "b", "c", "d", "e", "f"];
    ctl.load(&StaticDeckSource::json(deck_json("Shuffle", &ids)))
        .await
        .unwrap();
    ctl.next().await;
    ctl.next().await;
    ctl.flip();

    let mut rng = StdRng::seed_from_u64(3);
    ctl.shuffle_deck_with(&mut rng).await;

    assert_eq!(ctl.position(), Some(0));
    assert_eq!(ctl.face(), Some(Face::Front));
    let first = current_id(&ctl);
    assert!(ctl.tracker().unwrap().is_seen(&first));

    let mut shuffled: Vec<String> = ctl.cards().iter().map(|c| c.id().to_string()).collect();
    shuffled.sort();
    assert_eq!(shuffled, ids);
}

#[tokio::test]
async fn marks_outcomes_for_current_card() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    ctl.load(&StaticDeckSource::json(deck_json("Marks", &["a", "b", "c"])))
        .await
        .unwrap();

    ctl.mark_current_correct().await;
    ctl.next().await;
    ctl.mark_current_correct().await;
    ctl.next().await;
    ctl.mark_current_incorrect().await;

    let status = ctl.view().status.clone().unwrap();
    assert_eq!(status.stats.correct, 2);
    assert_eq!(status.stats.incorrect, 1);
    assert!((status.stats.percent_correct - 66.67).abs() < 0.01);

    ctl.mark_current_correct().await;
    let tracker = ctl.tracker().unwrap();
    assert!(tracker.is_correct("c"));
    assert!(!tracker.is_incorrect("c"));
}

#[tokio::test]
async fn reset_progress_clears_and_keeps_total() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    ctl.load(&StaticDeckSource::json(deck_json("Reset", &["a", "b"])))
        .await
        .unwrap();
    ctl.next().await;
    ctl.mark_current_correct().await;

    ctl.reset_progress().await;

    let stats = ctl.stats().unwrap();
    assert_eq!((stats.seen, stats.correct, stats.total), (0, 0, 2));
    assert_eq!(ctl.tracker().unwrap().record().study_sessions(), 2);
    assert_eq!(ctl.view().status.as_ref().unwrap().stats.seen, 0);
}

#[tokio::test]
async fn progress_survives_a_new_controller() {
    let store = InMemoryRepository::new();
    let deck = deck_json("Persist", &["a", "b", "c"]);

    let mut first = controller(&store);
    first.load(&StaticDeckSource::json(deck.clone())).await.unwrap();
    first.next().await;
    first.mark_current_incorrect().await;

    let mut second = controller(&store);
    second.load(&StaticDeckSource::json(deck)).await.unwrap();
    let tracker = second.tracker().unwrap();
    assert!(tracker.is_seen("a"));
    assert!(tracker.is_incorrect("b"));
    assert_eq!(tracker.record().study_sessions(), 1);
}

#[tokio::test]
async fn failed_load_shows_error_and_disables_navigation() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);
    ctl.load(&StaticDeckSource::json(deck_json("Retry", &["a", "b"])))
        .await
        .unwrap();

    let err = ctl
        .load(&StaticDeckSource::status(404, "Not Found"))
        .await
        .unwrap_err();
    assert!(err.is_fetch());

    let message = ctl.view().error.clone().unwrap();
    assert!(message.contains("404"));
    assert!(!ctl.is_loaded());
    assert_eq!(ctl.flip(), None);
    assert!(ctl.view().fields.values().all(String::is_empty));

    // User-initiated retry.
    ctl.load(&StaticDeckSource::json(deck_json("Retry", &["a", "b"])))
        .await
        .unwrap();
    assert!(ctl.is_loaded());
    assert!(ctl.view().error.is_none());
}

#[tokio::test]
async fn format_and_empty_errors_reach_the_view() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);

    let err = ctl
        .load(&StaticDeckSource::json(r#"{ "name": "Test", "cards": "invalid" }"#))
        .await
        .unwrap_err();
    assert!(matches!(err, DeckLoadError::Format(_)));

    let err = ctl
        .load(&StaticDeckSource::json(r#"{ "name": "Empty", "cards": [] }"#))
        .await
        .unwrap_err();
    assert_eq!(err, DeckLoadError::EmptyDeck);
    assert_eq!(
        ctl.view().error.as_deref(),
        Some("no cards found in the deck")
    );
}

#[tokio::test]
async fn stale_load_results_are_discarded() {
    let store = InMemoryRepository::new();
    let mut ctl = controller(&store);

    let older = ctl.begin_load();
    let newer = ctl.begin_load();

    let old_deck = DeckLoader::fetch(&StaticDeckSource::json(deck_json("Old", &["o1"])))
        .await
        .unwrap();
    let new_deck = DeckLoader::fetch(&StaticDeckSource::json(deck_json("New", &["n1", "n2"])))
        .await
        .unwrap();

    // Newer response arrives first, the older one straggles in after it.
    let outcome = ctl.finish_load(newer, Ok(new_deck)).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Installed { cards: 2 });
    let outcome = ctl.finish_load(older, Ok(old_deck)).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);

    assert_eq!(ctl.deck_info().unwrap().name(), "New");
    assert_eq!(current_id(&ctl), "n1");

    // A stale failure does not clobber the loaded deck either.
    let stale = ctl.begin_load();
    let latest = ctl.begin_load();
    let retry_deck = DeckLoader::fetch(&StaticDeckSource::json(deck_json("New", &["n1", "n2"])))
        .await
        .unwrap();
    ctl.finish_load(latest, Ok(retry_deck)).await.unwrap();
    let outcome = ctl
        .finish_load(
            stale,
            Err(DeckLoadError::Fetch {
                status: 500,
                reason: "Internal Server Error".into(),
            }),
        )
        .await
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(ctl.is_loaded());
    assert!(ctl.view().error.is_none());
}
