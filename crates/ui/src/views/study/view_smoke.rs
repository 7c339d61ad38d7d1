use std::sync::Arc;

use benki_core::model::ProgressStats;
use benki_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{Clock, DeckSource, Face, Navigation, StaticDeckSource, StudyStatus};
use storage::repository::{InMemoryRepository, KeyValueStore};

use crate::context::{UiApp, build_app_context};
use crate::vm::{CardFaceVm, ShellPhase, ShellVm, StudyIntent};

use super::StudyView;
use super::components::{CardPanel, StudyControls, StudyHeader};

const DECK: &str = r#"{
    "name": "N2 Grammar",
    "cards": [
        {
            "id": "test-1",
            "front": { "text": "テスト**です**", "focus": "です" },
            "back": {
                "meaning": "It is a test",
                "description": "Polite copula",
                "rule": "Noun + です",
                "nuance": "Formal",
                "example_translation": "It is a test."
            },
            "tags": ["grammar"]
        },
        {
            "id": "test-2",
            "front": { "text": "二枚目", "focus": "" },
            "back": { "meaning": "second" },
            "tags": []
        }
    ]
}"#;

struct TestApp {
    source: Arc<StaticDeckSource>,
    store: InMemoryRepository,
}

impl UiApp for TestApp {
    fn deck_source(&self) -> Arc<dyn DeckSource> {
        self.source.clone()
    }

    fn progress_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(self.store.clone())
    }

    fn clock(&self) -> Clock {
        fixed_clock()
    }
}

#[derive(Props, Clone)]
struct StudyHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for StudyHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn StudyHarness(props: StudyHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { StudyView {} }
}

#[component]
fn PanelHarness(card: CardFaceVm, shell: ShellVm) -> Element {
    rsx! {
        StudyHeader { shell }
        CardPanel { card, on_flip: move |()| {} }
    }
}

#[component]
fn ControlsHarness(shell: ShellVm) -> Element {
    rsx! {
        StudyControls {
            shell,
            show_outcomes: false,
            on_intent: move |_: StudyIntent| {},
            on_reset: move |()| {},
        }
    }
}

fn ready_shell(deck_len: usize) -> ShellVm {
    let navigation = Navigation::new(deck_len).unwrap();
    ShellVm {
        phase: ShellPhase::Ready,
        status: Some(StudyStatus::new(
            "N2 Grammar",
            &navigation,
            ProgressStats::new(1, 0, 0, u32::try_from(deck_len).unwrap()),
        )),
    }
}

/// The opening `<button ...>` tag carrying `id`.
fn button_tag<'a>(html: &'a str, id: &str) -> &'a str {
    let at = html.find(&format!("id=\"{id}\"")).expect("button rendered");
    let start = html[..at].rfind("<button").expect("button tag start");
    let end = at + html[at..].find('>').expect("button tag end");
    &html[start..end]
}

fn render_controls(shell: ShellVm) -> String {
    let mut dom = VirtualDom::new_with_props(ControlsHarness, ControlsHarnessProps { shell });
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

async fn render_until(dom: &mut VirtualDom, needle: &str) -> String {
    for _ in 0..20 {
        let html = dioxus_ssr::render(dom);
        if html.contains(needle) {
            return html;
        }
        let _ = tokio::time::timeout(std::time::Duration::from_millis(50), dom.wait_for_work())
            .await;
        drive_dom(dom);
    }
    dioxus_ssr::render(dom)
}

fn study_dom(source: StaticDeckSource, store: &InMemoryRepository) -> VirtualDom {
    let app = Arc::new(TestApp {
        source: Arc::new(source),
        store: store.clone(),
    });
    let mut dom = VirtualDom::new_with_props(StudyHarness, StudyHarnessProps { app });
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    dom
}

#[test]
fn card_panel_renders_front_markup() {
    let card = CardFaceVm {
        focus: "です".into(),
        front_html: "テスト<strong>です</strong>".into(),
        meaning: "It is a test".into(),
        ..CardFaceVm::default()
    };
    let navigation = Navigation::new(3).unwrap();
    let shell = ShellVm {
        phase: ShellPhase::Ready,
        status: Some(StudyStatus::new(
            "N2 Grammar",
            &navigation,
            ProgressStats::new(1, 0, 0, 3),
        )),
    };

    let mut dom = VirtualDom::new_with_props(PanelHarness, PanelHarnessProps { card, shell });
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("テスト<strong>です</strong>"), "missing front in {html}");
    assert!(html.contains("N2 Grammar"), "missing title in {html}");
    assert!(html.contains("1/3"), "missing counter in {html}");
    assert!(!html.contains("It is a test"), "back leaked onto front in {html}");
}

#[test]
fn card_panel_shows_back_fields_when_flipped() {
    let card = CardFaceVm {
        front_html: "x".into(),
        meaning: "It is a test".into(),
        rule: "Noun + です".into(),
        face: Face::Back,
        ..CardFaceVm::default()
    };

    let mut dom = VirtualDom::new_with_props(
        PanelHarness,
        PanelHarnessProps {
            card,
            shell: ShellVm::default(),
        },
    );
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("study-card--back"), "missing back class in {html}");
    assert!(html.contains("It is a test"), "missing meaning in {html}");
    assert!(html.contains("Noun + です"), "missing rule in {html}");
    assert!(!html.contains("Nuance"), "empty field rendered in {html}");
}

#[test]
fn single_card_deck_disables_navigation_and_shuffle() {
    let html = render_controls(ready_shell(1));

    for id in ["study-previous", "study-next", "study-shuffle"] {
        assert!(button_tag(&html, id).contains("disabled"), "{id} enabled in {html}");
    }
    assert!(!button_tag(&html, "study-reset").contains("disabled"), "reset disabled in {html}");
}

#[test]
fn multi_card_deck_enables_navigation_and_shuffle() {
    let html = render_controls(ready_shell(3));

    for id in ["study-previous", "study-next", "study-shuffle", "study-reset"] {
        assert!(!button_tag(&html, id).contains("disabled"), "{id} disabled in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_loads_deck_and_records_progress() {
    let store = InMemoryRepository::new();
    let mut dom = study_dom(StaticDeckSource::json(DECK), &store);

    let html = render_until(&mut dom, "テスト<strong>です</strong>").await;
    assert!(html.contains("テスト<strong>です</strong>"), "missing front in {html}");
    assert!(html.contains("1/2"), "missing counter in {html}");
    assert!(html.contains("Seen 1/2"), "missing stats in {html}");

    let stored = store.get("benki_progress_n2_grammar").await.unwrap();
    assert!(stored.is_some_and(|json| json.contains("test-1")));
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_shows_fetch_error_with_retry() {
    let store = InMemoryRepository::new();
    let mut dom = study_dom(StaticDeckSource::status(404, "Not Found"), &store);

    let html = render_until(&mut dom, "study-retry").await;
    assert!(html.contains("404"), "missing status in {html}");
    assert!(html.contains("Retry"), "missing retry button in {html}");
    assert!(!html.contains("study-card"), "card rendered on error in {html}");
}
