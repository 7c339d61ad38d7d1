use std::rc::Rc;

use dioxus::prelude::*;
use keyboard_types::Key;
use services::{DeckLoader, StudyController};
use tokio::sync::Mutex;

use crate::context::AppContext;
use crate::vm::{CardFaceVm, ShellVm, SignalView, StudyIntent, intent_for_key};

use super::components::{CardPanel, ResetConfirm, StudyControls, StudyHeader};

type SharedController = Rc<Mutex<StudyController<SignalView>>>;

#[component]
pub fn StudyView() -> Element {
    let ctx = use_context::<AppContext>();
    let card = use_signal(CardFaceVm::default);
    let shell = use_signal(ShellVm::default);
    let mut confirming_reset = use_signal(|| false);

    let controller: SharedController = use_hook(|| {
        Rc::new(Mutex::new(StudyController::new(
            SignalView::new(card, shell),
            ctx.progress_store(),
            ctx.clock(),
        )))
    });

    let dispatch_intent = {
        let deck_source = ctx.deck_source();
        use_callback(move |intent: StudyIntent| {
            let controller = Rc::clone(&controller);
            let deck_source = deck_source.clone();
            spawn(async move {
                if intent == StudyIntent::Load {
                    // Not held across the fetch; a newer load may start meanwhile.
                    let ticket = controller.lock().await.begin_load();
                    let result = DeckLoader::fetch(deck_source.as_ref()).await;
                    let _ = controller.lock().await.finish_load(ticket, result).await;
                    return;
                }

                let mut controller = controller.lock().await;
                match intent {
                    StudyIntent::Next => controller.next().await,
                    StudyIntent::Previous => controller.previous().await,
                    StudyIntent::Flip => {
                        let _ = controller.flip();
                    }
                    StudyIntent::Shuffle => controller.shuffle_deck().await,
                    StudyIntent::MarkCorrect => controller.mark_current_correct().await,
                    StudyIntent::MarkIncorrect => controller.mark_current_incorrect().await,
                    StudyIntent::ResetProgress => controller.reset_progress().await,
                    StudyIntent::Load => {}
                }
            });
        })
    };

    use_hook(move || dispatch_intent.call(StudyIntent::Load));

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if confirming_reset() {
            if evt.data.key() == Key::Escape {
                confirming_reset.set(false);
            }
            return;
        }
        if let Some(intent) = intent_for_key(&evt.data.key(), evt.data.modifiers()) {
            evt.prevent_default();
            dispatch_intent.call(intent);
        }
    });

    let on_reset_requested = use_callback(move |()| confirming_reset.set(true));
    let on_reset_answer = use_callback(move |confirmed: bool| {
        confirming_reset.set(false);
        if confirmed {
            dispatch_intent.call(StudyIntent::ResetProgress);
        }
    });

    let shell_vm = shell.read().clone();
    let card_vm = card.read().clone();
    let deck_title = shell_vm.deck_title().to_string();

    rsx! {
        div { class: "page study-page", id: "study-root", tabindex: "0", onkeydown: on_key,
            StudyHeader { shell: shell_vm.clone() }
            main { class: "study-body",
                if let Some(message) = shell_vm.error_message() {
                    div { class: "study-error", role: "alert",
                        p { "{message}" }
                        button {
                            class: "btn btn-secondary",
                            id: "study-retry",
                            r#type: "button",
                            onclick: move |_| dispatch_intent.call(StudyIntent::Load),
                            "Retry"
                        }
                    }
                } else if !shell_vm.is_ready() {
                    p { class: "study-loading", "Loading cards..." }
                } else {
                    CardPanel {
                        card: card_vm.clone(),
                        on_flip: move |()| dispatch_intent.call(StudyIntent::Flip),
                    }
                }
            }
            StudyControls {
                shell: shell_vm.clone(),
                show_outcomes: shell_vm.is_ready() && card_vm.is_back(),
                on_intent: dispatch_intent,
                on_reset: on_reset_requested,
            }
            if confirming_reset() {
                ResetConfirm { deck_name: deck_title, on_answer: on_reset_answer }
            }
        }
    }
}
