use dioxus::prelude::*;

use crate::vm::{CardFaceVm, ShellVm, StudyIntent};

#[component]
pub(super) fn StudyHeader(shell: ShellVm) -> Element {
    let width = shell.progress_width();
    rsx! {
        header { class: "study-header",
            h1 { class: "study-header__title", "{shell.deck_title()}" }
            div { class: "study-header__meta",
                span { class: "study-counter", id: "study-counter", "{shell.counter_label()}" }
                span { class: "study-stats", "{shell.stats_label()}" }
            }
            div { class: "study-progress",
                div { class: "study-progress__fill", style: "width: {width}" }
            }
        }
    }
}

#[component]
pub(super) fn CardPanel(card: CardFaceVm, on_flip: EventHandler<()>) -> Element {
    let class = if card.is_back() {
        "study-card study-card--back"
    } else {
        "study-card"
    };

    rsx! {
        div { class: "{class}", id: "study-card", onclick: move |_| on_flip.call(()),
            div { class: "study-card__face study-card__face--front",
                p { class: "study-card__focus", "{card.focus}" }
                div { class: "study-card__text", dangerous_inner_html: "{card.front_html}" }
            }
            if card.is_back() {
                div { class: "study-card__face study-card__face--back",
                    BackField { label: "Meaning", value: card.meaning.clone() }
                    BackField { label: "Description", value: card.description.clone() }
                    BackField { label: "Rule", value: card.rule.clone() }
                    BackField { label: "Nuance", value: card.nuance.clone() }
                    BackField { label: "Example", value: card.translation.clone() }
                }
            }
        }
    }
}

#[component]
fn BackField(label: &'static str, value: String) -> Element {
    if value.is_empty() {
        return rsx! {};
    }
    rsx! {
        section { class: "study-card__field",
            h3 { "{label}" }
            p { "{value}" }
        }
    }
}

#[component]
pub(super) fn StudyControls(
    shell: ShellVm,
    show_outcomes: bool,
    on_intent: EventHandler<StudyIntent>,
    on_reset: EventHandler<()>,
) -> Element {
    let ready = shell.is_ready();
    let can_navigate = shell.can_navigate();

    rsx! {
        footer { class: "study-controls",
            if show_outcomes {
                div { class: "study-outcomes",
                    button {
                        class: "btn study-outcome study-outcome--incorrect",
                        id: "study-incorrect",
                        r#type: "button",
                        onclick: move |_| on_intent.call(StudyIntent::MarkIncorrect),
                        "Incorrect"
                    }
                    button {
                        class: "btn study-outcome study-outcome--correct",
                        id: "study-correct",
                        r#type: "button",
                        onclick: move |_| on_intent.call(StudyIntent::MarkCorrect),
                        "Correct"
                    }
                }
            }
            div { class: "study-nav",
                button {
                    class: "btn",
                    id: "study-previous",
                    r#type: "button",
                    disabled: !can_navigate,
                    onclick: move |_| on_intent.call(StudyIntent::Previous),
                    "Previous"
                }
                button {
                    class: "btn",
                    id: "study-shuffle",
                    r#type: "button",
                    disabled: !can_navigate,
                    onclick: move |_| on_intent.call(StudyIntent::Shuffle),
                    "Shuffle"
                }
                button {
                    class: "btn",
                    id: "study-next",
                    r#type: "button",
                    disabled: !can_navigate,
                    onclick: move |_| on_intent.call(StudyIntent::Next),
                    "Next"
                }
                button {
                    class: "btn btn-ghost",
                    id: "study-reset",
                    r#type: "button",
                    disabled: !ready,
                    onclick: move |_| on_reset.call(()),
                    "Reset progress"
                }
            }
        }
    }
}

#[component]
pub(super) fn ResetConfirm(deck_name: String, on_answer: EventHandler<bool>) -> Element {
    rsx! {
        div { class: "study-overlay",
            div {
                class: "study-dialog",
                role: "dialog",
                aria_modal: "true",
                p { "Reset all progress for {deck_name}? This cannot be undone." }
                div { class: "study-dialog__actions",
                    button {
                        class: "btn btn-secondary",
                        id: "study-reset-cancel",
                        r#type: "button",
                        onclick: move |_| on_answer.call(false),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        id: "study-reset-confirm",
                        r#type: "button",
                        onclick: move |_| on_answer.call(true),
                        "Reset"
                    }
                }
            }
        }
    }
}
