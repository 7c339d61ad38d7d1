use dioxus::prelude::*;
use keyboard_types::{Key, Modifiers};
use services::{CardField, CardView, Face, StudyStatus};

use super::markup_vm::{sanitize_markup, strip_markup};

/// User intents on the study screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyIntent {
    /// Fetch the deck. Used on mount and by the retry button.
    Load,
    Next,
    Previous,
    Flip,
    Shuffle,
    MarkCorrect,
    MarkIncorrect,
    /// Only dispatched after the user confirmed.
    ResetProgress,
}

/// Space flips, arrows move, Ctrl/Cmd+S shuffles.
#[must_use]
pub fn intent_for_key(key: &Key, modifiers: Modifiers) -> Option<StudyIntent> {
    match key {
        Key::ArrowLeft => Some(StudyIntent::Previous),
        Key::ArrowRight => Some(StudyIntent::Next),
        Key::Character(value) if value == " " => Some(StudyIntent::Flip),
        Key::Character(value)
            if value.eq_ignore_ascii_case("s")
                && (modifiers.contains(Modifiers::CONTROL)
                    || modifiers.contains(Modifiers::META)) =>
        {
            Some(StudyIntent::Shuffle)
        }
        _ => None,
    }
}

/// Display state of the card itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardFaceVm {
    pub focus: String,
    /// Sanitized, ready for `dangerous_inner_html`.
    pub front_html: String,
    pub meaning: String,
    pub description: String,
    pub rule: String,
    pub nuance: String,
    pub translation: String,
    pub face: Face,
}

impl CardFaceVm {
    /// Plain text for `field`. Front text is escaped since it is rendered as HTML.
    pub fn set_text(&mut self, field: CardField, text: &str) {
        match field {
            CardField::FrontText => self.front_html = ammonia::clean_text(text),
            other => *self.slot(other) = text.to_owned(),
        }
    }

    pub fn set_markup(&mut self, field: CardField, markup: &str) {
        match field {
            CardField::FrontText => self.front_html = sanitize_markup(markup),
            other => *self.slot(other) = strip_markup(markup),
        }
    }

    #[must_use]
    pub fn is_back(&self) -> bool {
        self.face.is_back()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.front_html.is_empty() && self.focus.is_empty() && self.meaning.is_empty()
    }

    fn slot(&mut self, field: CardField) -> &mut String {
        match field {
            CardField::Focus => &mut self.focus,
            CardField::FrontText => &mut self.front_html,
            CardField::Meaning => &mut self.meaning,
            CardField::Description => &mut self.description,
            CardField::Rule => &mut self.rule,
            CardField::Nuance => &mut self.nuance,
            CardField::Translation => &mut self.translation,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ShellPhase {
    #[default]
    Loading,
    Ready,
    Error(String),
}

/// Everything around the card: header, counter, progress bar and stats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShellVm {
    pub phase: ShellPhase,
    pub status: Option<StudyStatus>,
}

impl ShellVm {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == ShellPhase::Ready
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            ShellPhase::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn deck_title(&self) -> &str {
        match (&self.phase, &self.status) {
            (ShellPhase::Loading, _) => "Loading...",
            (ShellPhase::Error(_), _) => "Error",
            (ShellPhase::Ready, Some(status)) => &status.deck_name,
            (ShellPhase::Ready, None) => "",
        }
    }

    #[must_use]
    pub fn counter_label(&self) -> &str {
        self.status
            .as_ref()
            .map_or("0/0", |status| status.counter_label.as_str())
    }

    /// CSS width of the progress bar fill.
    #[must_use]
    pub fn progress_width(&self) -> String {
        let percent = self.status.as_ref().map_or(0.0, |status| status.percent_through);
        format!("{percent:.1}%")
    }

    #[must_use]
    pub fn stats_label(&self) -> String {
        let Some(status) = self.status.as_ref() else {
            return String::new();
        };
        let stats = &status.stats;
        format!(
            "Seen {}/{} ({:.0}%) · Correct {} · Incorrect {} ({:.0}% correct)",
            stats.seen,
            stats.total,
            stats.percent_seen,
            stats.correct,
            stats.incorrect,
            stats.percent_correct,
        )
    }

    #[must_use]
    pub fn can_navigate(&self) -> bool {
        self.is_ready() && self.status.as_ref().is_some_and(|status| status.can_navigate)
    }
}

/// [`CardView`] backed by Dioxus signals.
#[derive(Clone, Copy)]
pub struct SignalView {
    card: Signal<CardFaceVm>,
    shell: Signal<ShellVm>,
}

impl SignalView {
    #[must_use]
    pub fn new(card: Signal<CardFaceVm>, shell: Signal<ShellVm>) -> Self {
        Self { card, shell }
    }
}

impl CardView for SignalView {
    fn set_text(&mut self, field: CardField, text: &str) {
        self.card.write().set_text(field, text);
    }

    fn set_markup(&mut self, field: CardField, markup: &str) {
        self.card.write().set_markup(field, markup);
    }

    fn set_face(&mut self, face: Face) {
        self.card.write().face = face;
    }

    fn show_loading(&mut self) {
        self.shell.set(ShellVm {
            phase: ShellPhase::Loading,
            status: None,
        });
    }

    fn show_error(&mut self, message: &str) {
        self.shell.set(ShellVm {
            phase: ShellPhase::Error(message.to_owned()),
            status: None,
        });
    }

    fn show_status(&mut self, status: &StudyStatus) {
        self.shell.set(ShellVm {
            phase: ShellPhase::Ready,
            status: Some(status.clone()),
        });
    }
}
