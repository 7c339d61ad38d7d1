use benki_core::model::{Card, ProgressStats};

use super::navigation::{Face, Navigation};

/// Display slots of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardField {
    Focus,
    FrontText,
    Meaning,
    Description,
    Rule,
    Nuance,
    Translation,
}

impl CardField {
    pub const ALL: [CardField; 7] = [
        CardField::Focus,
        CardField::FrontText,
        CardField::Meaning,
        CardField::Description,
        CardField::Rule,
        CardField::Nuance,
        CardField::Translation,
    ];
}

/// Snapshot of the study run for the surrounding chrome (header, counter,
/// progress bar, button states).
#[derive(Clone, Debug, PartialEq)]
pub struct StudyStatus {
    pub deck_name: String,
    pub position: usize,
    pub deck_len: usize,
    /// `"{position + 1}/{deck_len}"`.
    pub counter_label: String,
    pub percent_through: f64,
    pub stats: ProgressStats,
    /// Navigation only makes sense with more than one card.
    pub can_navigate: bool,
}

impl StudyStatus {
    #[must_use]
    pub fn new(deck_name: &str, navigation: &Navigation, stats: ProgressStats) -> Self {
        let position = navigation.position();
        let deck_len = navigation.deck_len();
        Self {
            deck_name: deck_name.to_owned(),
            position,
            deck_len,
            counter_label: format!("{}/{}", position + 1, deck_len),
            percent_through: navigation.percent_through(),
            stats,
            can_navigate: deck_len > 1,
        }
    }
}

/// What the study controller needs from a UI.
///
/// Field setters are the card itself; the remaining hooks drive the chrome
/// around it and default to doing nothing.
pub trait CardView {
    /// Plain text, displayed verbatim.
    fn set_text(&mut self, field: CardField, text: &str);

    /// Inline markup (`<strong>` spans) to be rendered as such.
    fn set_markup(&mut self, field: CardField, markup: &str);

    fn set_face(&mut self, face: Face);

    fn show_loading(&mut self) {}

    fn show_error(&mut self, _message: &str) {}

    fn show_status(&mut self, _status: &StudyStatus) {}
}

/// Write every field of `card` into `view` and turn it to `face`.
pub fn render_card<V: CardView + ?Sized>(view: &mut V, card: &Card, face: Face) {
    let front = card.front();
    view.set_text(CardField::Focus, &front.focus);
    view.set_markup(CardField::FrontText, &front.text_markup());

    let back = card.back();
    view.set_text(CardField::Meaning, &back.meaning);
    view.set_text(CardField::Description, &back.description);
    view.set_text(CardField::Rule, &back.rule);
    view.set_text(CardField::Nuance, &back.nuance);
    view.set_text(CardField::Translation, &back.example_translation);

    view.set_face(face);
}

/// Blank every field and show the front.
pub fn clear_card<V: CardView + ?Sized>(view: &mut V) {
    for field in CardField::ALL {
        view.set_text(field, "");
    }
    view.set_face(Face::Front);
}
