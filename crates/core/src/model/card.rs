use serde::{Deserialize, Serialize};

use crate::markup::emphasize;
use crate::model::ids::CardId;
use crate::model::null_as_default;

//
// ─── CARD FACES ────────────────────────────────────────────────────────────────
//

/// Prompt side: an example sentence plus the grammar point it exercises.
///
/// `text` may carry `**emphasis**` markup; `focus` is shown as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFront {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub focus: String,
}

impl CardFront {
    /// Front text with emphasis markup turned into `<strong>` spans.
    #[must_use]
    pub fn text_markup(&self) -> String {
        emphasize(&self.text).into_owned()
    }
}

/// Answer side. All plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardBack {
    #[serde(deserialize_with = "null_as_default")]
    pub meaning: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rule: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nuance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub example_translation: String,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A single grammar card as authored in a deck document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    #[serde(default, deserialize_with = "null_as_default")]
    front: CardFront,
    #[serde(default, deserialize_with = "null_as_default")]
    back: CardBack,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, front: CardFront, back: CardBack, tags: Vec<String>) -> Self {
        Self {
            id,
            front,
            back,
            tags,
        }
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    #[must_use]
    pub fn front(&self) -> &CardFront {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &CardBack {
        &self.back
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
