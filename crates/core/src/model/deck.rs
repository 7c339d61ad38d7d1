use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::card::Card;

pub const DEFAULT_DECK_NAME: &str = "Unknown Deck";
pub const DEFAULT_DECK_VERSION: &str = "1.0";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural problems with a deck document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckFormatError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("missing cards array")]
    MissingCards,

    #[error("card at index {index} is invalid: {reason}")]
    InvalidCard { index: usize, reason: String },

    #[error("duplicate card id `{0}`")]
    DuplicateId(String),

    #[error("no cards found in the deck")]
    Empty,
}

//
// ─── DECK INFO ─────────────────────────────────────────────────────────────────
//

/// Descriptive metadata read from the top of a deck document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckInfo {
    name: String,
    description: String,
    version: String,
}

impl DeckInfo {
    /// Builds deck info, substituting defaults for absent or empty fields.
    #[must_use]
    pub fn new(name: Option<&str>, description: Option<&str>, version: Option<&str>) -> Self {
        fn or_default(value: Option<&str>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_owned()
        }

        Self {
            name: or_default(name, DEFAULT_DECK_NAME),
            description: or_default(description, ""),
            version: or_default(version, DEFAULT_DECK_VERSION),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for DeckInfo {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// A validated deck document: metadata plus at least one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDocument {
    info: DeckInfo,
    cards: Vec<Card>,
}

impl DeckDocument {
    /// Parse and validate a deck from raw JSON bytes.
    ///
    /// Card order is preserved exactly as written.
    ///
    /// # Errors
    ///
    /// Returns `DeckFormatError::Empty` when the `cards` array has no elements,
    /// and another `DeckFormatError` variant for any structural problem.
    pub fn parse(bytes: &[u8]) -> Result<Self, DeckFormatError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| DeckFormatError::InvalidJson(err.to_string()))?;
        let Value::Object(mut map) = value else {
            return Err(DeckFormatError::NotAnObject);
        };
        let Some(Value::Array(raw_cards)) = map.remove("cards") else {
            return Err(DeckFormatError::MissingCards);
        };
        if raw_cards.is_empty() {
            return Err(DeckFormatError::Empty);
        }

        let info = DeckInfo::new(
            string_field(&map, "name"),
            string_field(&map, "description"),
            string_field(&map, "version"),
        );

        let mut ids = HashSet::with_capacity(raw_cards.len());
        let mut cards = Vec::with_capacity(raw_cards.len());
        for (index, raw) in raw_cards.into_iter().enumerate() {
            let card: Card = serde_json::from_value(raw).map_err(|err| {
                DeckFormatError::InvalidCard {
                    index,
                    reason: err.to_string(),
                }
            })?;
            if !ids.insert(card.id().clone()) {
                return Err(DeckFormatError::DuplicateId(card.id().to_string()));
            }
            cards.push(card);
        }

        Ok(Self { info, cards })
    }

    #[must_use]
    pub fn info(&self) -> &DeckInfo {
        &self.info
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn into_parts(self) -> (DeckInfo, Vec<Card>) {
        (self.info, self.cards)
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
