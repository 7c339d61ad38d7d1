//! Shared error types for the services crate.

use benki_core::model::DeckFormatError;
use thiserror::Error;

/// Why a deck could not be loaded. Every variant is terminal for the attempt;
/// retrying means issuing a fresh load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckLoadError {
    #[error("failed to load cards: {status} {reason}")]
    Fetch { status: u16, reason: String },

    #[error("failed to load cards: {0}")]
    Unreachable(String),

    #[error("invalid card data format: {0}")]
    Format(DeckFormatError),

    #[error("no cards found in the deck")]
    EmptyDeck,
}

impl DeckLoadError {
    /// True for transport failures, whether a bad status or no response at all.
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Unreachable(_))
    }
}

impl From<DeckFormatError> for DeckLoadError {
    fn from(err: DeckFormatError) -> Self {
        match err {
            DeckFormatError::Empty => Self::EmptyDeck,
            other => Self::Format(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_message_carries_status_and_reason() {
        let err = DeckLoadError::Fetch {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "failed to load cards: 404 Not Found");
        assert!(err.is_fetch());
    }

    #[test]
    fn empty_format_error_maps_to_empty_deck() {
        assert_eq!(
            DeckLoadError::from(DeckFormatError::Empty),
            DeckLoadError::EmptyDeck
        );
        assert_eq!(
            DeckLoadError::from(DeckFormatError::MissingCards).to_string(),
            "invalid card data format: missing cards array"
        );
    }
}
