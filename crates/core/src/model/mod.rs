use serde::{Deserialize, Deserializer};

mod card;
mod deck;
mod ids;
mod progress;

pub use ids::CardId;

pub use card::{Card, CardBack, CardFront};
pub use deck::{DEFAULT_DECK_NAME, DEFAULT_DECK_VERSION, DeckDocument, DeckFormatError, DeckInfo};
pub use progress::{
    PROGRESS_KEY_PREFIX, ProgressKey, ProgressRecord, ProgressStats, sanitize_deck_name,
};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
