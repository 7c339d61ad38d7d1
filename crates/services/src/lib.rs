#![forbid(unsafe_code)]

pub mod deck_loader;
pub mod error;
pub mod progress;
pub mod study;

pub use benki_core::Clock;

pub use deck_loader::{
    DeckLoader, DeckSource, FileDeckSource, HttpDeckSource, LoadedDeck, SourceResponse,
    StaticDeckSource, source_for,
};
pub use error::DeckLoadError;
pub use progress::ProgressTracker;
pub use study::{
    CardField, CardView, Face, LoadOutcome, LoadTicket, Navigation, StudyController, StudyStatus,
};
