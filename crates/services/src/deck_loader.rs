use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use benki_core::model::{Card, DeckDocument, DeckInfo};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::DeckLoadError;

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Transport-level answer from a deck source: status line plus raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    status: u16,
    reason: String,
    body: Vec<u8>,
}

impl SourceResponse {
    #[must_use]
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// A `200 OK` response carrying `body`.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, "OK", body)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Where a deck document comes from.
#[async_trait]
pub trait DeckSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn location(&self) -> &str;

    /// Fetch the document once.
    ///
    /// # Errors
    ///
    /// Returns `DeckLoadError::Unreachable` when no response could be obtained.
    async fn fetch(&self) -> Result<SourceResponse, DeckLoadError>;
}

/// Deck served over HTTP(S).
#[derive(Clone)]
pub struct HttpDeckSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDeckSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl DeckSource for HttpDeckSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<SourceResponse, DeckLoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| DeckLoadError::Unreachable(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| DeckLoadError::Unreachable(err.to_string()))?;

        Ok(SourceResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body.to_vec(),
        ))
    }
}

/// Deck stored on the local filesystem. A missing file answers `404 Not Found`.
#[derive(Debug, Clone)]
pub struct FileDeckSource {
    path: PathBuf,
    location: String,
}

impl FileDeckSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl DeckSource for FileDeckSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<SourceResponse, DeckLoadError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(SourceResponse::ok(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(SourceResponse::new(404, "Not Found", Vec::new()))
            }
            Err(err) => Err(DeckLoadError::Unreachable(format!(
                "{}: {err}",
                self.location
            ))),
        }
    }
}

/// Canned answer, for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticDeckSource {
    location: String,
    response: Result<SourceResponse, DeckLoadError>,
}

impl StaticDeckSource {
    #[must_use]
    pub fn new(response: Result<SourceResponse, DeckLoadError>) -> Self {
        Self {
            location: "static".to_owned(),
            response,
        }
    }

    /// `200 OK` with the given JSON body.
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::new(Ok(SourceResponse::ok(body)))
    }

    /// Empty body with the given status line.
    #[must_use]
    pub fn status(status: u16, reason: &str) -> Self {
        Self::new(Ok(SourceResponse::new(status, reason, Vec::new())))
    }
}

#[async_trait]
impl DeckSource for StaticDeckSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<SourceResponse, DeckLoadError> {
        self.response.clone()
    }
}

/// Pick a source for a location string: `http://` / `https://` URLs go over
/// the network, anything else is a file path.
#[must_use]
pub fn source_for(location: &str) -> Arc<dyn DeckSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpDeckSource::new(location))
    } else {
        Arc::new(FileDeckSource::new(location))
    }
}

//
// ─── LOADER ────────────────────────────────────────────────────────────────────
//

/// A fetched and validated deck that has not been installed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDeck {
    info: DeckInfo,
    cards: Vec<Card>,
}

impl LoadedDeck {
    #[must_use]
    pub fn info(&self) -> &DeckInfo {
        &self.info
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl From<DeckDocument> for LoadedDeck {
    fn from(document: DeckDocument) -> Self {
        let (info, cards) = document.into_parts();
        Self { info, cards }
    }
}

/// Holds the current deck: its cards in study order and its metadata.
#[derive(Debug, Default)]
pub struct DeckLoader {
    cards: Vec<Card>,
    info: DeckInfo,
}

impl DeckLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and validate a deck without touching the held one.
    ///
    /// # Errors
    ///
    /// - `DeckLoadError::Fetch` for a non-success status,
    /// - `DeckLoadError::Unreachable` when the source gave no response,
    /// - `DeckLoadError::Format` for a structurally invalid payload,
    /// - `DeckLoadError::EmptyDeck` when the deck has no cards.
    pub async fn fetch(source: &dyn DeckSource) -> Result<LoadedDeck, DeckLoadError> {
        let response = source.fetch().await?;
        if !response.is_success() {
            return Err(DeckLoadError::Fetch {
                status: response.status(),
                reason: response.reason().to_owned(),
            });
        }

        let document = DeckDocument::parse(response.body())?;
        debug!(
            source = source.location(),
            cards = document.cards().len(),
            "deck document parsed"
        );
        Ok(document.into())
    }

    /// Replace the held deck entirely.
    pub fn install(&mut self, deck: LoadedDeck) -> (&[Card], &DeckInfo) {
        self.cards = deck.cards;
        self.info = deck.info;
        (self.cards.as_slice(), &self.info)
    }

    /// Fetch, validate and install a deck.
    ///
    /// On failure the held deck is left as it was.
    ///
    /// # Errors
    ///
    /// See [`DeckLoader::fetch`].
    pub async fn load(
        &mut self,
        source: &dyn DeckSource,
    ) -> Result<(&[Card], &DeckInfo), DeckLoadError> {
        let deck = Self::fetch(source).await?;
        Ok(self.install(deck))
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn deck_info(&self) -> &DeckInfo {
        &self.info
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle the held cards with the thread-local RNG.
    pub fn shuffle(&mut self) -> &[Card] {
        self.shuffle_with(&mut rand::rng())
    }

    /// Shuffle the held cards in place and return the new order.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[Card] {
        self.cards.shuffle(rng);
        debug!(cards = self.cards.len(), "deck shuffled");
        &self.cards
    }
}
