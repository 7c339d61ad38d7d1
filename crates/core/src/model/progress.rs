use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::CardId;
use crate::model::null_as_default;

/// Namespace for every progress entry in the key-value store.
pub const PROGRESS_KEY_PREFIX: &str = "benki_progress_";

//
// ─── KEY ───────────────────────────────────────────────────────────────────────
//

/// Lowercase the name and collapse every run of characters outside
/// `[a-z0-9]` into a single `_`.
///
/// Different names can map to the same value ("N2 Grammar" and "n2-grammar"),
/// in which case they share one progress record.
#[must_use]
pub fn sanitize_deck_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Storage key of a deck's progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey(String);

impl ProgressKey {
    #[must_use]
    pub fn for_deck(deck_name: &str) -> Self {
        Self(format!("{PROGRESS_KEY_PREFIX}{}", sanitize_deck_name(deck_name)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Per-deck study progress.
///
/// Invariants, upheld by every mutator:
/// - ids in `cards_correct` or `cards_incorrect` are also in `cards_seen`;
/// - no id is in both `cards_correct` and `cards_incorrect`.
///
/// Serialized with camelCase keys; sets are written as JSON arrays and missing
/// or `null` fields read back as empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    #[serde(deserialize_with = "null_as_default")]
    cards_seen: HashSet<CardId>,
    #[serde(deserialize_with = "null_as_default")]
    cards_correct: HashSet<CardId>,
    #[serde(deserialize_with = "null_as_default")]
    cards_incorrect: HashSet<CardId>,
    #[serde(deserialize_with = "null_as_default")]
    total_cards: u32,
    last_studied: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    study_sessions: u32,
}

impl ProgressRecord {
    /// Parse a stored record, restoring the set invariants if the stored
    /// payload broke them.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload is not a record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut record: Self = serde_json::from_str(json)?;
        record.repair();
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Record the deck size for a new study run. The first run on a deck with
    /// nothing seen counts as session 1.
    pub fn initialize(&mut self, total_cards: u32) {
        self.total_cards = total_cards;
        if self.cards_seen.is_empty() {
            self.study_sessions = 1;
        }
    }

    pub fn mark_seen(&mut self, id: &CardId, at_millis: i64) {
        if !self.cards_seen.contains(id) {
            self.cards_seen.insert(id.clone());
        }
        self.last_studied = Some(at_millis);
    }

    pub fn mark_correct(&mut self, id: &CardId, at_millis: i64) {
        self.cards_incorrect.remove(id);
        self.cards_correct.insert(id.clone());
        self.mark_seen(id, at_millis);
    }

    pub fn mark_incorrect(&mut self, id: &CardId, at_millis: i64) {
        self.cards_correct.remove(id);
        self.cards_incorrect.insert(id.clone());
        self.mark_seen(id, at_millis);
    }

    /// Start over: clears outcomes and the timestamp, keeps the deck size and
    /// counts a new session.
    pub fn reset(&mut self) {
        self.cards_seen.clear();
        self.cards_correct.clear();
        self.cards_incorrect.clear();
        self.last_studied = None;
        self.study_sessions = self.study_sessions.saturating_add(1);
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        ProgressStats::new(
            count(&self.cards_seen),
            count(&self.cards_correct),
            count(&self.cards_incorrect),
            self.total_cards,
        )
    }

    #[must_use]
    pub fn is_seen(&self, id: &str) -> bool {
        self.cards_seen.contains(id)
    }

    #[must_use]
    pub fn is_correct(&self, id: &str) -> bool {
        self.cards_correct.contains(id)
    }

    #[must_use]
    pub fn is_incorrect(&self, id: &str) -> bool {
        self.cards_incorrect.contains(id)
    }

    #[must_use]
    pub fn cards_seen(&self) -> &HashSet<CardId> {
        &self.cards_seen
    }

    #[must_use]
    pub fn cards_correct(&self) -> &HashSet<CardId> {
        &self.cards_correct
    }

    #[must_use]
    pub fn cards_incorrect(&self) -> &HashSet<CardId> {
        &self.cards_incorrect
    }

    #[must_use]
    pub fn total_cards(&self) -> u32 {
        self.total_cards
    }

    #[must_use]
    pub fn study_sessions(&self) -> u32 {
        self.study_sessions
    }

    #[must_use]
    pub fn last_studied_millis(&self) -> Option<i64> {
        self.last_studied
    }

    #[must_use]
    pub fn last_studied(&self) -> Option<DateTime<Utc>> {
        self.last_studied.and_then(DateTime::from_timestamp_millis)
    }

    fn repair(&mut self) {
        // An id graded both ways has no trustworthy outcome; keep it as seen only.
        let conflicting: Vec<CardId> = self
            .cards_correct
            .intersection(&self.cards_incorrect)
            .cloned()
            .collect();
        for id in &conflicting {
            self.cards_correct.remove(id);
            self.cards_incorrect.remove(id);
            self.cards_seen.insert(id.clone());
        }
        self.cards_seen.extend(self.cards_correct.iter().cloned());
        self.cards_seen.extend(self.cards_incorrect.iter().cloned());
    }
}

fn count(set: &HashSet<CardId>) -> u32 {
    u32::try_from(set.len()).unwrap_or(u32::MAX)
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Derived progress figures; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressStats {
    pub seen: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    /// `seen / total * 100`, or 0 for an empty deck.
    pub percent_seen: f64,
    /// `correct / seen * 100`, or 0 before anything is seen.
    pub percent_correct: f64,
}

impl ProgressStats {
    #[must_use]
    pub fn new(seen: u32, correct: u32, incorrect: u32, total: u32) -> Self {
        Self {
            seen,
            correct,
            incorrect,
            total,
            percent_seen: percent(seen, total),
            percent_correct: percent(correct, seen),
        }
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
