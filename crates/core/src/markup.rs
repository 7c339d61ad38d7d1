//! Inline emphasis markup used on the front of cards.
//!
//! Deck authors mark the grammar point inside an example sentence with a
//! doubled asterisk on each side, e.g. `テスト**です**`. Rendering turns each
//! such span into `<strong>` and leaves every other character untouched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"));

/// Replace every `**span**` with `<strong>span</strong>`.
///
/// Spans are matched shortest-first and never cross a line break. Text
/// without a complete pair of markers is returned unchanged (and unescaped).
#[must_use]
pub fn emphasize(text: &str) -> Cow<'_, str> {
    EMPHASIS.replace_all(text, "<strong>$1</strong>")
}
