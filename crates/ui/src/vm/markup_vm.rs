use std::collections::HashSet;

/// Clean card markup for `dangerous_inner_html`. Only inline emphasis and
/// line breaks survive; everything else is stripped or escaped.
#[must_use]
pub fn sanitize_markup(html: &str) -> String {
    let tags: HashSet<&str> = ["strong", "b", "em", "i", "br", "span"]
        .into_iter()
        .collect();

    ammonia::Builder::new()
        .tags(tags)
        .clean(html)
        .to_string()
}

/// Drop every tag and keep the text.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    ammonia::Builder::empty().clean(html).to_string()
}
