//! Render a [`QuoteRecord`] as post text that fits the platform limit.
//!
//! Length is counted in `char`s, and truncation never splits one.

use crate::record::QuoteRecord;

/// Default platform limit.
pub const TWEET_MAX_CHARS: usize = 280;

const SEPARATOR: &str = " - ";
const ELLIPSIS: &str = "...";
/// Below this much room for the text, keeping the attribution isn't worth it.
const MIN_TEXT_BUDGET: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub max_chars: usize,
    /// Wrap the text in straight double quotes.
    pub wrap_in_quotes: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_chars: TWEET_MAX_CHARS,
            wrap_in_quotes: false,
        }
    }
}

impl FormatOptions {
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn render(text: &str, author: Option<&str>, wrap: bool) -> String {
    let mut out = if wrap {
        format!("\"{text}\"")
    } else {
        text.to_string()
    };
    if let Some(author) = author {
        out.push_str(SEPARATOR);
        out.push_str(author);
    }
    out
}

/// First `budget - 3` chars plus `...`; `budget` must exceed the ellipsis.
fn shorten(text: &str, budget: usize) -> String {
    let mut out: String = text.chars().take(budget - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Format `record` as `text - author`, shortening the text when the result
/// would exceed `opts.max_chars`.
///
/// When the attribution leaves 50 chars or fewer for the text, the attribution
/// is dropped and the text is shortened on its own, so the output is always
/// bounded by the limit.
pub fn format_tweet(record: &QuoteRecord, opts: &FormatOptions) -> String {
    let limit = opts.max_chars;
    let wrap = opts.wrap_in_quotes;
    let author = record.author.as_deref();

    let full = render(&record.text, author, wrap);
    if char_len(&full) <= limit {
        return full;
    }

    let quote_cost = if wrap { 2 } else { 0 };
    let attribution_cost = author.map_or(0, |a| SEPARATOR.len() + char_len(a));
    let text_budget = limit.saturating_sub(attribution_cost + quote_cost);

    if text_budget > MIN_TEXT_BUDGET {
        return render(&shorten(&record.text, text_budget), author, wrap);
    }

    tracing::warn!(
        limit,
        author_chars = author.map_or(0, char_len),
        "Attribution leaves too little room; posting the quote without it"
    );

    let alone = render(&record.text, None, wrap);
    if char_len(&alone) <= limit {
        return alone;
    }
    let bare_budget = limit.saturating_sub(quote_cost);
    if bare_budget > ELLIPSIS.len() {
        render(&shorten(&record.text, bare_budget), None, wrap)
    } else {
        alone.chars().take(limit).collect()
    }
}
