//! Text sanitizing and sender-name normalizing.
//!
//! [`sanitize`] cleans a message body before it is rendered; [`normalize_name`]
//! cleans a display name before it is anonymized or shown. Neither can fail.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_general_category::{GeneralCategory, get_general_category};

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

// `$-_` is a range: it also covers `/ : ; = ? [ ]` and the upper-case letters
static URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[A-Za-z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+").ok()
});

// escaped line breaks, non-breaking spaces and raw newlines
static BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"&lt;br ?/?&gt;|&nbsp;|\r?\n").ok());

static SPACES: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r" {2,}").ok());

fn replace<'t>(pattern: &LazyLock<Option<Regex>>, text: Cow<'t, str>, with: &str) -> Cow<'t, str> {
    match pattern.as_ref() {
        Some(re) if re.is_match(&text) => Cow::Owned(re.replace_all(&text, with).into_owned()),
        _ => text,
    }
}

/// Cleans a message body.
///
/// Removes HTML-like tags and `http(s)` URLs, turns escaped line breaks,
/// `&nbsp;` and newlines into spaces, collapses runs of spaces and trims the
/// result. Every removal leaves a space behind, so nothing removed can join
/// its neighbours into a new tag or URL and `sanitize(sanitize(x)) ==
/// sanitize(x)`.
///
/// # Example
///
/// ```rust
/// use chatwindow::core::sanitize::sanitize;
///
/// assert_eq!(
///     sanitize("<b>Look</b> https://example.com/a?b=c\nnice&nbsp;&nbsp;one"),
///     "Look nice one"
/// );
/// ```
pub fn sanitize(text: &str) -> String {
    let text = replace(&TAG, Cow::Borrowed(text), " ");
    let text = replace(&URL, text, " ");
    let text = replace(&BREAK, text, " ");
    let text = replace(&SPACES, text, " ");
    text.trim().to_string()
}

/// Returns `true` for characters in a Letter or Number general category.
///
/// Combining marks and letterlike symbols such as `Ⓐ` are not letters here,
/// although `char::is_alphanumeric` accepts them.
fn is_letter_or_number(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// Strips punctuation, symbols and marks from a display name.
///
/// Each whitespace-separated token keeps only its letters and digits by
/// Unicode general category, in any script; tokens left empty are dropped and
/// the rest are joined with single spaces.
///
/// # Example
///
/// ```rust
/// use chatwindow::core::sanitize::normalize_name;
///
/// assert_eq!(normalize_name("  Анна  (Work) 🚀 "), "Анна Work");
/// assert_eq!(normalize_name("李小龙!"), "李小龙");
/// assert_eq!(normalize_name(""), "");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|&c| is_letter_or_number(c))
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
