//! Response formatting — fence stripping and price highlighting.
//!
//! Generated text arrives either bare or wrapped in a ```` ```html ````
//! fence, and frequently quotes dollar prices. This module strips the
//! fence, bolds exact-cent prices, and wraps the result in [`Markup`] for
//! the host to render.
//!
//! The contract is deliberately narrow: one fence shape, one price shape.
//! Both passes are hand-rolled scanners rather than a general parser.

use std::fmt;

/// HTML-safe text produced by [`format_response`].
///
/// The wrapper asserts the content came out of the controlled formatting
/// transform; hosts may render it without further escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// View the markup as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const FENCE_OPEN: &str = "```html";
const FENCE_CLOSE: &str = "```";
const STRONG_OPEN: &str = "<strong>";
const STRONG_CLOSE: &str = "</strong>";

/// Format raw generated text into render-ready markup.
///
/// Strips a wrapping ```` ```html ```` fence if present, bolds
/// `$<digits>.<two digits>` prices, and trims surrounding whitespace.
/// Pure, and idempotent over its own output.
#[must_use]
pub fn format_response(raw: &str) -> Markup {
    let stripped = strip_fence(raw);
    Markup(bold_prices(stripped.trim()))
}

/// Remove a leading ```` ```html ```` token and/or a trailing ```` ``` ````
/// token.
///
/// The opening token matches case-insensitively and surrounding whitespace
/// is tolerated; interior content is preserved untouched.
fn strip_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(head) = s.get(..FENCE_OPEN.len()) {
        if head.eq_ignore_ascii_case(FENCE_OPEN) {
            s = s[FENCE_OPEN.len()..].trim_start();
        }
    }
    if let Some(rest) = s.strip_suffix(FENCE_CLOSE) {
        s = rest.trim_end();
    }
    s
}

/// Wrap `$<digits>.<exactly two digits>` tokens in `<strong>` tags.
///
/// A match must end at a word boundary, so `$12.505` stays untouched.
/// Prices already sitting inside `<strong>` tags are left alone, which
/// keeps a second pass over formatted output a no-op.
fn bold_prices(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            if let Some(end) = price_end(bytes, i) {
                let already_bold =
                    out.ends_with(STRONG_OPEN) && text[end..].starts_with(STRONG_CLOSE);
                if already_bold {
                    out.push_str(&text[i..end]);
                } else {
                    out.push_str(STRONG_OPEN);
                    out.push_str(&text[i..end]);
                    out.push_str(STRONG_CLOSE);
                }
                i = end;
                continue;
            }
        }
        let ch_len = text[i..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&text[i..i + ch_len]);
        i += ch_len;
    }
    out
}

/// Byte offset just past a `$<digits>.<dd>` token starting at `start`, or
/// `None` if the shape or the trailing word boundary fails.
fn price_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if i >= bytes.len() || bytes[i] != b'.' {
        return None;
    }
    i += 1;
    if i + 2 > bytes.len() || !bytes[i].is_ascii_digit() || !bytes[i + 1].is_ascii_digit() {
        return None;
    }
    i += 2;
    if i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        return None;
    }
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_fence_wrapping() {
        let raw = "```html\n<p>Hello</p>\n```";
        assert_eq!(format_response(raw).as_str(), "<p>Hello</p>");
    }

    #[test]
    fn fence_matching_ignores_case_and_whitespace() {
        let raw = "  ```HTML  \n<div>Hi</div>\n ```  ";
        assert_eq!(format_response(raw).as_str(), "<div>Hi</div>");
    }

    #[test]
    fn trailing_fence_alone_is_stripped() {
        assert_eq!(format_response("<p>done</p>\n```").as_str(), "<p>done</p>");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(format_response("  plain answer  ").as_str(), "plain answer");
    }

    #[test]
    fn bolds_exact_cent_prices() {
        assert_eq!(
            format_response("The total is $12.50 today.").as_str(),
            "The total is <strong>$12.50</strong> today."
        );
    }

    #[test]
    fn price_must_have_exactly_two_decimals() {
        assert_eq!(format_response("$12.5 or $12").as_str(), "$12.5 or $12");
        assert_eq!(format_response("$12.505").as_str(), "$12.505");
    }

    #[test]
    fn price_at_end_of_text_is_bolded() {
        assert_eq!(
            format_response("Pay $9.99").as_str(),
            "Pay <strong>$9.99</strong>"
        );
    }

    #[test]
    fn multiple_prices_all_bolded() {
        assert_eq!(
            format_response("$1.00 vs $2.00").as_str(),
            "<strong>$1.00</strong> vs <strong>$2.00</strong>"
        );
    }

    #[test]
    fn already_bold_price_is_untouched() {
        let formatted = "was <strong>$12.50</strong>";
        assert_eq!(format_response(formatted).as_str(), formatted);
    }

    #[test]
    fn formatting_is_idempotent() {
        let raw = "```html\n<p>Offer: $45.99, was $60.00</p>\n```";
        let once = format_response(raw);
        let twice = format_response(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn fence_and_prices_combine() {
        let raw = "```html\nShipping costs $5.00.\n```";
        assert_eq!(
            format_response(raw).as_str(),
            "Shipping costs <strong>$5.00</strong>."
        );
    }

    #[test]
    fn non_ascii_text_passes_through() {
        assert_eq!(
            format_response("el café costs $3.50 más").as_str(),
            "el café costs <strong>$3.50</strong> más"
        );
    }

    #[test]
    fn empty_input_yields_empty_markup() {
        assert_eq!(format_response("").as_str(), "");
        assert_eq!(format_response("```html\n```").as_str(), "");
    }
}
