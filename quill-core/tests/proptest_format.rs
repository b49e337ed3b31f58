//! Property-Based Tests for the response formatter.
//!
//! Uses `proptest` to verify the formatting invariants under random inputs:
//! idempotence over its own output, exact price-shape matching, and fence
//! stripping being equivalent to formatting the inner content directly.

use proptest::prelude::*;

use quill_core::format::format_response;

// ---------------------------------------------------------------------------
// Property: formatting is idempotent on fence-free input
// ---------------------------------------------------------------------------

proptest! {
    // Backticks are excluded: a text that still contains fence markers after
    // one pass is outside the formatter's contract (it only ever strips one
    // wrapping fence).
    #[test]
    fn format_is_idempotent(s in "[A-Za-z0-9 $.,<>/_-]{0,64}") {
        let once = format_response(&s);
        let twice = format_response(once.as_str());
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Property: exactly-two-decimal prices are always bolded
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn two_decimal_prices_are_bolded(dollars in 0u32..100_000, cents in 0u32..100) {
        let price = format!("${dollars}.{cents:02}");
        let text = format!("the offer is {price} this week");
        let formatted = format_response(&text);
        prop_assert!(
            formatted.as_str().contains(&format!("<strong>{price}</strong>")),
            "expected {} bolded in {}",
            price,
            formatted.as_str()
        );
    }
}

// ---------------------------------------------------------------------------
// Property: one-decimal and bare amounts are never touched
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn non_price_shapes_are_untouched(dollars in 0u32..100_000, tenth in 0u32..10) {
        let text = format!("totals: ${dollars} and ${dollars}.{tenth} end");
        let formatted = format_response(&text);
        prop_assert_eq!(formatted.as_str(), text.as_str());
    }
}

// ---------------------------------------------------------------------------
// Property: fenced content formats the same as its interior
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fence_wrapping_is_transparent(s in "[A-Za-z0-9 $.,<>/_-]{0,64}") {
        let fenced = format!("```html\n{s}\n```");
        prop_assert_eq!(format_response(&fenced), format_response(&s));
    }
}
