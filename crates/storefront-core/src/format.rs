//! # Formatting Helpers
//!
//! Text helpers for product pages: slugs, truncation, currency and dates.

use chrono::NaiveDate;

use crate::money::Money;

/// Turns `text` into a URL slug.
///
/// Lower-cases, drops everything except letters, digits, `_`, `-` and
/// whitespace, turns whitespace runs into `-`, collapses repeated hyphens and
/// strips them from both ends.
///
/// ```rust
/// use storefront_core::format::slugify;
///
/// assert_eq!(slugify("  Mens Casual Premium Slim Fit T-Shirts "), "mens-casual-premium-slim-fit-t-shirts");
/// ```
pub fn slugify(text: &str) -> String {
    slug_body(text).trim_matches('-').to_string()
}

/// Product slug: `slug_body(title)-id`.
///
/// Leading and trailing hyphens of the title part are kept; the id makes the
/// slug unique.
pub fn create_slug(title: &str, id: impl std::fmt::Display) -> String {
    format!("{}-{}", slug_body(title), id)
}

fn slug_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            continue;
        }
        if pending_space {
            push_hyphen(&mut out);
            pending_space = false;
        }
        if c == '-' {
            push_hyphen(&mut out);
        } else {
            out.push(c);
        }
    }

    out
}

fn push_hyphen(out: &mut String) {
    if !out.ends_with('-') {
        out.push('-');
    }
}

/// Cuts `text` to `max_len` characters and appends `...` when it was longer.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head.trim())
}

/// US-style currency with thousands separators: `$1,234.56`.
pub fn format_currency(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.dollars().abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}${grouped}.{:02}", amount.cents_part())
}

/// Long US date: `October 16, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
