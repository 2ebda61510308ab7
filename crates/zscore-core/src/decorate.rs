//! # Page Decoration
//!
//! Colours score elements on a rendered page.
//!
//! The page itself is an external collaborator reached through
//! [`PageDocument`] and [`PageElement`]; [`crate::page::Page`] is the
//! in-memory implementation used by the CLI, the API and the tests.
//!
//! ## Rules
//!
//! - `.z-score-value`: score from `data-score` (when present and non-empty)
//!   or the text content. Gets the band colour, bold weight and a summary
//!   title.
//! - `.test-stat-card`: score from the first descendant carrying
//!   `data-avg-score`. The card gets a coloured left border, the descendant
//!   the band colour.
//!
//! Anything that does not parse as a number is left exactly as it was.

use crate::classify::classify;
use crate::format::to_fixed;
use crate::percentile::percentile;
use crate::primitives::{AVG_SCORE_ATTRIBUTE, SCORE_ATTRIBUTE, SCORE_VALUE_CLASS, STAT_CARD_CLASS};
use serde::{Deserialize, Serialize};

// =============================================================================
// COLLABORATOR TRAITS
// =============================================================================

/// A single element of a page.
pub trait PageElement {
    /// Attribute value, `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;

    /// Set one inline style property.
    fn set_style(&mut self, property: &str, value: &str);

    /// Set the hover title.
    fn set_title(&mut self, title: &str);

    /// First descendant (excluding self) that carries `name`.
    fn descendant_with_attribute(&self, name: &str) -> Option<&Self>;

    /// Mutable form of [`PageElement::descendant_with_attribute`].
    fn descendant_with_attribute_mut(&mut self, name: &str) -> Option<&mut Self>;
}

/// A page that can enumerate its elements by class.
pub trait PageDocument {
    type Element: PageElement;

    /// Visit every element carrying `class`, in document order.
    fn for_each_with_class(&mut self, class: &str, visit: &mut dyn FnMut(&mut Self::Element));
}

// =============================================================================
// REPORT
// =============================================================================

/// What a decoration pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationReport {
    /// Elements (or cards) that received styling.
    pub decorated: usize,
    /// Elements whose value did not parse and were left untouched.
    pub skipped: usize,
}

// =============================================================================
// DECORATION
// =============================================================================

/// Apply band colours to every score element and statistic card in `document`.
pub fn apply_colors<D: PageDocument>(document: &mut D) -> DecorationReport {
    let mut report = DecorationReport::default();

    document.for_each_with_class(SCORE_VALUE_CLASS, &mut |element: &mut D::Element| {
        if decorate_score_value(element) {
            report.decorated += 1;
        } else {
            report.skipped += 1;
        }
    });

    document.for_each_with_class(STAT_CARD_CLASS, &mut |card: &mut D::Element| {
        if decorate_stat_card(card) {
            report.decorated += 1;
        } else {
            report.skipped += 1;
        }
    });

    tracing::debug!(
        decorated = report.decorated,
        skipped = report.skipped,
        "Applied Z-score colours"
    );
    report
}

fn decorate_score_value<E: PageElement>(element: &mut E) -> bool {
    let raw = element
        .attribute(SCORE_ATTRIBUTE)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| element.text_content());

    let Some(score) = parse_float(&raw) else {
        return false;
    };

    let band = classify(score);
    element.set_style("color", band.color());
    element.set_style("font-weight", "bold");
    element.set_title(&format!(
        "Z-Score: {} | {} | Percentil: {}%",
        to_fixed(score, 2),
        band.label(),
        percentile(score)
    ));
    true
}

fn decorate_stat_card<E: PageElement>(card: &mut E) -> bool {
    let Some(score_element) = card.descendant_with_attribute(AVG_SCORE_ATTRIBUTE) else {
        return false;
    };
    let Some(score) = score_element
        .attribute(AVG_SCORE_ATTRIBUTE)
        .and_then(|raw| parse_float(&raw))
    else {
        return false;
    };

    let color = classify(score).color();
    card.set_style("border-left", &format!("4px solid {}", color));
    if let Some(score_element) = card.descendant_with_attribute_mut(AVG_SCORE_ATTRIBUTE) {
        score_element.set_style("color", color);
    }
    true
}

// =============================================================================
// NUMBER PARSING
// =============================================================================

/// Lenient float parsing with browser `parseFloat` semantics.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"1.5 DP"` is `1.5`. `"Infinity"` (optionally signed) is accepted.
/// Returns `None` when no prefix is numeric (`"N/A"`, `""`, `"."`).
#[must_use]
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

// =============================================================================
// TESTS
// =============================================================================
