//! Normalized shopping-list items and model-output parsing.

use std::fmt;

/// One normalized shopping-list entry.
///
/// Construction goes through [`ExtractedItem::new`], which applies
/// [`capitalize_words`] — so the display text is always in canonical form
/// and re-normalizing is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    display: String,
}

impl ExtractedItem {
    /// Normalize `raw` into the canonical display form.
    pub fn new(raw: &str) -> Self {
        Self {
            display: capitalize_words(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for ExtractedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Title-case every word: first letter uppercase, the rest lowercase.
///
/// Runs of whitespace collapse to a single space and surrounding
/// whitespace is trimmed, so the function is a fixed point — applying it
/// to its own output changes nothing.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the raw model response into ordered items.
///
/// One item per line: split on line breaks, trim, drop empty lines,
/// preserve the remaining order.  An empty result is valid here — the
/// orchestrator decides what it means.
pub fn parse_items(response: &str) -> Vec<ExtractedItem> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ExtractedItem::new)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- capitalize_words ---

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize_words("pão de queijo"), "Pão De Queijo");
    }

    #[test]
    fn lowers_the_rest_of_each_word() {
        assert_eq!(capitalize_words("LEITE CONDENSADO"), "Leite Condensado");
    }

    #[test]
    fn handles_accented_initials() {
        assert_eq!(capitalize_words("óleo"), "Óleo");
        assert_eq!(capitalize_words("açúcar"), "Açúcar");
    }

    #[test]
    fn normalization_is_a_fixed_point() {
        for raw in ["tomate", "Pão De Queijo", "  arroz   integral  ", "MAÇÃ"] {
            let once = capitalize_words(raw);
            assert_eq!(capitalize_words(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(capitalize_words(""), "");
        assert_eq!(capitalize_words("   "), "");
    }

    // --- parse_items ---

    #[test]
    fn parses_reference_response_in_order() {
        let items = parse_items("Leite\nPão\nTomate");
        let display: Vec<&str> = items.iter().map(ExtractedItem::as_str).collect();
        assert_eq!(display, vec!["Leite", "Pão", "Tomate"]);
    }

    #[test]
    fn trims_and_drops_blank_lines() {
        let items = parse_items("  Arroz  \n\n   \nFeijão\n");
        let display: Vec<&str> = items.iter().map(ExtractedItem::as_str).collect();
        assert_eq!(display, vec!["Arroz", "Feijão"]);
    }

    #[test]
    fn empty_response_yields_no_items() {
        assert!(parse_items("").is_empty());
        assert!(parse_items("\n\n").is_empty());
    }

    #[test]
    fn parse_renormalizes_sloppy_model_output() {
        let items = parse_items("leite\nPÃO");
        let display: Vec<&str> = items.iter().map(ExtractedItem::as_str).collect();
        assert_eq!(display, vec!["Leite", "Pão"]);
    }

    #[test]
    fn parsing_own_output_is_idempotent() {
        let first = parse_items("leite\npão\ntomate");
        let rejoined = first
            .iter()
            .map(ExtractedItem::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let second = parse_items(&rejoined);
        assert_eq!(first, second);
    }

    #[test]
    fn item_display_matches_as_str() {
        let item = ExtractedItem::new("queijo minas");
        assert_eq!(item.to_string(), item.as_str());
        assert_eq!(item.as_str(), "Queijo Minas");
    }
}
