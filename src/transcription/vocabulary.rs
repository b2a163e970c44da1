//! Grocery-domain vocabulary hint for the transcription service.
//!
//! Whisper accepts a free-text `prompt` that biases recognition toward the
//! expected domain.  Supplying common grocery words noticeably improves
//! accuracy on short, noisy shopping-list utterances.

/// Common Brazilian-Portuguese grocery items, in the order they are sent.
pub const GROCERY_VOCABULARY: &[&str] = &[
    "arroz", "feijão", "maçã", "banana", "leite", "pão", "tomate", "cebola", "alho", "batata",
    "carne", "frango", "peixe", "queijo", "manteiga", "café", "açúcar", "sal", "óleo", "azeite",
];

/// Build the `prompt` field value sent with every transcription request.
pub fn vocabulary_prompt() -> String {
    format!("Lista de compras: {}", GROCERY_VOCABULARY.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_domain() {
        assert!(vocabulary_prompt().starts_with("Lista de compras:"));
    }

    #[test]
    fn prompt_contains_staples() {
        let prompt = vocabulary_prompt();
        for word in ["arroz", "feijão", "leite", "pão", "tomate"] {
            assert!(prompt.contains(word), "missing {word}");
        }
    }

    #[test]
    fn vocabulary_is_comma_joined() {
        let prompt = vocabulary_prompt();
        assert!(prompt.contains("arroz, feijão"));
    }
}
