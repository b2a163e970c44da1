//! Prompt builder for shopping-list item extraction.
//!
//! [`ExtractionPrompt`] produces the `(system_msg, user_msg)` pair sent to an
//! OpenAI-compatible `/v1/chat/completions` endpoint.  The system message
//! carries the extraction rules and few-shot examples; the user message is
//! the raw transcript, untouched.
//!
//! The instructions are Portuguese-only, matching the transcription stage.

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

/// Extraction rules plus few-shot examples, in Portuguese.
///
/// The rules pin down the output contract the parser relies on: one item
/// per line, title-cased, quantities stripped, singular form, compound
/// phrases split, and an empty response when nothing was mentioned.
const SYSTEM_INSTRUCTION: &str = "\
Você é um assistente que extrai itens de lista de compras de textos em português.
Regras:
1. Extraia APENAS itens de compras mencionados
2. Retorne cada item em uma linha separada
3. Capitalize a primeira letra de cada palavra
4. Remova quantidades e detalhes desnecessários (mantenha apenas o nome do item)
5. Se não houver itens, retorne uma linha vazia
6. Normalize nomes similares (ex: \"tomate\" e \"tomates\" vira \"Tomate\")
7. Separe itens compostos se fizer sentido (ex: \"arroz e feijão\" vira duas linhas: \"Arroz\" e \"Feijão\")

Exemplos:
Entrada: \"preciso comprar leite, pão e 2 quilos de tomate\"
Saída:
Leite
Pão
Tomate

Entrada: \"adiciona arroz e feijão na lista\"
Saída:
Arroz
Feijão

Entrada: \"coloca maçã\"
Saída:
Maçã";

// ---------------------------------------------------------------------------
// ExtractionPrompt
// ---------------------------------------------------------------------------

/// Builds the chat messages for one extraction call.
///
/// # Example
/// ```rust
/// use feirinha::extract::ExtractionPrompt;
///
/// let (system, user) = ExtractionPrompt::build_chat("coloca maçã");
/// assert!(system.contains("lista de compras"));
/// assert_eq!(user, "coloca maçã");
/// ```
pub struct ExtractionPrompt;

impl ExtractionPrompt {
    /// Build a **(system_msg, user_msg)** pair for the given transcript.
    ///
    /// The transcript goes into the user message verbatim; mixing it into
    /// the system message would let spoken text override the rules.
    pub fn build_chat(transcript: &str) -> (String, String) {
        (SYSTEM_INSTRUCTION.to_string(), transcript.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
