//! Shopping-list item extraction from Portuguese transcripts.
//!
//! This module provides:
//! * [`ItemExtractor`] — async trait implemented by all extraction backends.
//! * [`ChatExtractor`] — OpenAI-compatible `/v1/chat/completions` backend.
//! * [`ExtractionPrompt`] — builds the Portuguese extraction chat messages.
//! * [`ExtractedItem`] — one normalized list entry.
//! * [`capitalize_words`] / [`parse_items`] — normalization building blocks.
//!
//! Extraction is best-effort interpretation, not parsing: the model strips
//! quantities, singularizes, and splits compound phrases ("arroz e feijão"
//! becomes two items).  An empty result is a valid outcome here — deciding
//! whether that is an error belongs to the pipeline layer.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use feirinha::config::AppConfig;
//! use feirinha::extract::{ChatExtractor, ItemExtractor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let extractor = ChatExtractor::from_config(&config.api);
//!
//!     let items = extractor
//!         .extract("preciso comprar leite, pão e 2 quilos de tomate")
//!         .await
//!         .unwrap();
//!
//!     for item in items {
//!         println!("{item}");
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::service::ServiceError;

pub mod chat;
pub mod item;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::ChatExtractor;
pub use item::{capitalize_words, parse_items, ExtractedItem};
pub use prompt::ExtractionPrompt;

// ---------------------------------------------------------------------------
// ItemExtractor trait
// ---------------------------------------------------------------------------

/// Async trait for transcript-to-items extraction backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn ItemExtractor>`).
///
/// An `Ok(vec![])` return means the backend understood the transcript and
/// found no shopping items in it — that is not an error at this layer.
#[async_trait]
pub trait ItemExtractor: Send + Sync {
    async fn extract(&self, transcript: &str) -> Result<Vec<ExtractedItem>, ServiceError>;
}
