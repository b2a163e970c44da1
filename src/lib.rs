//! Feirinha — voice capture for Portuguese shopping lists.
//!
//! Hold to record, speak your groceries, release, and get back a clean
//! list: one normalized item per entry, in the order you said them.
//!
//! # Pipeline
//!
//! ```text
//! press ─▶ VoiceRecorder (state machine, push-to-talk + drag-to-lock)
//!            └─▶ Microphone (cpal) ─▶ AudioChunk buffer
//! release ─▶ CaptureValidator (duration + size gates) ─▶ AudioCapture (WAV)
//!              └─▶ VoicePipeline
//!                    ├─▶ Transcriber  — Whisper API, Portuguese
//!                    └─▶ ItemExtractor — chat model, one item per line
//! ```
//!
//! Each layer is a trait seam (`Microphone`, `Transcriber`,
//! `ItemExtractor`) so tests run against mocks and the binary wires the
//! real backends from [`config::AppConfig`].

pub mod audio;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod recorder;
pub mod service;
pub mod transcription;
