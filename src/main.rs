//! Application entry point — Feirinha voice capture.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the HTTP backends ([`WhisperApiTranscriber`], [`ChatExtractor`])
//!    and wire them into a [`VoicePipeline`].
//! 4. Open a [`VoiceRecorder`] over the default cpal microphone.
//! 5. Run a line-driven push-to-talk loop on stdin until `q`.
//!
//! The terminal loop stands in for the touch surface: Enter toggles
//! press/release, `l` locks the recording hands-free, `c` cancels, `q`
//! quits.  Errors print their Portuguese user message and clear after a
//! short delay, like a status toast would.

use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use feirinha::{
    audio::CpalMicrophone,
    config::AppConfig,
    extract::ChatExtractor,
    pipeline::{PipelineError, TransientMessage, VoicePipeline},
    recorder::{RecordingState, VoiceRecorder},
    transcription::WhisperApiTranscriber,
};

fn print_help() {
    println!("Comandos:");
    println!("  <Enter>  iniciar / parar gravação");
    println!("  l        travar gravação (mãos livres)");
    println!("  c        cancelar gravação");
    println!("  q        sair");
}

fn error_toast(err: &PipelineError) -> TransientMessage {
    log::debug!("pipeline error: {err}");
    TransientMessage::new(err.user_message())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Feirinha starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Pipeline backends
    let pipeline = VoicePipeline::new(
        Arc::new(WhisperApiTranscriber::from_config(&config.api)),
        Arc::new(ChatExtractor::from_config(&config.api)),
    );

    // 4. Recorder over the default input device
    let mut recorder = VoiceRecorder::new(
        Arc::new(CpalMicrophone::new()),
        config.audio.capture_request(),
        config.audio.validator(),
    );

    print_help();

    // 5. Input loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut toast: Option<TransientMessage> = None;

    loop {
        // Re-show the last error until its display window closes.
        if let Some(current) = toast.take() {
            if !current.is_expired() {
                println!("⚠ {}", current.text());
                toast = Some(current);
            }
        }

        print!("[{}] ", recorder.state().label());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "q" => {
                if recorder.state().holds_microphone() {
                    recorder.cancel().await?;
                }
                break;
            }

            "c" => {
                if recorder.state().holds_microphone() {
                    recorder.cancel().await?;
                    println!("Gravação cancelada.");
                } else {
                    print_help();
                }
            }

            "l" => match recorder.lock() {
                Ok(()) => println!("Gravação travada. Pressione Enter para parar."),
                Err(e) => toast = Some(error_toast(&e.into())),
            },

            "" => match recorder.state() {
                RecordingState::Idle => {
                    if let Err(e) = recorder.start().await {
                        toast = Some(error_toast(&e.into()));
                        continue;
                    }
                    println!("Gravando… pressione Enter para parar.");
                }

                RecordingState::Recording | RecordingState::Locked => {
                    let capture = match recorder.stop().await {
                        Ok(capture) => capture,
                        Err(e) => {
                            toast = Some(error_toast(&e.into()));
                            continue;
                        }
                    };

                    match pipeline.process_voice(capture).await {
                        Ok(outcome) => {
                            println!("Transcrição: {}", outcome.transcript);
                            println!("Itens:");
                            for item in &outcome.items {
                                println!("  • {item}");
                            }
                        }
                        Err(e) => toast = Some(error_toast(&e)),
                    }

                    recorder.finish()?;
                }

                RecordingState::Processing => {
                    // Enter while a result is pending just re-arms the loop.
                    recorder.finish()?;
                }
            },

            _ => print_help(),
        }
    }

    log::info!("Feirinha shutting down");
    Ok(())
}
