//! AI Speech - Speech-to-Text and Text-to-Speech clients
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (OpenAI Whisper)
//! - `TextToSpeech` - Synthesize speech from SSML and list voices (Azure Speech)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{AzureSpeechProvider, OpenAISpeechProvider, SpeechToText, TextToSpeech, VoiceInfo};
//!
//! let stt = OpenAISpeechProvider::new(config.clone())?;
//! let transcription = stt.transcribe(bytes, "audio/ogg; codecs=opus").await?;
//!
//! let tts = AzureSpeechProvider::new(config)?;
//! let audio = tts.synthesize("Hola", &VoiceInfo::default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod ssml;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{azure::AzureSpeechProvider, openai::OpenAISpeechProvider};
pub use types::{SynthesizedAudio, Transcription, VoiceInfo};
