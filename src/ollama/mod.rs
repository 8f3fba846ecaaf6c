//! Local inference through an Ollama server.

pub mod client;

pub use client::OllamaBackend;
