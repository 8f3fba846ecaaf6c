//! Hosted chat/completion APIs over authenticated HTTPS.

pub mod client;
pub mod provider;

pub use client::RemoteBackend;
pub use provider::{Provider, ResponseShape};
