//! Backend contract, availability probing, and the tiered selection engine.

pub mod backend;
pub mod output;
pub mod probe;
pub mod prompt;
pub mod retry;
pub mod router;

pub use backend::{Backend, Engine, GenerationRequest, GenerationResult, Mode};
pub use output::clean_completion;
pub use prompt::{ChatMessage, SYSTEM_INSTRUCTION, build_user_prompt, chat_messages};
pub use router::LlmRouter;
