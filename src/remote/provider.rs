//! Hosted providers and the response shape each one returns.

use std::fmt;
use std::str::FromStr;

/// JSON layout of a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"choices": [{"message": {"content": "..."}}]}`
    Chat,
    /// `{"output": {"choices": [{"text": "..."}]}}`
    Completion,
}

/// Supported hosted APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Together.ai chat completions.
    #[default]
    Together,
    /// Together.ai legacy inference endpoint.
    TogetherInference,
    /// OpenAI chat completions.
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Together => "together",
            Provider::TogetherInference => "together-inference",
            Provider::OpenAi => "openai",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Together | Provider::TogetherInference => "Together.ai",
            Provider::OpenAi => "OpenAI",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Provider::Together => "https://api.together.xyz/v1/chat/completions",
            Provider::TogetherInference => "https://api.together.xyz/inference",
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Together | Provider::TogetherInference => {
                "mistralai/Mistral-7B-Instruct-v0.2"
            }
            Provider::OpenAi => "gpt-3.5-turbo",
        }
    }

    pub fn shape(&self) -> ResponseShape {
        match self {
            Provider::Together | Provider::OpenAi => ResponseShape::Chat,
            Provider::TogetherInference => ResponseShape::Completion,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "together" => Ok(Provider::Together),
            "together-inference" | "together_inference" => Ok(Provider::TogetherInference),
            "openai" => Ok(Provider::OpenAi),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}
