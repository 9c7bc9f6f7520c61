//! Chat-completion model invocation
//!
//! The planner only needs "prompt in, text and token usage out"; everything
//! else about the remote model stays behind [`ChatProvider`].

pub mod provider;
mod provider_openai;

pub use provider::*;
pub use provider_openai::{parse_completion, OpenAiCompatProvider};
