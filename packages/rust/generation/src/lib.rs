//! Prompt assembly and the generative-text service client.
//!
//! [`build_prompt`] wraps normalized input in the fixed SRS instructions;
//! [`GenerationClient`] sends it to the Gemini `generateContent` endpoint in
//! exactly one request and returns the completion text.

mod client;
mod prompt;

pub use client::GenerationClient;
pub use prompt::{PROMPT_TEMPLATE, build_prompt, prompt_digest};
