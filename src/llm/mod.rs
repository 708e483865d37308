pub mod client;

pub use client::{GeminiClient, GenerateRequest, GenerateResponse, GenerativeClient, LlmConfig, Turn};
