pub mod client;

pub use client::{CompletionError, OpenAiClient, TextCompletion};
