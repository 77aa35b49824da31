pub mod client;
pub mod config;
pub mod llm;
pub mod options;
pub mod prompt;
pub mod server;
