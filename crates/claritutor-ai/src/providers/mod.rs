pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;
