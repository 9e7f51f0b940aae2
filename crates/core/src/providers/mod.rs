pub mod traits;

// Generative-AI provider implementations
pub mod gemini;
