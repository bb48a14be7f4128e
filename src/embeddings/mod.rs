// Embeddings module
// HTTP client for the Ollama-style embedding server

pub mod client;

pub use client::EmbeddingClient;
