pub mod gemini;
pub mod llm;
pub mod openrouter;
pub mod security;
mod session_store;

pub use session_store::SessionStore;
