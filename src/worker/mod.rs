//! The digest pipeline: selection, batching, reduction and rendering

pub mod chunk;
pub mod collect;
pub mod deliver;
pub mod handler;
pub mod summarize;

// Re-export the main entry points for convenience
pub use handler::{DigestOutcome, list_conversations, run_digest};

