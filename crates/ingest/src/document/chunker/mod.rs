//! Sliding-window chunking engine.
//!
//! Splits converted documents into fixed-size, overlapping character windows
//! suitable for embedding. Sizes are counted in characters (Unicode scalar
//! values); no sentence, paragraph or token awareness.

mod sections;
mod types;
mod window;

pub use sections::section_labels;
pub use types::{Chunk, ChunkConfig, ChunkError, ChunkResult, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use window::{chunk, chunk_text};
