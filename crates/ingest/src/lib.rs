//! Document ingestion: text extraction, the [`convert::Converter`] capability,
//! sliding-window chunking, and the [`store::VectorStore`] capability.

pub mod convert;
pub mod document;
pub mod store;

pub use convert::{BuiltinConverter, ConversionError, Converter, SourceRef};
pub use document::chunker::{chunk, chunk_text, Chunk, ChunkConfig, ChunkError, ChunkResult};
pub use store::{ChunkRecord, CollectionSchema, StoreError, VectorStore, WeaviateStore};
