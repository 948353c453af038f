mod schema;
mod traits;
mod weaviate;

pub use schema::{CollectionSchema, PropertySchema};
pub use traits::{ChunkRecord, StoreError, VectorStore};
pub use weaviate::WeaviateStore;
