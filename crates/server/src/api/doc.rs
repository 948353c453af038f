//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI document, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "doclift API",
        description = "Document to markdown conversion, sliding-window chunking, and vector-store indexing.",
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Conversion", description = "PDF, DOCX, HTML, Markdown and text to markdown"),
        (name = "Chunking", description = "Fixed-size overlapping character windows"),
        (name = "Indexing", description = "Convert, chunk and store in the vector database"),
    ),
    paths(
        crate::api::health::health,
        crate::api::convert::convert_url,
        crate::api::convert::convert_file,
        crate::api::convert::convert_file_raw,
        crate::api::chunk::chunk,
        crate::api::index::index_file,
        crate::api::index::index_url,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::convert::ConvertUrlRequest,
        crate::api::convert::ConvertUrlResponse,
        crate::api::convert::ConvertFileResponse,
        crate::api::chunk::ChunkRequest,
        crate::api::chunk::ChunkResponse,
        crate::api::chunk::ChunkView,
        crate::api::index::IndexFileResponse,
        crate::api::index::IndexUrlRequest,
        crate::api::index::IndexUrlResponse,
    ))
)]
pub struct ApiDoc;
