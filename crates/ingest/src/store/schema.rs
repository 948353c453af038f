//! Weaviate class definitions.

use serde_json::{json, Value};

const VECTORIZER: &str = "text2vec-google";
/// Google AI Studio endpoint (as opposed to Vertex AI).
const AI_STUDIO_ENDPOINT: &str = "generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    /// Weaviate data type, e.g. `text` or `int`.
    pub data_type: String,
    pub description: String,
    /// When true the vectorizer ignores this property.
    pub skip_vectorization: bool,
}

impl PropertySchema {
    fn new(name: &str, data_type: &str, description: &str, skip_vectorization: bool) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            description: description.to_string(),
            skip_vectorization,
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "dataType": [self.data_type],
            "description": self.description,
            "moduleConfig": {
                VECTORIZER: {
                    "skip": self.skip_vectorization,
                    "vectorizePropertyName": false,
                }
            }
        })
    }
}

/// A collection (Weaviate class) vectorized by Gemini embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub name: String,
    pub description: String,
    pub embedding_model: String,
    pub properties: Vec<PropertySchema>,
}

impl CollectionSchema {
    /// The chunk collection: only `content` is vectorized.
    pub fn chunk_collection(name: &str, embedding_model: &str) -> Self {
        Self {
            name: name.to_string(),
            description: "Course document chunks".to_string(),
            embedding_model: embedding_model.to_string(),
            properties: vec![
                PropertySchema::new("content", "text", "Chunk text", false),
                PropertySchema::new("source", "text", "Source filename or URL", true),
                PropertySchema::new("section", "text", "Markdown section title", true),
                PropertySchema::new("chunk_index", "int", "Position of the chunk in its document", true),
            ],
        }
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Class definition accepted by `POST /v1/schema`.
    pub fn to_json(&self) -> Value {
        json!({
            "class": self.name,
            "description": self.description,
            "vectorizer": VECTORIZER,
            "moduleConfig": {
                VECTORIZER: {
                    "apiEndpoint": AI_STUDIO_ENDPOINT,
                    "modelId": self.embedding_model,
                    "vectorizeClassName": false,
                }
            },
            "properties": self.properties.iter().map(PropertySchema::to_json).collect::<Vec<_>>(),
        })
    }
}
