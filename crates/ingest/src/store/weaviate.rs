use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::schema::CollectionSchema;
use super::traits::{ChunkRecord, StoreError, VectorStore};

/// Weaviate REST (v1) client bound to one collection. Vectorization happens
/// server-side, so requests forward the Gemini key.
pub struct WeaviateStore {
    client: Client,
    url: String,
    collection: String,
    api_key: Option<String>,
    gemini_api_key: Option<String>,
}

#[derive(Deserialize)]
struct ObjectResponse {
    id: Option<String>,
}

impl WeaviateStore {
    pub fn new(url: &str, collection: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key: None,
            gemini_api_key: None,
        }
    }

    /// Weaviate API key, sent as a bearer token.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Gemini key forwarded to the `text2vec-google` module.
    pub fn with_gemini_key(mut self, key: Option<String>) -> Self {
        self.gemini_api_key = key;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, format!("{}{}", self.url, path));
        if let Some(key) = &self.gemini_api_key {
            req = req.header("X-Goog-Api-Key", key);
        }
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api { status, body })
    }

    /// `GET /v1/.well-known/ready`. Connection failures are reported as errors,
    /// a reachable but not-ready node as `false`.
    pub async fn is_ready(&self) -> Result<bool, StoreError> {
        let response = self
            .request(reqwest::Method::GET, "/v1/.well-known/ready")
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    pub async fn collection_exists(&self) -> Result<bool, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/v1/schema/{}", self.collection))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }

    pub async fn delete_collection(&self) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/v1/schema/{}", self.collection))
            .send()
            .await?;
        Self::check(response).await?;
        info!("Deleted collection '{}'", self.collection);
        Ok(())
    }

    pub async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, "/v1/schema")
            .json(&schema.to_json())
            .send()
            .await?;
        Self::check(response).await?;
        info!(
            "Created collection '{}' (model={}, properties={:?})",
            schema.name,
            schema.embedding_model,
            schema.property_names()
        );
        Ok(())
    }

    fn object_body(&self, id: &Uuid, record: &ChunkRecord) -> Value {
        let mut properties = Map::new();
        properties.insert("content".into(), json!(record.content));
        properties.insert("source".into(), json!(record.source));
        if let Some(section) = &record.section {
            properties.insert("section".into(), json!(section));
        }
        properties.insert("chunk_index".into(), json!(record.chunk_index));
        json!({
            "class": self.collection,
            "id": id.to_string(),
            "properties": properties,
        })
    }
}

#[async_trait]
impl VectorStore for WeaviateStore {
    async fn upsert(&self, record: &ChunkRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4();
        let response = self
            .request(reqwest::Method::POST, "/v1/objects")
            .json(&self.object_body(&id, record))
            .send()
            .await?;
        let parsed: ObjectResponse = Self::check(response).await?.json().await?;
        let stored = parsed.id.ok_or(StoreError::MissingId)?;
        debug!("Stored chunk {} of '{}' as {}", record.chunk_index, record.source, stored);
        Ok(stored)
    }
}
