//! `init-collection`: provision the Weaviate chunk collection.

use anyhow::{bail, Context};
use tracing::info;

use doclift_core::config::WeaviateConfig;
use doclift_ingest::{CollectionSchema, WeaviateStore};

/// What `init_collection` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// An existing collection was deleted first.
    Recreated,
    /// `keep_existing` was set and the collection already existed.
    KeptExisting,
}

/// Validate configuration, then provision the collection it names.
pub async fn run(config: &WeaviateConfig, keep_existing: bool) -> anyhow::Result<InitOutcome> {
    if config.gemini_key_is_placeholder() {
        bail!("GEMINI_API_KEY is not configured (set it in .env, see https://aistudio.google.com/apikey)");
    }

    info!("Connecting to Weaviate at {}", config.url);
    let store = WeaviateStore::new(&config.url, &config.collection)
        .with_api_key(config.api_key.clone())
        .with_gemini_key(config.gemini_api_key.clone());
    let schema = CollectionSchema::chunk_collection(&config.collection, &config.embedding_model);

    let outcome = init_collection(&store, &schema, keep_existing).await?;
    info!("Collection '{}': {:?}", schema.name, outcome);
    info!("  vectorizer: text2vec-google ({})", schema.embedding_model);
    info!("  properties: {}", schema.property_names().join(", "));
    Ok(outcome)
}

/// Readiness check, optional delete, create.
pub async fn init_collection(
    store: &WeaviateStore,
    schema: &CollectionSchema,
    keep_existing: bool,
) -> anyhow::Result<InitOutcome> {
    let ready = store
        .is_ready()
        .await
        .with_context(|| format!("cannot reach Weaviate at {}", store.url()))?;
    if !ready {
        bail!("Weaviate at {} is not ready (is the container running?)", store.url());
    }

    let exists = store
        .collection_exists()
        .await
        .context("failed to look up existing collection")?;
    if exists && keep_existing {
        info!("Collection '{}' already exists, keeping it", store.collection());
        return Ok(InitOutcome::KeptExisting);
    }
    if exists {
        store
            .delete_collection()
            .await
            .context("failed to delete existing collection")?;
    }

    store
        .create_collection(schema)
        .await
        .context("failed to create collection")?;

    Ok(if exists { InitOutcome::Recreated } else { InitOutcome::Created })
}
