use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder shipped in the sample `.env`; treated as "not configured".
pub const GEMINI_KEY_PLACEHOLDER: &str = "ta_clé_gemini_ici";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key lookup used while building a [`Config`]. Production code reads the
/// process environment; tests pass a closure over a fixed map.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(get: Lookup, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = get(&prefixed) {
            return Some(v);
        }
    }
    get(key)
}

fn profiled_or(get: Lookup, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(get, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_parse<T: std::str::FromStr>(get: Lookup, profile: &str, key: &str, default: T) -> T {
    profiled_opt(get, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_bool(get: Lookup, profile: &str, key: &str, default: bool) -> bool {
    match profiled_opt(get, profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Megabytes to bytes, saturating at `usize::MAX`.
fn mb_to_bytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub chunking: ChunkingConfig,
    pub converter: ConverterConfig,
    pub weaviate: WeaviateConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first)
    /// for a named profile. When set (e.g. `PROD`), every key is first looked
    /// up as `{PROFILE}_{KEY}`, falling back to `{KEY}`; an empty profile
    /// reads plain keys only.
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, &env_lookup)
    }

    fn from_lookup(profile: &str, get: Lookup) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_profiled(get, p),
            upload: UploadConfig::from_profiled(get, p),
            chunking: ChunkingConfig::from_profiled(get, p),
            converter: ConverterConfig::from_profiled(get, p),
            weaviate: WeaviateConfig::from_profiled(get, p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:     {}:{} cors={}", self.server.host, self.server.port, self.server.cors_origin);
        tracing::info!("  upload:     staging_dir={}, max={}MB", self.upload.staging_dir.display(), self.upload.max_upload_mb);
        tracing::info!("  chunking:   chunk_size={}, overlap={}", self.chunking.chunk_size, self.chunking.overlap);
        tracing::info!("  converter:  fetch_timeout={}s, max_fetch={}MB", self.converter.fetch_timeout_secs, self.converter.max_fetch_mb);
        tracing::info!(
            "  weaviate:   enabled={}, url={}, collection={}, gemini_key={}",
            self.weaviate.enabled,
            self.weaviate.url,
            self.weaviate.collection,
            if self.weaviate.gemini_api_key.is_some() { "set" } else { "(none)" },
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` for permissive CORS, otherwise a single allowed origin.
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_profiled(get: Lookup, p: &str) -> Self {
        Self {
            host: profiled_or(get, p, "HOST", "0.0.0.0"),
            port: profiled_parse(get, p, "PORT", 8000),
            cors_origin: profiled_or(get, p, "CORS_ORIGIN", "*"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Upload staging ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub staging_dir: PathBuf,
    pub max_upload_mb: usize,
}

impl UploadConfig {
    fn from_profiled(get: Lookup, p: &str) -> Self {
        Self {
            staging_dir: profiled_opt(get, p, "STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_upload_mb: profiled_parse(get, p, "MAX_UPLOAD_MB", 100),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        mb_to_bytes(self.max_upload_mb)
    }
}

// ── Chunking defaults ─────────────────────────────────────────

/// Service-wide chunking defaults, applied when a request omits a value.
/// Kept signed so that a misconfigured (≤ 0) value falls through to the
/// same default substitution a request value gets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: i64,
    pub overlap: i64,
}

impl ChunkingConfig {
    fn from_profiled(get: Lookup, p: &str) -> Self {
        Self {
            chunk_size: profiled_parse(get, p, "CHUNK_SIZE", 2000),
            overlap: profiled_parse(get, p, "CHUNK_OVERLAP", 200),
        }
    }
}

// ── Converter ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub fetch_timeout_secs: u64,
    pub max_fetch_mb: usize,
}

impl ConverterConfig {
    fn from_profiled(get: Lookup, p: &str) -> Self {
        Self {
            fetch_timeout_secs: profiled_parse(get, p, "FETCH_TIMEOUT_SECS", 60),
            max_fetch_mb: profiled_parse(get, p, "MAX_FETCH_MB", 100),
        }
    }

    pub fn max_fetch_bytes(&self) -> usize {
        mb_to_bytes(self.max_fetch_mb)
    }
}

// ── Weaviate (vector store) ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaviateConfig {
    /// Indexing endpoints are only mounted against a store when enabled.
    pub enabled: bool,
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub gemini_api_key: Option<String>,
    pub embedding_model: String,
}

impl WeaviateConfig {
    fn from_profiled(get: Lookup, p: &str) -> Self {
        Self {
            enabled: profiled_bool(get, p, "WEAVIATE_ENABLED", false),
            url: profiled_or(get, p, "WEAVIATE_URL", "http://localhost:8080"),
            api_key: profiled_opt(get, p, "WEAVIATE_API_KEY"),
            collection: profiled_or(get, p, "WEAVIATE_COLLECTION", "CoursBUT"),
            gemini_api_key: profiled_opt(get, p, "GEMINI_API_KEY"),
            embedding_model: profiled_or(get, p, "EMBEDDING_MODEL", "text-embedding-004"),
        }
    }

    /// True when the store is enabled and a usable Gemini key is present.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.gemini_key_is_placeholder()
    }

    /// True when the Gemini key is missing or still the sample placeholder.
    pub fn gemini_key_is_placeholder(&self) -> bool {
        match self.gemini_api_key.as_deref() {
            None => true,
            Some(k) => k.trim().is_empty() || k == GEMINI_KEY_PLACEHOLDER,
        }
    }
}
