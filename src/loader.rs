//! Dataset loader
//!
//! Fetches the drug dataset once, from HTTP or disk, retrying failed attempts
//! with exponential backoff. The TUI runs the fetch as a background task
//! behind a [`LoadHandle`]; headless commands just `.await` [`DataLoader::fetch`].

use crate::catalog::Catalog;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Upper bound for a single backoff sleep
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Server answered with a non-2xx status
    Http { status: u16 },
    /// Transport failure (DNS, refused connection, timeout)
    Network(String),
    /// Local file could not be read
    Io(String),
    /// Body was not valid JSON
    Parse(String),
    /// Data source string could not be turned into a URL or path
    InvalidSource(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { status } => write!(f, "HTTP {}", status),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Io(msg) => write!(f, "Read error: {}", msg),
            Self::Parse(msg) => write!(f, "Invalid JSON: {}", msg),
            Self::InvalidSource(msg) => write!(f, "Invalid data source: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl LoadError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidSource(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data source
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(Url),
    File(PathBuf),
}

impl DataSource {
    /// Interpret a configured data source.
    ///
    /// - `http://` / `https://` URLs are fetched over the network
    /// - `file://` URLs and paths that exist on disk are read locally
    /// - other absolute paths (`/data/data.json`) are resolved against `base_url`
    /// - anything else is treated as a relative file path
    pub fn resolve(source: &str, base_url: &str) -> Result<Self, LoadError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(LoadError::InvalidSource("empty data source".to_string()));
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source)
                .map_err(|e| LoadError::InvalidSource(format!("{}: {}", source, e)))?;
            return Ok(Self::Http(url));
        }

        if source.starts_with("file://") {
            let path = Url::parse(source)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| LoadError::InvalidSource(source.to_string()))?;
            return Ok(Self::File(path));
        }

        let path = PathBuf::from(source);
        if path.exists() || !source.starts_with('/') {
            return Ok(Self::File(path));
        }

        let base = Url::parse(base_url)
            .map_err(|e| LoadError::InvalidSource(format!("base_url {}: {}", base_url, e)))?;
        let url = base
            .join(source)
            .map_err(|e| LoadError::InvalidSource(format!("{}: {}", source, e)))?;
        Ok(Self::Http(url))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loader
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Base for the exponential backoff
    pub retry_delay: Duration,
    /// How long a loaded dataset counts as fresh
    pub stale_after: Duration,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            retries: 2,
            retry_delay: Duration::from_millis(1000),
            stale_after: Duration::from_secs(300),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Backoff before retry number `attempt` (0-based), capped at 30s
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

pub struct DataLoader {
    client: reqwest::Client,
    source: DataSource,
    options: LoaderOptions,
}

impl DataLoader {
    pub fn new(source: DataSource, options: LoaderOptions) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| LoadError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            source,
            options,
        })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// One attempt, no retries
    pub async fn fetch_once(&self) -> Result<Catalog, LoadError> {
        let bytes = match &self.source {
            DataSource::Http(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Http {
                        status: status.as_u16(),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?
                    .to_vec()
            }
            DataSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?,
        };

        Catalog::from_slice(&bytes).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Fetch with retries. Returns the last error once attempts run out.
    pub async fn fetch(&self) -> Result<Catalog, LoadError> {
        let mut attempt = 0;
        loop {
            tracing::debug!("Loading dataset from {} (attempt {})", self.source, attempt + 1);

            match self.fetch_once().await {
                Ok(catalog) => {
                    tracing::info!("Loaded {} drugs from {}", catalog.len(), self.source);
                    return Ok(catalog);
                }
                Err(e) if attempt < self.options.retries && e.is_retryable() => {
                    let delay = retry_delay(self.options.retry_delay, attempt);
                    tracing::warn!(
                        "Dataset load failed: {} (retrying in {}ms)",
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Dataset load failed after {} attempt(s): {}",
                        attempt + 1,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Run [`fetch`](Self::fetch) in the background
    pub fn spawn(self: &Arc<Self>) -> LoadHandle {
        let (tx, rx) = mpsc::channel(1);
        let loader = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = loader.fetch().await;
            let _ = tx.send(result).await;
        });
        LoadHandle { rx, task }
    }
}

/// Owner of an in-flight load. Dropping it aborts the fetch, retry sleeps
/// included, so a torn-down UI never receives a late result.
pub struct LoadHandle {
    rx: mpsc::Receiver<Result<Catalog, LoadError>>,
    task: JoinHandle<()>,
}

impl LoadHandle {
    /// Wait for the outcome. `None` once it has been delivered.
    pub async fn recv(&mut self) -> Option<Result<Catalog, LoadError>> {
        self.rx.recv().await
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Load state
// ─────────────────────────────────────────────────────────────────────────────

/// A loaded dataset and when it arrived
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    catalog: Catalog,
    fetched_at: Instant,
}

impl CachedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            fetched_at: Instant::now(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    pub fn is_stale(&self, window: Duration) -> bool {
        self.age() >= window
    }
}

/// What the UI shows for the dataset
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed(LoadError),
    Ready(CachedCatalog),
}

impl LoadState {
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Ready(cached) => Some(cached.catalog()),
            _ => None,
        }
    }

    /// Fold a load outcome into the state. A failed refresh keeps the data
    /// already on screen; returns the error so the caller can report it.
    pub fn apply(&mut self, result: Result<Catalog, LoadError>) -> Option<LoadError> {
        match result {
            Ok(catalog) => {
                *self = Self::Ready(CachedCatalog::new(catalog));
                None
            }
            Err(e) => {
                if !matches!(self, Self::Ready(_)) {
                    *self = Self::Failed(e.clone());
                }
                Some(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DATASET: &str = r#"[
        {"name": "Amoxicillin", "subdrugs": [{"name": "Amoxicillin 500mg", "sediaan": "tablet", "fpktp": true}]},
        {"name": "Paracetamol", "subdrugs": []}
    ]"#;

    fn fast_options() -> LoaderOptions {
        LoaderOptions {
            retry_delay: Duration::from_millis(5),
            ..LoaderOptions::default()
        }
    }

    /// Serve `router` on an ephemeral port, returning the base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Route that fails `failures` times before serving `body`
    fn flaky(hits: Arc<AtomicUsize>, failures: usize, body: &'static str) -> Router {
        Router::new().route(
            "/data/data.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                    } else {
                        (StatusCode::OK, body.to_string())
                    }
                }
            }),
        )
    }

    async fn http_loader(router: Router) -> DataLoader {
        let base = serve(router).await;
        let source = DataSource::resolve("/data/data.json", &base).unwrap();
        DataLoader::new(source, fast_options()).unwrap()
    }

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let base = Duration::from_millis(1000);
        assert_eq!(retry_delay(base, 0), Duration::from_millis(1000));
        assert_eq!(retry_delay(base, 1), Duration::from_millis(2000));
        assert_eq!(retry_delay(base, 3), Duration::from_millis(8000));
        assert_eq!(retry_delay(base, 10), Duration::from_secs(30));
        assert_eq!(retry_delay(base, 40), Duration::from_secs(30));
    }

    #[test]
    fn test_resolve_sources() {
        let base = "http://localhost:8080";
        assert_eq!(
            DataSource::resolve("/data/data.json", base).unwrap(),
            DataSource::Http(Url::parse("http://localhost:8080/data/data.json").unwrap())
        );
        assert!(matches!(
            DataSource::resolve("https://example.org/d.json", base).unwrap(),
            DataSource::Http(_)
        ));
        assert_eq!(
            DataSource::resolve("data/data.json", base).unwrap(),
            DataSource::File(PathBuf::from("data/data.json"))
        );
        assert_eq!(
            DataSource::resolve("file:///tmp/d.json", base).unwrap(),
            DataSource::File(PathBuf::from("/tmp/d.json"))
        );
        assert!(DataSource::resolve("  ", base).is_err());
    }

    #[test]
    fn test_http_error_display() {
        assert_eq!(LoadError::Http { status: 500 }.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let loader = http_loader(flaky(hits.clone(), 0, DATASET)).await;

        let catalog = loader.fetch().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.drugs()[0].name, "Amoxicillin");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_retries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let loader = http_loader(flaky(hits.clone(), usize::MAX, DATASET)).await;

        let err = loader.fetch().await.unwrap_err();
        assert_eq!(err, LoadError::Http { status: 500 });
        // First attempt plus two retries
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_recovers_within_retry_budget() {
        let hits = Arc::new(AtomicUsize::new(0));
        let loader = http_loader(flaky(hits.clone(), 2, DATASET)).await;

        let catalog = loader.fetch().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_array_body_is_empty_catalog() {
        let hits = Arc::new(AtomicUsize::new(0));
        let loader = http_loader(flaky(hits, 0, r#"{"error": "nope"}"#)).await;

        let catalog = loader.fetch().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, DATASET).unwrap();

        let loader = DataLoader::new(DataSource::File(path), fast_options()).unwrap();
        assert_eq!(loader.fetch().await.unwrap().len(), 2);

        let missing = DataLoader::new(
            DataSource::File(dir.path().join("missing.json")),
            LoaderOptions {
                retries: 0,
                ..fast_options()
            },
        )
        .unwrap();
        assert!(matches!(missing.fetch().await, Err(LoadError::Io(_))));
    }

    #[tokio::test]
    async fn test_spawned_load_delivers_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let loader = Arc::new(http_loader(flaky(hits, 0, DATASET)).await);

        let mut handle = loader.spawn();
        assert_eq!(handle.recv().await.unwrap().unwrap().len(), 2);
        assert!(handle.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_retries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(flaky(hits.clone(), usize::MAX, DATASET)).await;
        let source = DataSource::resolve("/data/data.json", &base).unwrap();
        let options = LoaderOptions {
            retry_delay: Duration::from_millis(200),
            ..LoaderOptions::default()
        };
        let loader = Arc::new(DataLoader::new(source, options).unwrap());

        let handle = loader.spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_millis(700)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_dataset() {
        let mut state = LoadState::Loading;
        assert!(state.apply(Ok(Catalog::default())).is_none());
        assert!(state.catalog().is_some());

        let err = state.apply(Err(LoadError::Http { status: 503 }));
        assert_eq!(err, Some(LoadError::Http { status: 503 }));
        assert!(matches!(state, LoadState::Ready(_)));

        let mut state = LoadState::Loading;
        state.apply(Err(LoadError::Network("refused".to_string())));
        assert!(matches!(state, LoadState::Failed(_)));
    }

    #[test]
    fn test_cached_catalog_staleness() {
        let cached = CachedCatalog::new(Catalog::default());
        assert!(!cached.is_stale(Duration::from_secs(300)));
        assert!(cached.is_stale(Duration::ZERO));
    }
}
