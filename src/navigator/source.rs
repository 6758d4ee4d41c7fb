//! Pack resource retrieval
//!
//! A resource id is resolved against a base location: a directory on disk or
//! an `http(s)://` URL. Retrieval is the only asynchronous step of a load.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use super::error::LoadError;

/// Something that can hand over the full text of a pack
#[async_trait]
pub trait ResourceSource {
    /// Human-readable location of a resource, for diagnostics
    fn locate(&self, resource_id: &str) -> String;

    async fn fetch(&self, resource_id: &str) -> Result<String, LoadError>;
}

fn decode_text(bytes: Vec<u8>, location: String) -> Result<String, LoadError> {
    String::from_utf8(bytes).map_err(|_| LoadError::NotText { location })
}

/// Packs stored as files under a base directory
#[derive(Debug, Clone)]
pub struct FileSource {
    base: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    pub fn path_for(&self, resource_id: &str) -> PathBuf {
        self.base.join(resource_id)
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    fn locate(&self, resource_id: &str) -> String {
        self.path_for(resource_id).display().to_string()
    }

    async fn fetch(&self, resource_id: &str) -> Result<String, LoadError> {
        let path = self.path_for(resource_id);
        debug!(path = %path.display(), "reading pack");

        let bytes = tokio::fs::read(&path).await.map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        decode_text(bytes, path.display().to_string())
    }
}

/// Packs served over HTTP below a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base: Url) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    /// The base is treated as a directory even without a trailing slash
    pub fn with_client(base: Url, client: reqwest::Client) -> Self {
        let base = if base.path().ends_with('/') {
            base
        } else {
            let mut dir = base;
            let path = format!("{}/", dir.path());
            dir.set_path(&path);
            dir
        };

        Self { base, client }
    }

    pub fn url_for(&self, resource_id: &str) -> Result<Url, LoadError> {
        self.base
            .join(resource_id)
            .map_err(|e| LoadError::Location {
                location: format!("{}{}", self.base, resource_id),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    fn locate(&self, resource_id: &str) -> String {
        match self.url_for(resource_id) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base, resource_id),
        }
    }

    async fn fetch(&self, resource_id: &str) -> Result<String, LoadError> {
        let url = self.url_for(resource_id)?;
        debug!(%url, "fetching pack");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| LoadError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;
        decode_text(bytes.to_vec(), url.to_string())
    }
}

/// Either a directory or a URL, chosen from a base string
#[derive(Debug, Clone)]
pub enum Source {
    File(FileSource),
    Http(HttpSource),
}

impl Source {
    /// `http://` and `https://` bases fetch over the network, anything else is a directory
    pub fn from_base(base: &str) -> Self {
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                Self::Http(HttpSource::new(url))
            }
            _ => Self::File(FileSource::new(base)),
        }
    }
}

#[async_trait]
impl ResourceSource for Source {
    fn locate(&self, resource_id: &str) -> String {
        match self {
            Self::File(s) => s.locate(resource_id),
            Self::Http(s) => s.locate(resource_id),
        }
    }

    async fn fetch(&self, resource_id: &str) -> Result<String, LoadError> {
        match self {
            Self::File(s) => s.fetch(resource_id).await,
            Self::Http(s) => s.fetch(resource_id).await,
        }
    }
}

/// Packs held in memory, keyed by resource id
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    packs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pack(mut self, resource_id: &str, text: &str) -> Self {
        self.packs.insert(resource_id.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl ResourceSource for MemorySource {
    fn locate(&self, resource_id: &str) -> String {
        format!("memory:{}", resource_id)
    }

    async fn fetch(&self, resource_id: &str) -> Result<String, LoadError> {
        self.packs
            .get(resource_id)
            .cloned()
            .ok_or_else(|| LoadError::Io {
                path: self.locate(resource_id),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}
