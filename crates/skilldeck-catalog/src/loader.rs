//! Catalog document loading and validation
//!
//! The catalog is one static JSON document, fetched once at start-up. There
//! is no pagination or incremental loading at the source and no retry.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use skilldeck_types::CatalogDocument;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

// RFC 3986 unreserved characters
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("valid slug regex"));

/// Where the catalog document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Served over HTTP(S)
    Url(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl CatalogSource {
    /// Detect the source kind from a configured string
    #[must_use]
    pub fn detect(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    /// Human-readable location, used in errors and logs
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Fetch and parse the catalog document. Identity checks happen in
    /// [`Catalog::from_document`](crate::Catalog::from_document).
    pub async fn fetch(&self) -> Result<CatalogDocument> {
        let body = match self {
            Self::Url(url) => fetch_url(url).await?,
            Self::File(path) => tokio::fs::read_to_string(path).await?,
        };

        let document: CatalogDocument = serde_json::from_str(&body)?;

        info!(
            "Loaded catalog from {} ({} skills)",
            self.location(),
            document.skills.len()
        );
        Ok(document)
    }
}

async fn fetch_url(url: &str) -> Result<String> {
    debug!(url, "Fetching catalog document");

    let response = reqwest::get(url).await.map_err(|e| CatalogError::Fetch {
        location: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| CatalogError::Fetch {
        location: url.to_string(),
        reason: e.to_string(),
    })
}

/// Check the identity invariants of a document: unique ids, unique URL-safe slugs
pub fn validate_document(document: &CatalogDocument) -> Result<()> {
    let mut ids = HashSet::with_capacity(document.skills.len());
    let mut slugs = HashSet::with_capacity(document.skills.len());

    for skill in &document.skills {
        if !ids.insert(skill.id) {
            return Err(CatalogError::Invalid(format!(
                "duplicate skill id {}",
                skill.id
            )));
        }

        if !SLUG_REGEX.is_match(&skill.slug) {
            return Err(CatalogError::Invalid(format!(
                "skill {} has a slug that is not URL-safe: '{}'",
                skill.id, skill.slug
            )));
        }

        if !slugs.insert(skill.slug.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "duplicate skill slug '{}'",
                skill.slug
            )));
        }
    }

    Ok(())
}
