use anyhow::{anyhow, Context, Result};
use framefit_core::RawFrameRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the raw frame catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "location", rename_all = "lowercase")]
pub enum CatalogSource {
    /// JSON array of records on disk.
    File(PathBuf),
    /// Endpoint returning the JSON array, e.g. `http://localhost:8080/all`.
    Http(String),
}

impl CatalogSource {
    /// `http://` and `https://` locations are endpoints, anything else a file.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Http(location.to_string())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }

    /// Bulk read of every record. One shot: no retry, no timeout.
    pub async fn fetch(&self) -> Result<Vec<RawFrameRecord>> {
        let records = match self {
            CatalogSource::File(path) => read_json_file(path)?,
            CatalogSource::Http(url) => fetch_http(url).await?,
        };
        info!(source = %self, records = records.len(), "Fetched frame catalog");
        Ok(records)
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Http(url) => f.write_str(url),
        }
    }
}

/// Read a JSON dump of the catalog.
pub fn read_json_file(path: &Path) -> Result<Vec<RawFrameRecord>> {
    let data = fs::read(path).with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    parse_records(&data).with_context(|| format!("Invalid catalog file {}", path.display()))
}

/// Write records as a JSON dump readable by [`read_json_file`].
pub fn write_json_file(path: &Path, records: &[RawFrameRecord]) -> Result<()> {
    let data = serde_json::to_vec_pretty(records).context("Failed to serialize catalog")?;
    fs::write(path, data).with_context(|| format!("Failed to write catalog file {}", path.display()))
}

async fn fetch_http(url: &str) -> Result<Vec<RawFrameRecord>> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| anyhow!("Failed to fetch catalog: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch catalog: HTTP {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| anyhow!("Failed to read catalog data: {}", e))?;

    parse_records(&bytes).with_context(|| format!("Invalid catalog from {}", url))
}

fn parse_records(data: &[u8]) -> Result<Vec<RawFrameRecord>> {
    let records: Vec<RawFrameRecord> = serde_json::from_slice(data)?;
    Ok(records)
}
