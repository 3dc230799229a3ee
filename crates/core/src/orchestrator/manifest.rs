//! The build manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use super::types::BuildError;
use crate::processor::CategoryReport;

/// File name of the manifest under the output root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Aggregate description of one build's output.
///
/// Keys of `styles` are category short names; each value is the sorted list
/// of icon ids built for that category. Categories with no built icons are
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(with = "generated_at_format")]
    pub generated_at: DateTime<Utc>,
    pub styles: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    /// Merges category reports into a manifest.
    ///
    /// Reports that share a short name are unioned into one key.
    pub fn from_reports(generated_at: DateTime<Utc>, reports: &[CategoryReport]) -> Self {
        let mut styles: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for report in reports.iter().filter(|r| !r.succeeded_ids.is_empty()) {
            styles
                .entry(report.short_name.clone())
                .or_default()
                .extend(report.succeeded_ids.iter().cloned());
        }

        for ids in styles.values_mut() {
            ids.sort();
            ids.dedup();
        }

        Self {
            generated_at,
            styles,
        }
    }

    /// Total icons across all styles.
    pub fn icon_count(&self) -> usize {
        self.styles.values().map(Vec::len).sum()
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the manifest to `path` through a temporary sibling and a rename.
    ///
    /// Returns the hex SHA-256 of the written bytes.
    pub async fn write_atomic(&self, path: &Path) -> Result<String, BuildError> {
        let json = self.to_json()?;
        let digest = sha256_hex(json.as_bytes());

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = std::path::PathBuf::from(temp_name);

        let write_error = |source| BuildError::ManifestWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Err(e) = tokio::fs::write(&temp_path, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(e));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(e));
        }

        Ok(digest)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
mod generated_at_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
