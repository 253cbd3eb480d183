//! Runtime configuration: header synonym sets and refresh settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnRole;
use crate::error::{CatalogError, Result};

/// Default refresh period of the background refresher
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Default file name substring that marks a price list
pub const DEFAULT_FILE_PATTERN: &str = "price";

const DEFAULT_NAME_LABELS: [&str; 4] = ["название", "продукт", "товар", "наименование"];
const DEFAULT_PRICE_LABELS: [&str; 2] = ["цена", "розница"];
const DEFAULT_WEIGHT_LABELS: [&str; 3] = ["фасовка", "масса", "вес"];

/// Normalizes a header cell or synonym label for comparison.
///
/// Strips a leading UTF-8 byte order mark, trims surrounding whitespace
/// and lowercases (Unicode-aware, so Cyrillic labels fold correctly).
pub fn normalize_label(label: &str) -> String {
    label.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Accepted header labels for each column role.
///
/// Labels are stored normalized; use [`HeaderSynonyms::new`] or
/// [`HeaderSynonyms::from_json_file`] so that invariant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSynonyms {
    pub name: Vec<String>,
    pub price: Vec<String>,
    pub weight: Vec<String>,
}

impl HeaderSynonyms {
    pub fn new<S: AsRef<str>>(name: &[S], price: &[S], weight: &[S]) -> Self {
        let norm = |labels: &[S]| -> Vec<String> {
            labels.iter().map(|l| normalize_label(l.as_ref())).collect()
        };
        Self {
            name: norm(name),
            price: norm(price),
            weight: norm(weight),
        }
    }

    /// Load synonym sets from a JSON file with `name`, `price` and `weight` arrays
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Synonyms {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let raw: HeaderSynonyms =
            serde_json::from_str(&content).map_err(|e| CatalogError::Synonyms {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let synonyms = Self::new(&raw.name[..], &raw.price[..], &raw.weight[..]);
        if let Some(role) = ColumnRole::ALL
            .into_iter()
            .find(|role| synonyms.labels(*role).is_empty())
        {
            return Err(CatalogError::Synonyms {
                path: path.to_path_buf(),
                reason: format!("no labels configured for {}", role.as_str()),
            });
        }

        log::info!(
            "Loaded header synonyms from {} ({} name, {} price, {} weight labels)",
            path.display(),
            synonyms.name.len(),
            synonyms.price.len(),
            synonyms.weight.len()
        );
        Ok(synonyms)
    }

    /// Labels configured for a role
    pub fn labels(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Name => &self.name,
            ColumnRole::Price => &self.price,
            ColumnRole::Weight => &self.weight,
        }
    }

    /// Check whether an already-normalized cell is a label for `role`
    pub fn matches(&self, role: ColumnRole, normalized: &str) -> bool {
        self.labels(role).iter().any(|l| l == normalized)
    }
}

impl Default for HeaderSynonyms {
    fn default() -> Self {
        Self::new(
            &DEFAULT_NAME_LABELS[..],
            &DEFAULT_PRICE_LABELS[..],
            &DEFAULT_WEIGHT_LABELS[..],
        )
    }
}

/// Settings for the background refresher
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Directory holding the price files
    pub directory: PathBuf,
    /// Time between the end of one cycle and the start of the next
    pub interval: Duration,
    /// Case-insensitive substring a file name must contain
    pub file_pattern: String,
    pub synonyms: HeaderSynonyms,
}

impl RefreshConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            interval: DEFAULT_INTERVAL,
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            synonyms: HeaderSynonyms::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_synonyms(mut self, synonyms: HeaderSynonyms) -> Self {
        self.synonyms = synonyms;
        self
    }
}
