use crate::query_builder::FilterConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Input configuration document. Unknown fields are ignored so older input
/// files keep working.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub filters: FilterConfig,
    /// Raw cookie-header string, e.g. "name=value; name2=value2".
    #[serde(default)]
    pub cookies: String,
    #[serde(default)]
    pub use_proxies: bool,
    #[serde(default)]
    pub proxy_source: Option<PathBuf>,
}

fn default_pages() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input config {:?}", path))?;
        let config: RunConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse input config {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_deserializes() {
        let config: RunConfig = serde_json::from_str(
            r#"{
                "queries": ["python developer"],
                "pages": 3,
                "per_page": 25,
                "filters": {
                    "experience": ["expert"],
                    "payment_type": ["hourly"],
                    "verified_only": true,
                    "budget_min": 100
                },
                "cookies": "session=abc",
                "use_proxies": true,
                "proxy_source": "data/proxies.txt"
            }"#,
        )
        .unwrap();
        assert_eq!(config.queries, vec!["python developer"]);
        assert_eq!(config.pages, 3);
        assert_eq!(config.per_page, 25);
        assert_eq!(config.filters.experience, vec!["expert"]);
        assert!(config.filters.verified_only);
        assert_eq!(config.filters.budget_min, Some(100));
        assert!(config.use_proxies);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert!(config.queries.is_empty());
        assert_eq!(config.pages, 1);
        assert_eq!(config.per_page, 10);
        assert!(config.cookies.is_empty());
        assert!(!config.use_proxies);
        assert!(config.proxy_source.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(RunConfig::load("no/such/input.json").is_err());
    }
}
