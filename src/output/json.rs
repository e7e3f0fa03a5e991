//! JSON article files
//!
//! Every source that yields at least one article gets its own file per run:
//!
//! ```text
//! output_dir/
//! ├── g1_20260105_143000.json
//! ├── folha_20260105_143012.json
//! └── estadao_20260105_143031.json
//! ```

use crate::config::OutputConfig;
use crate::sources::Article;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File layout written for one source
#[derive(Debug, Serialize)]
struct SourceFile<'a> {
    source: &'a str,
    scraped_at: DateTime<Utc>,
    article_count: usize,
    data_lite_mode: bool,
    config_hash: &'a str,
    articles: &'a [Article],
}

/// Writes per-source article files into one directory
#[derive(Debug, Clone)]
pub struct JsonOutput {
    directory: PathBuf,
    data_lite: bool,
    config_hash: String,
}

impl JsonOutput {
    pub fn new(directory: impl Into<PathBuf>, data_lite: bool, config_hash: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            data_lite,
            config_hash: config_hash.into(),
        }
    }

    pub fn from_config(config: &OutputConfig, config_hash: impl Into<String>) -> Self {
        Self::new(&config.directory, config.data_lite, config_hash)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `articles` for one source
    ///
    /// Returns the path written, or `None` when there was nothing to write.
    ///
    /// # Output Path
    ///
    /// `{directory}/{source_key}_{YYYYmmdd_HHMMSS}.json`, local time
    pub async fn write_source(
        &self,
        source_key: &str,
        source_name: &str,
        articles: &[Article],
    ) -> crate::Result<Option<PathBuf>> {
        if articles.is_empty() {
            return Ok(None);
        }

        let file = SourceFile {
            source: source_name,
            scraped_at: Utc::now(),
            article_count: articles.len(),
            data_lite_mode: self.data_lite,
            config_hash: &self.config_hash,
            articles,
        };
        let json = serde_json::to_string_pretty(&file)?;

        fs::create_dir_all(&self.directory).await?;

        let filename = format!(
            "{}_{}.json",
            source_key.to_lowercase(),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.directory.join(filename);

        fs::write(&path, json).await?;
        tracing::info!(
            path = %path.display(),
            count = articles.len(),
            "Saved articles"
        );

        Ok(Some(path))
    }
}
