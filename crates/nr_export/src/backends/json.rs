use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nr_core::Result;
use tracing::debug;

use crate::{ArticleExporter, ExportRow};

/// Writes rows as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArticleExporter for JsonExporter {
    fn name(&self) -> &str {
        "json"
    }

    async fn export(&self, rows: &[ExportRow]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(rows)?;
        tokio::fs::write(&self.path, body).await?;
        debug!("Wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
