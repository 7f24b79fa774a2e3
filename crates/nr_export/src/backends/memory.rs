use std::sync::Arc;

use async_trait::async_trait;
use nr_core::Result;
use tokio::sync::RwLock;

use crate::{ArticleExporter, ExportRow};

/// Keeps the last export in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    rows: Arc<RwLock<Vec<ExportRow>>>,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<ExportRow> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl ArticleExporter for MemoryExporter {
    fn name(&self) -> &str {
        "memory"
    }

    async fn export(&self, rows: &[ExportRow]) -> Result<()> {
        let mut stored = self.rows.write().await;
        *stored = rows.to_vec();
        Ok(())
    }
}
