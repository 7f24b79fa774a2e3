use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nr_core::{Error, Result};
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::debug;

use crate::{ArticleExporter, ExportRow, COLUMNS};

/// Writes rows to a single-sheet workbook with a header row.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    path: PathBuf,
}

impl XlsxExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn workbook_bytes(rows: &[ExportRow]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        sheet.write_string(line, 0, row.title.as_str())?;
        sheet.write_string(line, 1, row.date.as_str())?;
        sheet.write_string(line, 2, row.description.as_str())?;
        sheet.write_string(line, 3, row.picture_filename.as_str())?;
        sheet.write_number(line, 4, row.search_phrase_count as f64)?;
        sheet.write_boolean(line, 5, row.mentions_money)?;
    }

    workbook.save_to_buffer()
}

#[async_trait]
impl ArticleExporter for XlsxExporter {
    fn name(&self) -> &str {
        "xlsx"
    }

    async fn export(&self, rows: &[ExportRow]) -> Result<()> {
        let body = workbook_bytes(rows).map_err(|e| Error::Export(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, body).await?;
        debug!("Wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
