use std::path::PathBuf;

use nr_core::Result;
use tracing::debug;

/// File name for the picture of the article at `position` (1-based).
pub fn picture_filename(position: usize) -> String {
    format!("{}.jpg", position)
}

/// Downloads article pictures into an output directory.
#[derive(Debug, Clone)]
pub struct PictureDownloader {
    client: reqwest::Client,
    output_dir: PathBuf,
}

impl PictureDownloader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            output_dir: output_dir.into(),
        }
    }

    pub async fn download(&self, url: &str, filename: &str) -> Result<PathBuf> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, &bytes).await?;

        debug!("Downloaded {} ({} bytes) to {}", url, bytes.len(), path.display());
        Ok(path)
    }
}
