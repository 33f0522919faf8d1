use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, info};

use crate::docgen::{DocGenError, DocumentMerger};
use crate::models::merge::MergePayload;

/// Writes each generated PDF to its own file under `dir`, reads it back and
/// removes it. Concurrent requests never share a path.
#[derive(Debug, Clone)]
pub struct PdfOutput {
    dir: PathBuf,
}

impl PdfOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Runs the merge and round-trips the result through a unique file.
    /// Nothing is left behind on success or failure.
    pub async fn generate(
        &self,
        merger: &dyn DocumentMerger,
        template: &Path,
        payload: &MergePayload,
    ) -> Result<Bytes, DocGenError> {
        let pdf = merger.merge(template, payload).await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let dir = self.dir.clone();
        let file = blocking(move || {
            tempfile::Builder::new()
                .prefix("cv-")
                .suffix(".pdf")
                .tempfile_in(dir)
        })
        .await?;
        debug!(path = %file.path().display(), "Writing generated PDF");

        // A failed write or read drops `file`, which removes it.
        tokio::fs::write(file.path(), &pdf).await?;
        let data = tokio::fs::read(file.path()).await?;
        blocking(move || file.close()).await?;

        info!(
            template = %template.display(),
            bytes = data.len(),
            "PDF document generated successfully"
        );
        Ok(Bytes::from(data))
    }
}

/// Runs blocking file-system work off the async worker threads.
async fn blocking<T, F>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(std::io::Error::other)?
}
