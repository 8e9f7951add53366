//! HTTP downloader
//!
//! Streams a resolved download URL into the session folder. The body goes to a
//! `.part` file first and is renamed into place once complete.

use futures::{Stream, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::files::{atomic_rename, create_temp_path, file_name_from_url};
use crate::downloader::core::{DownloadError, FileOperation, Result};

/// A file written to disk by [`HttpDownloader`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Fetches raw bytes and persists them under a sanitized name
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` into `dest_dir`, naming the file after the URL's last segment
    ///
    /// A file with the same computed name is overwritten.
    pub async fn download_to_dir(&self, url: &str, dest_dir: &Path) -> Result<SavedFile> {
        let file_name = file_name_from_url(url)?;
        let dest_path = dest_dir.join(file_name);
        let size = self.download_to_file(url, &dest_path).await?;
        Ok(SavedFile { path: dest_path, size })
    }

    /// Stream `url` to `dest_path`
    pub async fn download_to_file(&self, url: &str, dest_path: &Path) -> Result<u64> {
        debug!("Stream downloading: {} to {}", url, dest_path.display());

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::NetworkTimeout { url: url.to_string() }
            } else {
                DownloadError::HttpRequest {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let temp_path = create_temp_path(dest_path);
        let chunks = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| DownloadError::HttpRequest {
                url: url.to_string(),
                source: e,
            })
        });
        let downloaded = write_chunks(chunks, &temp_path).await?;

        if let Err(e) = atomic_rename(&temp_path, dest_path).await {
            discard_temp_file(&temp_path).await;
            return Err(e);
        }
        debug!("Downloaded {} bytes to {}", downloaded, dest_path.display());

        Ok(downloaded)
    }
}

/// Write every chunk to `temp_path`; the file is removed if anything fails
async fn write_chunks<S, B>(chunks: S, temp_path: &Path) -> Result<u64>
where
    S: Stream<Item = Result<B>>,
    B: AsRef<[u8]>,
{
    let mut chunks = std::pin::pin!(chunks);
    let written = async {
        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| DownloadError::file_system(temp_path, FileOperation::Create, e))?;

        let mut downloaded = 0u64;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            let bytes = chunk.as_ref();
            file.write_all(bytes)
                .await
                .map_err(|e| DownloadError::file_system(temp_path, FileOperation::Write, e))?;
            downloaded += bytes.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::file_system(temp_path, FileOperation::Write, e))?;
        Ok::<u64, DownloadError>(downloaded)
    }
    .await;

    if written.is_err() {
        discard_temp_file(temp_path).await;
    }
    written
}

async fn discard_temp_file(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        debug!("Could not remove {}: {}", temp_path.display(), e);
    }
}
