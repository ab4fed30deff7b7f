use std::path::PathBuf;

use bytes::Bytes;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{CrawlError, Result};

static IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

/// Writes comic images into the output directory.
#[derive(Clone)]
pub struct Processor {
    image_dir: PathBuf,
}

impl Processor {
    pub fn new(image_dir: PathBuf) -> Self {
        Self { image_dir }
    }

    /// `0353_python.png` for page 353 served from `.../comics/python.png`.
    pub fn image_filename(page: u32, image_url: &str) -> String {
        let remote = Url::parse(image_url)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_owned))
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "image".to_owned());

        let lower = remote.to_ascii_lowercase();
        if !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            warn!("\"{}\" does not look like an image file name", remote);
        }

        format!("{:04}_{}", page, remote)
    }

    #[instrument(skip(self, image_bytes))]
    pub async fn write_image(&self, page: u32, image_url: &str, image_bytes: Bytes) -> Result<String> {
        let filename = Self::image_filename(page, image_url);
        let image_path = self.image_dir.join(&filename);

        fs::write(&image_path, &image_bytes)
            .await
            .map_err(|source| CrawlError::Io {
                path: image_path.clone(),
                source,
            })?;

        info!("image saved to {}", image_path.display());
        Ok(filename)
    }
}
