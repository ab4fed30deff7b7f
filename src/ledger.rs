use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::error::{CrawlError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub caption: String,
    /// File name of the saved image, relative to the output directory.
    #[serde(default)]
    pub image: String,
    /// Absolute URL the image was downloaded from.
    #[serde(default)]
    pub image_url: String,
}

/// Completed pages, keyed by page number, and the file they persist to.
///
/// One mutex covers both [`Ledger::put`] and [`Ledger::save`], so a save
/// always serializes a state where every record is either fully present or
/// absent.
pub struct Ledger {
    path: PathBuf,
    pages: Mutex<BTreeMap<u32, PageRecord>>,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: Mutex::new(BTreeMap::new()),
        }
    }

    /// Reads the record file at `path`.
    ///
    /// A missing file is a first run; an unreadable or malformed one is
    /// logged and treated the same way.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let pages = match fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str::<BTreeMap<u32, PageRecord>>(&content) {
                Ok(pages) => {
                    info!("loaded {} pages from record", pages.len());
                    pages
                }
                Err(e) => {
                    warn!("record is not valid, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("record could not be read, starting empty: {}", e);
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            pages: Mutex::new(pages),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn contains(&self, page: u32) -> bool {
        self.pages.lock().await.contains_key(&page)
    }

    pub async fn put(&self, page: u32, record: PageRecord) {
        self.pages.lock().await.insert(page, record);
    }

    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.lock().await.is_empty()
    }

    pub async fn snapshot(&self) -> BTreeMap<u32, PageRecord> {
        self.pages.lock().await.clone()
    }

    /// Overwrites the record file with every page currently held.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed over the
    /// record, so a failed write leaves the previous record intact.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self) -> Result<()> {
        let pages = self.pages.lock().await;

        let json = serde_json::to_string_pretty(&*pages).map_err(|e| self.persistence(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| self.persistence(e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.persistence(e))?;

        info!("saved {} pages", pages.len());
        Ok(())
    }

    fn persistence(&self, e: impl std::fmt::Display) -> CrawlError {
        CrawlError::Persistence {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}
