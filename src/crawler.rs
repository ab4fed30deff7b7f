pub mod downloader;
pub mod interrupt;
pub mod parser;
pub mod processor;
pub mod task;

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

pub use downloader::Downloader;
pub use interrupt::{Interrupt, RunState};
pub use parser::{ParsedPage, Parser};
pub use processor::Processor;
pub use task::TaskManager;

use crate::config::{AppConfig, SiteConfig};
use crate::error::CrawlError;
use crate::ledger::{Ledger, PageRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub page: u32,
    pub kind: &'static str,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub queued: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: Vec<FailedPage>,
    pub interrupted: bool,
}

#[derive(Default)]
struct WorkerOutcome {
    completed: usize,
    failed: Vec<FailedPage>,
}

#[derive(Clone)]
pub struct XkcdCrawler {
    site: Arc<SiteConfig>,
    parser: Parser,
    downloader: Downloader,
    processor: Processor,
    ledger: Arc<Ledger>,
    interrupt: Interrupt,
    threads: usize,
}

impl XkcdCrawler {
    pub fn new(
        site: SiteConfig,
        downloader: Downloader,
        processor: Processor,
        ledger: Arc<Ledger>,
        interrupt: Interrupt,
        threads: usize,
    ) -> Self {
        let site = Arc::new(site);
        Self {
            parser: Parser::new(Arc::clone(&site)),
            site,
            downloader,
            processor,
            ledger,
            interrupt,
            threads: threads.max(1),
        }
    }

    /// Creates the output directory, loads the record inside it and wires up
    /// a crawler from `config`.
    pub async fn from_config(config: &AppConfig, interrupt: Interrupt) -> Result<Self> {
        fs::create_dir_all(&config.output_dir).await.map_err(|e| {
            anyhow::anyhow!(
                "could not create output directory {}: {}",
                config.output_dir.display(),
                e
            )
        })?;

        let site = config.site()?;
        let downloader = Downloader::new(&config.user_agent, config.timeout())?;
        let processor = Processor::new(config.output_dir.clone());
        let ledger = Arc::new(Ledger::load(config.record_path()).await);

        Ok(Self::new(
            site,
            downloader,
            processor,
            ledger,
            interrupt,
            config.threads,
        ))
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Pages in `start..=end` that still need fetching, and how many were
    /// left out because they are recorded or on the site's skip list.
    pub async fn pending(&self, start: u32, end: u32) -> (VecDeque<u32>, usize) {
        let mut queue = VecDeque::new();
        let mut skipped = 0;

        for page in start..=end {
            if self.site.is_skipped(page) {
                info!("skipping page {}, it has no comic", page);
                skipped += 1;
            } else if self.ledger.contains(page).await {
                info!("skipping page {}, already downloaded", page);
                skipped += 1;
            } else {
                queue.push_back(page);
            }
        }

        (queue, skipped)
    }

    /// Fetches every pending page in `start..=end` and saves the record.
    ///
    /// Per-page failures end up in the report. The record is saved whether
    /// the queue ran dry or the run was interrupted; only a failed save is an
    /// error.
    #[instrument(skip(self))]
    pub async fn run(&self, start: u32, end: u32) -> Result<CrawlReport> {
        let (queue, skipped) = self.pending(start, end).await;
        let queued = queue.len();
        info!(
            "{} pages to fetch with {} workers ({} skipped)",
            queued, self.threads, skipped
        );

        let queue = Arc::new(Mutex::new(queue));
        let mut tasks = TaskManager::new();
        for id in 0..self.threads {
            tasks.spawn(self.clone().work(id, Arc::clone(&queue)));
        }
        let outcomes = tasks.wait().await;

        let interrupted = self.interrupt.state() == RunState::Draining;
        let mut report = CrawlReport {
            queued,
            skipped,
            interrupted,
            ..Default::default()
        };
        for outcome in outcomes {
            report.completed += outcome.completed;
            report.failed.extend(outcome.failed);
        }
        report.failed.sort_by_key(|f| f.page);

        if interrupted {
            info!("all workers stopped, saving progress");
        } else {
            info!("finished pages {} to {}", start, end);
        }

        self.ledger.save().await?;
        self.interrupt.finish();

        Ok(report)
    }

    async fn work(self, id: usize, queue: Arc<Mutex<VecDeque<u32>>>) -> WorkerOutcome {
        let mut outcome = WorkerOutcome::default();

        loop {
            let page = {
                let mut queue = queue.lock().await;
                // a stop may have landed while this worker waited on the lock
                if !self.interrupt.is_running() {
                    break;
                }
                queue.pop_front()
            };
            let Some(page) = page else {
                break;
            };

            info!(worker = id, "processing page {}", page);
            match self.process(page).await {
                Ok(()) => outcome.completed += 1,
                Err(e) => {
                    error!(worker = id, "page {} failed ({}): {}", page, e.kind(), e);
                    outcome.failed.push(FailedPage {
                        page,
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !self.interrupt.is_running() {
            warn!(worker = id, "worker stopped by interrupt");
        }
        outcome
    }

    /// One page, start to finish: HTML, metadata, image file, record.
    async fn process(&self, page: u32) -> Result<(), CrawlError> {
        let page_url = self.site.build_url(page);
        let html = self.downloader.page(&page_url).await?;
        let parsed = self.parser.page(&html, &page_url)?;
        let image = self.downloader.image(&parsed.image_url).await?;
        let filename = self
            .processor
            .write_image(page, &parsed.image_url, image)
            .await?;

        self.ledger
            .put(
                page,
                PageRecord {
                    title: parsed.title,
                    caption: parsed.caption,
                    image: filename,
                    image_url: parsed.image_url,
                },
            )
            .await;
        Ok(())
    }
}
