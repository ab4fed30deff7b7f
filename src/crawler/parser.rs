use std::sync::Arc;

use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SiteConfig;
use crate::error::{CrawlError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    pub caption: String,
    pub image_url: String,
}

#[derive(Clone)]
pub struct Parser {
    config: Arc<SiteConfig>,
}

impl Parser {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self { config }
    }

    /// Pulls title, caption and image URL out of a comic page.
    ///
    /// `page_url` is the address the HTML came from; relative and
    /// protocol-relative image sources are resolved against it.
    #[instrument(skip_all)]
    pub fn page(&self, html: &str, page_url: &str) -> Result<ParsedPage> {
        let base = Url::parse(page_url)
            .map_err(|e| CrawlError::parse(format!("invalid page url {}: {}", page_url, e)))?;
        let document = Html::parse_document(html);
        let root = document.root_element();
        let extractor = &self.config.page;

        let Some(title) = extractor.extract_title(root).into_option() else {
            return Err(CrawlError::parse("page has no title"));
        };

        let Some(image_url) = extractor.extract_image_url(root, &base).into_option() else {
            return Err(CrawlError::parse("page has no comic image"));
        };

        let Some(caption) = extractor.extract_caption(root).into_option() else {
            return Err(CrawlError::parse("comic image has no caption"));
        };

        debug!(%image_url, "page parsed");

        Ok(ParsedPage {
            title,
            caption,
            image_url,
        })
    }
}
