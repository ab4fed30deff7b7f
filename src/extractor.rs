pub mod attr;
pub mod text;
pub mod url;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Deserializer};

pub use attr::Attr;
pub use text::Text;
pub use self::url::Url;

#[derive(Debug, PartialEq)]
pub enum Value {
    /// Nothing matched
    Empty,
    Single(String),
}

impl Value {
    pub fn into_option(self) -> Option<String> {
        match self {
            Value::Single(v) => Some(v),
            Value::Empty => None,
        }
    }
}

#[typetag::deserialize(tag = "type")]
pub trait Extractor: Send + Sync {
    fn extract(&self, element: ElementRef) -> Value;

    /// Like [`Extractor::extract`], for extractors whose value depends on the
    /// address of the page being read.
    fn extract_with_base(&self, element: ElementRef, _base: &::url::Url) -> Value {
        self.extract(element)
    }
}

/// Where the three pieces of a comic page live in its markup.
#[derive(Deserialize)]
pub struct PageExtractor {
    pub title: Box<dyn Extractor>,
    pub caption: Box<dyn Extractor>,
    pub image_url: Box<dyn Extractor>,
}

impl PageExtractor {
    pub fn extract_title(&self, root: ElementRef) -> Value {
        self.title.extract(root)
    }

    pub fn extract_caption(&self, root: ElementRef) -> Value {
        self.caption.extract(root)
    }

    pub fn extract_image_url(&self, root: ElementRef, page_url: &::url::Url) -> Value {
        self.image_url.extract_with_base(root, page_url)
    }
}

fn deserialize_nullable_selector<'de, D>(deserializer: D) -> Result<Option<Selector>, D::Error>
where
    D: Deserializer<'de>,
{
    let option_str: Option<String> = Option::deserialize(deserializer)?;

    match option_str {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Selector::parse(&s)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("Invalid selector '{}': {}", s, e))),
        None => Ok(None),
    }
}
