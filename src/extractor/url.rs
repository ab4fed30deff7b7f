use scraper::ElementRef;
use serde::Deserialize;
use tracing::warn;

use super::{Attr, Extractor, Value};

/// An [`Attr`] whose value is a link, made absolute against the page URL.
#[derive(Deserialize)]
pub struct Url {
    inner: Attr,
}

#[typetag::deserialize]
impl Extractor for Url {
    fn extract(&self, element: ElementRef) -> Value {
        match self.inner.extract(element) {
            Value::Single(link) if !link.trim().is_empty() => Value::Single(link.trim().to_owned()),
            _ => Value::Empty,
        }
    }

    fn extract_with_base(&self, element: ElementRef, base: &::url::Url) -> Value {
        let Value::Single(link) = self.extract(element) else {
            return Value::Empty;
        };
        match base.join(&link) {
            Ok(url) => Value::Single(url.into()),
            Err(e) => {
                warn!("cannot resolve {} against {}: {}", link, base, e);
                Value::Empty
            }
        }
    }
}
