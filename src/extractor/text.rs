use scraper::{ElementRef, Selector};
use serde::Deserialize;

use super::{Extractor, Value, deserialize_nullable_selector};

/// Collects the text of the first element matching `selector`, trimmed.
#[derive(Debug, Deserialize)]
pub struct Text {
    #[serde(default, deserialize_with = "deserialize_nullable_selector")]
    selector: Option<Selector>,
}

#[typetag::deserialize]
impl Extractor for Text {
    fn extract(&self, element: ElementRef) -> Value {
        let elem = if let Some(selector) = &self.selector {
            element.select(selector).next()
        } else {
            Some(element)
        };
        if let Some(elem) = elem {
            let text = elem.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                Value::Empty
            } else {
                Value::Single(text.to_owned())
            }
        } else {
            Value::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn trims_element_text() {
        let doc = Html::parse_document(r#"<div id="ctitle">  Barrel - Part 1 </div>"#);
        let text = Text {
            selector: Some(Selector::parse("#ctitle").unwrap()),
        };
        assert_eq!(
            text.extract(doc.root_element()),
            Value::Single("Barrel - Part 1".to_owned())
        );
    }

    #[test]
    fn blank_or_missing_is_empty() {
        let doc = Html::parse_document(r#"<div id="ctitle">   </div>"#);
        let text = Text {
            selector: Some(Selector::parse("#ctitle").unwrap()),
        };
        assert_eq!(text.extract(doc.root_element()), Value::Empty);

        let text = Text {
            selector: Some(Selector::parse("#middleContainer").unwrap()),
        };
        assert_eq!(text.extract(doc.root_element()), Value::Empty);
    }
}
