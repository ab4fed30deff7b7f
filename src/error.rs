use std::path::PathBuf;

use thiserror::Error;

/// Failures a crawl can run into.
///
/// `Network`, `Parse` and `Io` stay inside the worker that hit them; they are
/// logged against the page and the worker moves on. `Usage` and `Persistence`
/// abort the run.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("{0}")]
    Usage(String),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Parse(String),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not persist {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },
}

impl CrawlError {
    /// Short label used when reporting a failed page.
    pub fn kind(&self) -> &'static str {
        match self {
            CrawlError::Usage(_) => "usage",
            CrawlError::Network { .. } => "network",
            CrawlError::Parse(_) => "parse",
            CrawlError::Io { .. } => "io",
            CrawlError::Persistence { .. } => "persistence",
        }
    }

    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        CrawlError::Network {
            url: url.to_owned(),
            source,
        }
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        CrawlError::Parse(msg.into())
    }
}

pub type Result<T, E = CrawlError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(CrawlError::parse("missing #ctitle").kind(), "parse");
        assert_eq!(CrawlError::Usage("bad".into()).kind(), "usage");
        let io = CrawlError::Io {
            path: PathBuf::from("output/0001_a.png"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(io.kind(), "io");
        assert!(io.to_string().contains("output/0001_a.png"));
    }
}
