use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{CrawlError, Result};

/// HTTP side of the crawl: comic pages as text, images as bytes.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the HTML at `url`. Non-2xx responses are errors.
    #[instrument(skip(self))]
    pub async fn page(&self, url: &str) -> Result<String> {
        debug!("fetching page");
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| CrawlError::network(url, e))
    }

    #[instrument(skip(self))]
    pub async fn image(&self, url: &str) -> Result<Bytes> {
        debug!("fetching image");
        let response = self.get(url).await?;
        response
            .bytes()
            .await
            .map_err(|e| CrawlError::network(url, e))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| CrawlError::network(url, e))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn downloader() -> Downloader {
        Downloader::new("xkcd-fetch-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_page_text_and_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/comics/barrel.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&server)
            .await;

        let dl = downloader();
        let html = dl.page(&format!("{}/1/", server.uri())).await.unwrap();
        assert_eq!(html, "<html>ok</html>");

        let bytes = dl
            .image(&format!("{}/comics/barrel.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = downloader()
            .page(&format!("{}/9999/", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let dl = Downloader::new("xkcd-fetch-test", Duration::from_millis(200)).unwrap();
        let err = dl.page(&format!("{}/1/", server.uri())).await.unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
