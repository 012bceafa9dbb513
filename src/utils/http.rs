// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Raw response of a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into [`AppError::Fetch`].
    pub fn into_success(self, context: impl Into<String>) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(AppError::fetch(context, self.status))
        }
    }
}

/// Anything that can GET a URL and hand back status and body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

#[async_trait]
impl PageFetcher for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// In-memory fetcher for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Answers by URL suffix; unknown URLs fail like a refused connection.
    #[derive(Default)]
    pub struct StubFetcher {
        routes: Vec<(String, FetchedPage)>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn route(mut self, suffix: &str, page: FetchedPage) -> Self {
            self.routes.push((suffix.to_string(), page));
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(suffix, _)| url.ends_with(suffix.as_str()))
                .map(|(_, page)| page.clone())
                .ok_or_else(|| {
                    AppError::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        format!("no route for {url}"),
                    ))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(FetchedPage::ok("").is_success());
        assert!(
            !FetchedPage {
                status: 404,
                body: String::new()
            }
            .is_success()
        );
    }

    #[test]
    fn into_success_maps_status() {
        let page = FetchedPage {
            status: 429,
            body: "slow down".to_string(),
        };
        let err = page.into_success("posting 7").unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }
}
