use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::errors::SourceError;
use crate::models::SubscriptionResult;
use crate::sources::{SubscriptionFormat, parse_subscription};
use crate::utils::{TextFetcher, UrlUtils};

/// Concurrent subscription downloader
///
/// Every URL is fetched at most once per call, bounded by `max_concurrency`
/// in-flight requests and by `timeout` per request. A failing URL yields an
/// empty, failed [`SubscriptionResult`] and never affects the others.
#[derive(Clone)]
pub struct SubscriptionFetcher {
    fetcher: Arc<dyn TextFetcher>,
    timeout: Duration,
    max_concurrency: usize,
}

impl SubscriptionFetcher {
    pub fn new(fetcher: Arc<dyn TextFetcher>, timeout: Duration, max_concurrency: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetch and parse a single subscription
    pub async fn fetch_one(&self, url: &str) -> SubscriptionResult {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        info!("Fetching subscription: {}", safe_url);

        let body = match tokio::time::timeout(self.timeout, self.fetcher.fetch_text(url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                error!("Failed to fetch subscription {}: {}", safe_url, e);
                return SubscriptionResult::failed(url);
            }
            Err(_) => {
                let e = SourceError::Timeout {
                    url: safe_url.clone(),
                };
                error!("Failed to fetch subscription {}: {}", safe_url, e);
                return SubscriptionResult::failed(url);
            }
        };

        let format = SubscriptionFormat::detect(&body);
        let channels = parse_subscription(&body);
        if channels.is_empty() {
            warn!("No channels parsed from {} ({} format)", safe_url, format);
        } else {
            info!(
                "Parsed {} channels from {} ({} format)",
                channels.len(),
                safe_url,
                format
            );
        }

        SubscriptionResult {
            url: url.to_string(),
            channels,
            failed: false,
        }
    }

    /// Fetch all subscriptions; results arrive in completion order
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<SubscriptionResult> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!(
            "Fetching {} subscriptions (max {} concurrent)",
            urls.len(),
            self.max_concurrency
        );

        // owned URLs and fetcher handles keep the future `Send + 'static`
        stream::iter(urls.to_vec())
            .map(|url| {
                let fetcher = self.clone();
                async move { fetcher.fetch_one(&url).await }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::errors::SourceResult;

    #[derive(Default)]
    struct MockFetcher {
        bodies: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl MockFetcher {
        fn with_body(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn with_delay(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl TextFetcher for MockFetcher {
        async fn fetch_text(&self, url: &str) -> SourceResult<String> {
            self.calls.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays.get(url).copied().unwrap_or(Duration::from_millis(10));
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.bodies.get(url).cloned().ok_or(SourceError::Http {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    fn fetcher(mock: MockFetcher, max_concurrency: usize) -> (SubscriptionFetcher, Arc<MockFetcher>) {
        let mock = Arc::new(mock);
        let fetcher = SubscriptionFetcher::new(mock.clone(), Duration::from_secs(10), max_concurrency);
        (fetcher, mock)
    }

    #[tokio::test]
    async fn test_fetch_one_parses_detected_format() {
        let (fetcher, _) = fetcher(
            MockFetcher::default()
                .with_body(
                    "http://a/list.m3u",
                    "#EXTM3U\n#EXTINF:-1 tvg-id=\"1\",CCTV1\nhttp://s/1\n",
                )
                .with_body("http://b/list.txt", "CCTV2,http://s/2\nCCTV3,http://s/3\n"),
            4,
        );

        let m3u = fetcher.fetch_one("http://a/list.m3u").await;
        assert!(!m3u.failed);
        assert_eq!(m3u.channels.len(), 1);
        assert_eq!(m3u.channels[0].tvg_id, "1");

        let txt = fetcher.fetch_one("http://b/list.txt").await;
        assert_eq!(txt.channels.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let (fetcher, _) = fetcher(
            MockFetcher::default().with_body("http://ok/list.txt", "CCTV1,http://s/1\n"),
            4,
        );

        let urls = vec![
            "http://missing/list.txt".to_string(),
            "http://ok/list.txt".to_string(),
        ];
        let results = fetcher.fetch_all(&urls).await;
        assert_eq!(results.len(), 2);

        let failed = results.iter().find(|r| r.url == "http://missing/list.txt").unwrap();
        assert!(failed.failed);
        assert!(failed.channels.is_empty());

        let ok = results.iter().find(|r| r.url == "http://ok/list.txt").unwrap();
        assert!(!ok.failed);
        assert_eq!(ok.channels.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscription_times_out() {
        let mock = MockFetcher::default()
            .with_body("http://slow/list.txt", "CCTV1,http://s/1\n")
            .with_delay("http://slow/list.txt", Duration::from_secs(60));
        let fetcher = SubscriptionFetcher::new(Arc::new(mock), Duration::from_secs(10), 2);

        let result = fetcher.fetch_one("http://slow/list.txt").await;
        assert!(result.failed);
        assert!(result.channels.is_empty());
    }

    #[tokio::test]
    async fn test_each_url_fetched_once_within_concurrency_bound() {
        let mut mock = MockFetcher::default();
        let urls: Vec<String> = (0..10).map(|i| format!("http://host/{i}.txt")).collect();
        for url in &urls {
            mock = mock.with_body(url, "CCTV1,http://s/1\n");
        }
        let (fetcher, mock) = fetcher(mock, 3);

        let results = fetcher.fetch_all(&urls).await;
        assert_eq!(results.len(), 10);

        let mut calls = mock.calls.lock().unwrap().clone();
        calls.sort();
        let mut expected = urls.clone();
        expected.sort();
        assert_eq!(calls, expected);
        assert!(mock.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_empty_url_list() {
        let (fetcher, mock) = fetcher(MockFetcher::default(), 4);
        assert!(fetcher.fetch_all(&[]).await.is_empty());
        assert!(mock.calls.lock().unwrap().is_empty());
    }
}
