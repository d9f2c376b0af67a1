//! Cursor pagination over the list view
//!
//! A [`Paginator`] is a pull-based walk over the server's `next` links. Each
//! pull issues at most one request; nothing runs in the background, so a
//! caller cancels simply by no longer pulling. Successive fetches are
//! separated by a delay, never before the first fetch or after the last.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::debug;

use crate::app::client::FacilityClient;
use crate::constants::api;
use crate::errors::{FetchError, FetchResult};

/// Suspends between page fetches
pub type DelayFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Delay backed by the tokio timer
pub fn tokio_delay() -> DelayFn {
    Arc::new(|duration| tokio::time::sleep(duration).boxed())
}

enum Cursor {
    /// First request, sent with the caller's query parameters
    Start(String),
    /// Link taken from the previous page's `next`
    Next(String),
    /// Previous page could not be followed; reported on the next pull
    Failed(FetchError),
    Done,
}

/// Lazy sequence of `(status, page body)` pairs
pub struct Paginator<'a> {
    client: &'a FacilityClient,
    query: Vec<(String, String)>,
    cursor: Cursor,
    delay: Duration,
    delay_fn: DelayFn,
    pages_fetched: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a FacilityClient, url: String, query: Vec<(String, String)>) -> Self {
        Self {
            client,
            query,
            cursor: Cursor::Start(url),
            delay: api::PAGE_DELAY,
            delay_fn: tokio_delay(),
            pages_fetched: 0,
        }
    }

    /// Pause for `delay` between successive fetches
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the function that performs the pause
    pub fn with_delay_fn(mut self, delay_fn: DelayFn) -> Self {
        self.delay_fn = delay_fn;
        self
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once the `next` chain has ended
    ///
    /// After an error the sequence is finished.
    pub async fn next_page(&mut self) -> Option<FetchResult<(u16, Value)>> {
        let (url, query) = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Failed(error) => return Some(Err(error)),
            Cursor::Start(url) => (url, mem::take(&mut self.query)),
            Cursor::Next(url) => {
                (self.delay_fn)(self.delay).await;
                (url, Vec::new())
            }
        };

        let (status, body) = match self.client.fetch(&url, true, &query).await {
            Ok(page) => page,
            Err(error) => return Some(Err(error)),
        };

        self.pages_fetched += 1;
        debug!("Fetched page {} from {}", self.pages_fetched, url);

        self.cursor = match body.get("next") {
            Some(Value::String(next)) => Cursor::Next(next.clone()),
            Some(Value::Null) => Cursor::Done,
            _ => Cursor::Failed(FetchError::MalformedPage {
                reason: match body.get("detail").and_then(Value::as_str) {
                    Some(detail) => detail.to_string(),
                    None => format!("page from {url} has no 'next' link"),
                },
            }),
        };

        Some(Ok((status, body)))
    }

    /// Adapt into a [`Stream`] of pages
    pub fn into_stream(self) -> impl Stream<Item = FetchResult<(u16, Value)>> + 'a {
        stream::unfold(self, |mut paginator| async move {
            let page = paginator.next_page().await?;
            Some((page, paginator))
        })
    }
}
