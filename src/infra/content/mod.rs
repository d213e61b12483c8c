//! Content store access.
//!
//! `ContentStore` is the transport seam (HTTP in production, in-memory in
//! tests); `ContentClient` is the crash-free boundary the composer talks
//! to. The client never surfaces an error: any transport, store-side, or
//! deserialize failure collapses to `None` so page assembly degrades to
//! compiled-in defaults instead of failing the render.

pub mod queries;

mod http;

pub use http::HttpContentStore;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// How long a fetched value may be reused before the store is consulted
/// again. The two modes are mutually exclusive per query: time-based entries
/// expire on their own, tag-based entries fall only to an explicit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    MaxAge(Duration),
    Tags(&'static [&'static str]),
}

/// A named, parameterized read against the content store.
#[derive(Debug, Clone, Copy)]
pub struct SectionQuery {
    pub name: &'static str,
    pub groq: &'static str,
    pub freshness: Freshness,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store transport failure: {0}")]
    Transport(String),
    #[error("content store rejected query `{name}` with status {status}")]
    Rejected { name: &'static str, status: u16 },
    #[error("content store returned a malformed payload: {0}")]
    Malformed(String),
}

/// Executes a named query and returns the raw result value. `Value::Null`
/// means the store was reachable but holds no matching document.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn execute(
        &self,
        query: &SectionQuery,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, StoreError>;
}

/// Thin, resilient accessor over a [`ContentStore`].
#[derive(Clone)]
pub struct ContentClient {
    store: Arc<dyn ContentStore>,
}

impl ContentClient {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Execute `query` and shape the result into `T`.
    ///
    /// Returns `None` on any failure as well as on an empty result; callers
    /// must not be able to distinguish an outage from a missing document.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &SectionQuery,
        params: &[(&str, &str)],
    ) -> Option<T> {
        let value = match self.store.execute(query, params).await {
            Ok(value) => value,
            Err(err) => {
                counter!("solara_content_fetch_failure_total").increment(1);
                debug!(
                    target: "solara::content",
                    query = query.name,
                    error = %err,
                    "content fetch failed; section falls back to defaults"
                );
                return None;
            }
        };

        if value.is_null() {
            return None;
        }

        match serde_json::from_value(value) {
            Ok(shaped) => Some(shaped),
            Err(err) => {
                counter!("solara_content_fetch_failure_total").increment(1);
                debug!(
                    target: "solara::content",
                    query = query.name,
                    error = %err,
                    "content document did not match declared shape"
                );
                None
            }
        }
    }
}
