//! Revalidation trigger.
//!
//! The one component allowed to mark render-cache state stale. Render
//! requests read staleness through [`RenderCache::get`]; everything that
//! writes it funnels through here so externally signalled invalidation and
//! time-based expiry cannot drift apart.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::infra::content::queries::LAYOUT_TAG;

use super::{HOME_PATH, RenderCache};

pub struct RevalidationTrigger {
    cache: Arc<RenderCache>,
}

impl RevalidationTrigger {
    pub fn new(cache: Arc<RenderCache>) -> Self {
        Self { cache }
    }

    /// Force the home route and its layout scope stale.
    ///
    /// Idempotent: triggering twice leaves the cache in the same state as
    /// triggering once.
    pub fn home_updated(&self) {
        let path_dropped = self.cache.invalidate_path(HOME_PATH);
        let tagged_dropped = self.cache.invalidate_tag(LAYOUT_TAG);

        counter!("solara_revalidation_request_total").increment(1);
        debug!(
            target: "solara::cache",
            path = HOME_PATH,
            path_dropped,
            tagged_dropped,
            "revalidation trigger fired"
        );
    }
}
