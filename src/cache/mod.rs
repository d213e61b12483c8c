//! Render cache for composed pages.
//!
//! One LRU-bounded store keyed by route path. Each entry carries the
//! freshness policy derived from the queries that produced it: a time-based
//! budget, invalidation tags, or both. Readers only ever observe staleness;
//! the [`RevalidationTrigger`] is the sole writer of it.

mod lock;
mod store;
mod trigger;

pub use store::{CachePolicy, CachedPage, RenderCache};
pub use trigger::RevalidationTrigger;

/// Route path of the portfolio home page, the only composed route.
pub const HOME_PATH: &str = "/";
