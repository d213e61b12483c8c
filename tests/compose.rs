//! Cascade behavior of the page composer against a scripted content store.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use solara::application::compose::PageComposer;
use solara::infra::content::{ContentClient, ContentStore, SectionQuery, StoreError};

/// Serves canned results by query name and records every execution.
/// Unscripted queries resolve to `Null` (store reachable, no document).
struct ScriptedStore {
    results: HashMap<&'static str, Value>,
    fail_all: bool,
    invoked: Mutex<Vec<&'static str>>,
}

impl ScriptedStore {
    fn new(results: HashMap<&'static str, Value>) -> Arc<Self> {
        Arc::new(Self {
            results,
            fail_all: false,
            invoked: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            results: HashMap::new(),
            fail_all: true,
            invoked: Mutex::new(Vec::new()),
        })
    }

    async fn invoked(&self) -> Vec<&'static str> {
        self.invoked.lock().await.clone()
    }
}

#[async_trait]
impl ContentStore for ScriptedStore {
    async fn execute(
        &self,
        query: &SectionQuery,
        _params: &[(&str, &str)],
    ) -> Result<Value, StoreError> {
        self.invoked.lock().await.push(query.name);
        if self.fail_all {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(self.results.get(query.name).cloned().unwrap_or(Value::Null))
    }
}

fn composer(store: Arc<ScriptedStore>) -> PageComposer {
    PageComposer::new(ContentClient::new(store))
}

fn hero_doc(heading: &str) -> Value {
    json!({ "mainHeading": heading })
}

fn full_home_doc() -> Value {
    json!({
        "_id": "homePage",
        "hero": hero_doc("from consolidated"),
        "skillsSection": { "skills": [{ "name": "Rust" }] },
        "workHistorySection": { "workItems": [] },
        "projectsSection": { "projects": [] }
    })
}

#[tokio::test]
async fn consolidated_document_short_circuits_the_cascade() {
    let store = ScriptedStore::new(HashMap::from([("homePage", full_home_doc())]));
    let page = composer(store.clone()).compose_home().await;

    assert!(page.is_complete());
    assert_eq!(
        page.hero.and_then(|h| h.main_heading),
        Some("from consolidated".to_string())
    );
    assert_eq!(store.invoked().await, vec!["homePage"]);
}

#[tokio::test]
async fn consolidated_document_without_marker_falls_through() {
    let store = ScriptedStore::new(HashMap::from([(
        "homePage",
        json!({ "hero": hero_doc("unmarked") }),
    )]));
    let page = composer(store.clone()).compose_home().await;

    // The unmarked document contributes nothing; the cascade continues.
    assert!(page.hero.is_none());
    let invoked = store.invoked().await;
    assert!(invoked.contains(&"siteSettings"));
}

#[tokio::test]
async fn aggregate_sections_win_and_gaps_fall_to_direct_queries() {
    let store = ScriptedStore::new(HashMap::from([
        (
            "siteSettings",
            json!({
                "_id": "siteSettings",
                "hero": hero_doc("from aggregate"),
                "skillsSection": { "badgeText": "Skills" }
            }),
        ),
        ("hero", hero_doc("from direct query")),
        ("workHistorySection", json!({ "title": "Work" })),
        ("projectsSection", json!({ "title": "Projects" })),
    ]));
    let page = composer(store.clone()).compose_home().await;

    // Sections the aggregate supplied keep its values.
    assert_eq!(
        page.hero.and_then(|h| h.main_heading),
        Some("from aggregate".to_string())
    );
    assert_eq!(
        page.skills.and_then(|s| s.badge_text),
        Some("Skills".to_string())
    );
    // Gaps come from tier 3.
    assert_eq!(
        page.work_history.and_then(|w| w.title),
        Some("Work".to_string())
    );
    assert_eq!(
        page.projects.and_then(|p| p.title),
        Some("Projects".to_string())
    );

    // Direct queries were issued only for the gaps.
    let invoked = store.invoked().await;
    assert!(invoked.contains(&"workHistorySection"));
    assert!(invoked.contains(&"projectsSection"));
    assert!(!invoked.contains(&"hero"));
    assert!(!invoked.contains(&"skillsSection"));
}

#[tokio::test]
async fn complete_aggregate_skips_direct_queries() {
    let store = ScriptedStore::new(HashMap::from([(
        "siteSettings",
        json!({
            "_id": "siteSettings",
            "hero": hero_doc("aggregate"),
            "skillsSection": {},
            "workHistorySection": {},
            "projectsSection": {}
        }),
    )]));
    let page = composer(store.clone()).compose_home().await;

    assert!(page.is_complete());
    assert_eq!(store.invoked().await, vec!["homePage", "siteSettings"]);
}

#[tokio::test]
async fn total_outage_degrades_to_an_empty_page() {
    let store = ScriptedStore::failing();
    let composer = composer(store);

    let page = composer.compose_home().await;
    assert!(page.hero.is_none());
    assert!(page.skills.is_none());
    assert!(page.work_history.is_none());
    assert!(page.projects.is_none());

    let chrome = composer.compose_chrome().await;
    assert!(chrome.navbar.is_none());
    assert!(chrome.footer.is_none());
}

#[tokio::test]
async fn chrome_requires_the_presence_marker() {
    let store = ScriptedStore::new(HashMap::from([
        ("navbar", json!({ "name": "unmarked navbar" })),
        ("footer", json!({ "_id": "footer", "copyrightText": "2026" })),
    ]));
    let chrome = composer(store).compose_chrome().await;

    assert!(chrome.navbar.is_none());
    assert_eq!(
        chrome.footer.and_then(|f| f.copyright_text),
        Some("2026".to_string())
    );
}
