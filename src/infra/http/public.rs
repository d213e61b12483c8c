use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::Serialize;

use crate::{
    application::{compose::PageComposer, contact::ContactService, error::ErrorReport},
    cache::{CachePolicy, CachedPage, RenderCache, RevalidationTrigger},
    domain::content::{PageContent, SiteChrome},
    infra::content::queries,
};

use super::{contact::submit_contact, middleware::log_responses, revalidate::revalidate};

#[derive(Clone)]
pub struct HttpState {
    pub composer: Arc<PageComposer>,
    pub cache: Arc<RenderCache>,
    pub trigger: Arc<RevalidationTrigger>,
    pub contact: Arc<ContactService>,
    pub revalidation_secret: Option<String>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/api/revalidate", post(revalidate))
        .route("/api/contact", post(submit_contact))
        .layer(middleware::from_fn(log_responses))
        .with_state(state)
}

/// The composed home route: normalized page data for the presentation
/// layer. Composition cannot fail, so neither can this route; a content
/// store outage degrades every section to its default.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HomePageView {
    chrome: SiteChrome,
    content: PageContent,
}

async fn home(State(state): State<HttpState>) -> Response {
    if let Some(cached) = state.cache.get(crate::cache::HOME_PATH) {
        return page_response(cached.body);
    }

    // Layout and body scopes resolve independently; a failure in one never
    // suppresses the other.
    let (content, chrome) = tokio::join!(
        state.composer.compose_home(),
        state.composer.compose_chrome(),
    );
    let view = HomePageView { chrome, content };

    let body = match serde_json::to_vec(&view) {
        Ok(body) => Bytes::from(body),
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let mut response = status.into_response();
            ErrorReport::from_error("infra::http::public::home", status, &err)
                .attach(&mut response);
            return response;
        }
    };

    let policy = CachePolicy::combine(queries::home_route_freshness());
    state.cache.insert(
        crate::cache::HOME_PATH,
        CachedPage::new(body.clone(), policy),
    );

    page_response(body)
}

fn page_response(body: Bytes) -> Response {
    ([(CONTENT_TYPE, "application/json")], body).into_response()
}

async fn healthz() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}
