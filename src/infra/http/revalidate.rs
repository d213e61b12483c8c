//! Revalidation gateway.
//!
//! Two states, Idle and Invalidating; an inbound request is the only
//! transition. When a shared secret is configured, both the
//! `x-revalidate-secret` header and the `secret` query parameter are
//! accepted carriers; when none is configured every request is accepted —
//! a deliberate permissive default for low-stakes deployments, not a bug.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::infra::trigger::REVALIDATE_SECRET_HEADER;

use super::error::ApiError;
use super::public::HttpState;

#[derive(Debug, Deserialize)]
pub struct RevalidateParams {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub message: String,
    pub timestamp: String,
}

pub async fn revalidate(
    State(state): State<HttpState>,
    Query(params): Query<RevalidateParams>,
    headers: HeaderMap,
) -> Response {
    let provided = headers
        .get(REVALIDATE_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(params.secret);

    if let Some(expected) = state.revalidation_secret.as_deref() {
        let authorized = provided
            .as_deref()
            .is_some_and(|candidate| candidate.as_bytes().ct_eq(expected.as_bytes()).into());
        if !authorized {
            return ApiError::unauthorized("Invalid secret token")
                .with_detail("revalidation secret mismatch")
                .into_response();
        }
    }

    state.trigger.home_updated();

    let timestamp = match OffsetDateTime::now_utc().format(&Rfc3339) {
        Ok(timestamp) => timestamp,
        Err(err) => {
            return ApiError::internal("Error revalidating website")
                .with_detail(format!("timestamp formatting failed: {err}"))
                .into_response();
        }
    };

    Json(RevalidateResponse {
        revalidated: true,
        message: "Website updated successfully!".to_string(),
        timestamp,
    })
    .into_response()
}
