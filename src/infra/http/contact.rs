use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use metrics::counter;
use serde::Serialize;

use crate::application::contact::{ContactError, ContactSubmission};
use crate::infra::mail::RelayError;

use super::error::ApiError;
use super::public::HttpState;

#[derive(Debug, Serialize)]
struct ContactResponse {
    success: bool,
    message: String,
}

pub async fn submit_contact(
    State(state): State<HttpState>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    match state.contact.submit(submission).await {
        Ok(()) => Json(ContactResponse {
            success: true,
            message: "Message sent successfully!".to_string(),
        })
        .into_response(),
        Err(err) => contact_error_response(err),
    }
}

fn contact_error_response(err: ContactError) -> Response {
    match err {
        ContactError::MissingFields
        | ContactError::InvalidEmail
        | ContactError::InvalidRecipientEmail => {
            ApiError::bad_request(err.to_string()).into_response()
        }
        ContactError::Relay(RelayError::NotConfigured) => {
            counter!("solara_contact_relay_failure_total").increment(1);
            ApiError::internal("Email service is not configured")
                .with_detail("mail relay api key missing")
                .into_response()
        }
        // Upstream detail is logged server-side only; the caller gets a
        // generic message.
        ContactError::Relay(relay_err) => {
            counter!("solara_contact_relay_failure_total").increment(1);
            let detail = match &relay_err {
                RelayError::Rejected { status, detail } => {
                    format!("relay rejected with status {status}: {detail}")
                }
                other => other.to_string(),
            };
            ApiError::internal("Failed to send email. Please try again later.")
                .with_detail(detail)
                .into_response()
        }
    }
}
