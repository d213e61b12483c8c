//! Authoring trigger: the operator-invoked client side of the
//! revalidation gateway.
//!
//! Issues exactly one HTTP call and reports the outcome synchronously; a
//! failed call is surfaced to the operator and must be repeated manually.
//! No retries, no queueing.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

const REVALIDATE_PATH: &str = "/api/revalidate";

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("site URL is required (use --site or SOLARA_SITE_URL)")]
    MissingSite,
    #[error("invalid site URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway rejected the request: {0}")]
    Rejected(String),
}

/// Confirmation body returned by the gateway on success.
#[derive(Debug, Deserialize)]
pub struct RevalidateConfirmation {
    pub revalidated: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: String,
}

pub struct RevalidateClient {
    client: Client,
    endpoint: Url,
    secret: Option<String>,
}

impl RevalidateClient {
    pub fn new(site: &str, secret: Option<String>) -> Result<Self, TriggerError> {
        let endpoint = Url::parse(site)?.join(REVALIDATE_PATH)?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            endpoint,
            secret,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("solara/", env!("CARGO_PKG_VERSION"))
    }

    pub async fn trigger(&self) -> Result<RevalidateConfirmation, TriggerError> {
        let mut request = self.client.post(self.endpoint.clone());
        if let Some(secret) = self.secret.as_deref() {
            request = request.header(REVALIDATE_SECRET_HEADER, secret);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<GatewayError>().await {
                Ok(body) => body.error,
                Err(_) => format!("status {status}"),
            };
            return Err(TriggerError::Rejected(detail));
        }

        Ok(response.json().await?)
    }
}
