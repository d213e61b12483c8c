//! Outbound transactional email.
//!
//! `MailRelay` is the seam the contact service depends on; the production
//! implementation posts to a SendLayer-compatible HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("mail relay is not configured")]
    NotConfigured,
    #[error("mail relay transport failure: {0}")]
    Transport(String),
    #[error("mail relay rejected the message with status {status}")]
    Rejected { status: u16, detail: String },
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), RelayError>;
}

// Wire shape of the relay API; field names are PascalCase on the wire.

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendRequest<'a> {
    from: Address<'a>,
    to: [Address<'a>; 1],
    subject: &'a str,
    content_type: &'static str,
    #[serde(rename = "HTMLContent")]
    html_content: &'a str,
    plain_content: &'a str,
    reply_to: Address<'a>,
}

pub struct SendLayerRelay {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl SendLayerRelay {
    pub fn new(client: Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl MailRelay for SendLayerRelay {
    async fn send(&self, email: OutboundEmail) -> Result<(), RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::NotConfigured)?;

        let sender = Address {
            email: &email.from_email,
            name: &email.from_name,
        };
        let request = SendRequest {
            from: Address {
                email: &email.from_email,
                name: &email.from_name,
            },
            to: [Address {
                email: &email.to_email,
                name: &email.to_name,
            }],
            subject: &email.subject,
            content_type: "HTML",
            html_content: &email.html_body,
            plain_content: &email.text_body,
            reply_to: sender,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_uses_the_relay_wire_names() {
        let email = OutboundEmail {
            from_email: "a@b.co".to_string(),
            from_name: "A".to_string(),
            to_email: "c@d.co".to_string(),
            to_name: "Contact Form".to_string(),
            subject: "Hello".to_string(),
            html_body: "<p>hi</p>".to_string(),
            text_body: "hi".to_string(),
        };
        let request = SendRequest {
            from: Address {
                email: &email.from_email,
                name: &email.from_name,
            },
            to: [Address {
                email: &email.to_email,
                name: &email.to_name,
            }],
            subject: &email.subject,
            content_type: "HTML",
            html_content: &email.html_body,
            plain_content: &email.text_body,
            reply_to: Address {
                email: &email.from_email,
                name: &email.from_name,
            },
        };

        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(value["ContentType"], "HTML");
        assert_eq!(value["HTMLContent"], "<p>hi</p>");
        assert_eq!(value["ReplyTo"]["email"], "a@b.co");
        assert_eq!(value["To"][0]["email"], "c@d.co");
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let relay = SendLayerRelay::new(
            Client::new(),
            Url::parse("https://relay.example/api/v1/email").expect("url"),
            None,
        );
        let email = OutboundEmail {
            from_email: "a@b.co".to_string(),
            from_name: "A".to_string(),
            to_email: "c@d.co".to_string(),
            to_name: "Contact Form".to_string(),
            subject: "Hello".to_string(),
            html_body: String::new(),
            text_body: String::new(),
        };

        let result = relay.send(email).await;
        assert!(matches!(result, Err(RelayError::NotConfigured)));
    }
}
