//! Contact form submission.
//!
//! Validation mirrors the public form contract exactly: required fields
//! are trimmed before the emptiness check, and both the sender and the
//! recipient address must contain a single `@` between non-empty,
//! whitespace-free parts. Valid submissions are rendered into an HTML and
//! a plain-text body and handed to the outbound mail relay.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::infra::mail::{MailRelay, OutboundEmail, RelayError};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("static email pattern compiles"));

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub recipient_email: String,
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Missing required fields: name, email, message, and recipientEmail are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid recipient email format")]
    InvalidRecipientEmail,
    #[error(transparent)]
    Relay(#[from] RelayError),
}

pub struct ContactService {
    relay: Arc<dyn MailRelay>,
}

impl ContactService {
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        Self { relay }
    }

    pub async fn submit(&self, submission: ContactSubmission) -> Result<(), ContactError> {
        let name = submission.name.trim();
        let email = submission.email.trim();
        let message = submission.message.trim();
        let recipient = submission.recipient_email.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() || recipient.is_empty() {
            return Err(ContactError::MissingFields);
        }
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ContactError::InvalidEmail);
        }
        if !EMAIL_PATTERN.is_match(recipient) {
            return Err(ContactError::InvalidRecipientEmail);
        }

        let company = submission.company.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let budget = submission.budget.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let reply_to_name = reply_to_name(name, email);
        let email_out = OutboundEmail {
            from_email: email.to_string(),
            from_name: reply_to_name.clone(),
            to_email: recipient.to_string(),
            to_name: "Contact Form".to_string(),
            subject: format!("Contact Form: Message from {reply_to_name}"),
            html_body: render_html_body(name, email, company, budget, message),
            text_body: render_text_body(name, email, company, budget, message),
        };

        self.relay.send(email_out).await?;
        Ok(())
    }
}

/// The reply-to display name falls back to the address's local part when
/// the submitted name is blank.
fn reply_to_name(name: &str, email: &str) -> String {
    if !name.is_empty() {
        return name.to_string();
    }
    match email.split('@').next().filter(|local| !local.is_empty()) {
        Some(local) => local.to_string(),
        None => "Contact Form User".to_string(),
    }
}

fn render_html_body(
    name: &str,
    email: &str,
    company: Option<&str>,
    budget: Option<&str>,
    message: &str,
) -> String {
    let mut body = String::from("<h2>New Contact Form Submission</h2>\n");
    body.push_str(&format!(
        "<p><strong>Name:</strong> {}</p>\n",
        html_escape::encode_text(name)
    ));
    body.push_str(&format!(
        "<p><strong>Email:</strong> {}</p>\n",
        html_escape::encode_text(email)
    ));
    if let Some(company) = company {
        body.push_str(&format!(
            "<p><strong>Company:</strong> {}</p>\n",
            html_escape::encode_text(company)
        ));
    }
    if let Some(budget) = budget {
        body.push_str(&format!(
            "<p><strong>Budget Range:</strong> {}</p>\n",
            html_escape::encode_text(budget)
        ));
    }
    body.push_str("<h3>Message:</h3>\n<p>");
    body.push_str(
        &html_escape::encode_text(message)
            .into_owned()
            .replace('\n', "<br>"),
    );
    body.push_str("</p>\n");
    body
}

fn render_text_body(
    name: &str,
    email: &str,
    company: Option<&str>,
    budget: Option<&str>,
    message: &str,
) -> String {
    let mut body = format!("New Contact Form Submission\n\nName: {name}\nEmail: {email}\n");
    if let Some(company) = company {
        body.push_str(&format!("Company: {company}\n"));
    }
    if let Some(budget) = budget {
        body.push_str(&format!("Budget Range: {budget}\n"));
    }
    body.push_str(&format!("\nMessage:\n{message}"));
    body
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingRelay {
        sent: Mutex<Vec<OutboundEmail>>,
        fail: bool,
    }

    #[async_trait]
    impl MailRelay for RecordingRelay {
        async fn send(&self, email: OutboundEmail) -> Result<(), RelayError> {
            if self.fail {
                return Err(RelayError::Rejected {
                    status: 502,
                    detail: "upstream unavailable".to_string(),
                });
            }
            self.sent.lock().await.push(email);
            Ok(())
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            company: None,
            budget: None,
            message: "hi".to_string(),
            recipient_email: "c@d.co".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_submission_is_relayed() {
        let relay = Arc::new(RecordingRelay::default());
        let service = ContactService::new(relay.clone());

        service.submit(submission()).await.expect("submission accepted");

        let sent = relay.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "c@d.co");
        assert_eq!(sent[0].subject, "Contact Form: Message from A");
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let service = ContactService::new(Arc::new(RecordingRelay::default()));
        let result = service
            .submit(ContactSubmission {
                email: "not-an-email".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(ContactError::InvalidEmail)));
    }

    #[tokio::test]
    async fn short_domain_is_accepted() {
        let relay = Arc::new(RecordingRelay::default());
        let service = ContactService::new(relay.clone());
        service
            .submit(ContactSubmission {
                email: "a@b".to_string(),
                recipient_email: "c@d".to_string(),
                ..submission()
            })
            .await
            .expect("short domains are accepted");
        assert_eq!(relay.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn whitespace_in_address_is_rejected() {
        let service = ContactService::new(Arc::new(RecordingRelay::default()));
        let result = service
            .submit(ContactSubmission {
                email: "a b@c.co".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(ContactError::InvalidEmail)));
    }

    #[tokio::test]
    async fn malformed_recipient_is_rejected() {
        let service = ContactService::new(Arc::new(RecordingRelay::default()));
        let result = service
            .submit(ContactSubmission {
                recipient_email: "no-at-sign".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(ContactError::InvalidRecipientEmail)));
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected() {
        let service = ContactService::new(Arc::new(RecordingRelay::default()));
        let result = service
            .submit(ContactSubmission {
                message: "   ".to_string(),
                ..submission()
            })
            .await;
        assert!(matches!(result, Err(ContactError::MissingFields)));
    }

    #[tokio::test]
    async fn relay_failure_propagates() {
        let service = ContactService::new(Arc::new(RecordingRelay {
            fail: true,
            ..RecordingRelay::default()
        }));
        let result = service.submit(submission()).await;
        assert!(matches!(result, Err(ContactError::Relay(_))));
    }

    #[test]
    fn html_body_escapes_markup() {
        let body = render_html_body("<b>A</b>", "a@b.co", None, None, "hi\nthere");
        assert!(body.contains("&lt;b&gt;A&lt;/b&gt;"));
        assert!(body.contains("hi<br>there"));
    }

    #[test]
    fn reply_to_falls_back_to_local_part() {
        assert_eq!(reply_to_name("", "jane@b.co"), "jane");
        assert_eq!(reply_to_name("Jane", "jane@b.co"), "Jane");
    }
}
