//! HTTP transport for the content store.
//!
//! Speaks the store's query API: `GET {query_url}?query=...&$param=...`
//! with an optional bearer token, unwrapping the `{ "result": ... }`
//! envelope. Classification of failures matters more than detail here; the
//! client above this layer flattens everything to an absence anyway.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{ContentStore, SectionQuery, StoreError};

pub struct HttpContentStore {
    client: Client,
    query_url: Url,
    token: Option<String>,
}

impl HttpContentStore {
    pub fn new(client: Client, query_url: Url, token: Option<String>) -> Self {
        Self {
            client,
            query_url,
            token,
        }
    }

    fn request_url(&self, query: &SectionQuery, params: &[(&str, &str)]) -> Url {
        let mut url = self.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query.groq);
            for (name, value) in params {
                // Store convention: parameter values are JSON-encoded.
                pairs.append_pair(
                    &format!("${name}"),
                    &serde_json::Value::from(*value).to_string(),
                );
            }
        }
        url
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn execute(
        &self,
        query: &SectionQuery,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, StoreError> {
        let mut request = self.client.get(self.request_url(query, params));
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected {
                name: query.name,
                status: status.as_u16(),
            });
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))?;

        Ok(envelope
            .get("result")
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::content::Freshness;
    use std::time::Duration;

    #[test]
    fn request_url_carries_query_and_json_encoded_params() {
        let store = HttpContentStore::new(
            Client::new(),
            Url::parse("https://store.example/v1/data/query/production").expect("url"),
            None,
        );
        let query = SectionQuery {
            name: "hero",
            groq: r#"*[_type == "hero"][0]"#,
            freshness: Freshness::MaxAge(Duration::from_secs(60)),
        };

        let url = store.request_url(&query, &[("slug", "home")]);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("query".to_string(), query.groq.to_string())));
        assert!(pairs.contains(&("$slug".to_string(), "\"home\"".to_string())));
    }
}
