use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;

/// Reply shape of the external plate-recognition service.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizeReply {
    pub success: bool,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Forward raw image bytes to the recognizer.
    ///
    /// Errors cover transport failures, non-2xx statuses and malformed
    /// payloads; callers are expected to downgrade all of them to a soft
    /// "unable to analyze" outcome.
    async fn recognize(&self, body: Bytes, content_type: &str) -> anyhow::Result<RecognizeReply>;
}

/// HTTP adapter for the recognition service, with a bounded request timeout.
pub struct PlateRecognizer {
    client: Client,
    endpoint: String,
}

impl PlateRecognizer {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build recognition http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/recognize", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl RecognitionClient for PlateRecognizer {
    async fn recognize(&self, body: Bytes, content_type: &str) -> anyhow::Result<RecognizeReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .context("plate service request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("plate service returned status {}", status.as_u16());
        }

        response
            .json::<RecognizeReply>()
            .await
            .context("decode plate service reply")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_decodes_with_all_fields() {
        let reply: RecognizeReply =
            serde_json::from_str(r#"{"success":true,"plate":"ABC123","message":"ok"}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.plate.as_deref(), Some("ABC123"));
    }

    #[test]
    fn reply_tolerates_missing_plate_and_message() {
        let reply: RecognizeReply = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.plate.is_none());
        assert!(reply.message.is_none());
    }

    #[test]
    fn recognizer_joins_endpoint_without_double_slash() {
        let rec = PlateRecognizer::new("http://localhost:9000/", Duration::from_secs(5)).unwrap();
        assert_eq!(rec.endpoint, "http://localhost:9000/recognize");
    }
}
