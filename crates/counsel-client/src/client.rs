//! The HTTP implementation of the backend contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::ClientError;
use crate::types::{AskRequest, AskResponse, ErrorBody, HealthResponse, UploadResponse};

/// Abstraction over the remote assistant, injectable into the orchestrator.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Send one chat turn. Exactly one attempt; the caller owns recovery.
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError>;
}

/// reqwest-backed client for the question-answering service.
///
/// Performs no retries and no caching. The request timeout is bounded at
/// construction; expiry surfaces as `ClientError::Transport`.
pub struct HttpAssistantClient {
    http: Client,
    base_url: String,
}

impl HttpAssistantClient {
    /// Build a client for the given base URL with a bounded request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Upload PDFs for server-side ingestion (auxiliary endpoint).
    pub async fn upload_pdfs(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<UploadResponse, ClientError> {
        let mut form = Form::new();
        for (name, bytes) in files {
            let part = Part::bytes(bytes)
                .file_name(name)
                .mime_str("application/pdf")
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            form = form.part("files", part);
        }

        let response = self
            .http
            .post(format!("{}/upload-pdfs/", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Query backend health.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Map a non-2xx response to `ClientError::Backend`, reading the
    /// structured `detail` field when the body carries one.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(ClientError::Backend {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AssistantBackend for HttpAssistantClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError> {
        tracing::debug!(
            session_id = %request.session_id,
            use_documents = request.use_documents,
            new_documents = request.document_texts.len(),
            "Sending chat turn to backend"
        );

        let response = self
            .http
            .post(format!("{}/chat/", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Transport(format!("request timed out: {}", e))
                } else {
                    ClientError::Transport(e.to_string())
                }
            })?;

        let answer: AskResponse = Self::decode(response).await?;
        tracing::debug!(source = %answer.source, "Backend answered");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client =
            HttpAssistantClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_new_keeps_plain_base_url() {
        let client =
            HttpAssistantClient::new("http://api.internal:9000", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://api.internal:9000");
    }

    #[tokio::test]
    async fn test_ask_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is almost certainly closed.
        let client =
            HttpAssistantClient::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap();
        let request = AskRequest {
            question: "hello".to_string(),
            use_documents: false,
            session_id: "s".to_string(),
            document_texts: vec![],
        };
        let err = client.ask(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_upload_pdfs_unreachable_host_is_transport_error() {
        let client =
            HttpAssistantClient::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap();
        let files = vec![
            ("lease.pdf".to_string(), vec![0x25, 0x50, 0x44, 0x46]),
            ("rider.pdf".to_string(), vec![0x25, 0x50, 0x44, 0x46]),
        ];
        let err = client.upload_pdfs(files).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    // ---- Response handling ----

    fn canned_response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_check_status_passes_2xx_through() {
        let response = canned_response(200, r#"{"answer":"hi","source":"general"}"#);
        assert!(HttpAssistantClient::check_status(response).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_status_reads_structured_detail() {
        let response = canned_response(422, r#"{"detail":"no PDF files provided"}"#);
        let err = HttpAssistantClient::check_status(response).await.unwrap_err();
        match err {
            ClientError::Backend { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(detail.as_deref(), Some("no PDF files provided"));
            }
            other => panic!("expected Backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_status_unstructured_body_has_no_detail() {
        let response = canned_response(500, "Internal Server Error");
        let err = HttpAssistantClient::check_status(response).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Backend {
                status: 500,
                detail: None,
            }
        ));
    }

    #[tokio::test]
    async fn test_decode_upload_response() {
        let response = canned_response(
            200,
            r#"{"message":"ok","total_chunks":12,"files_processed":["lease.pdf"]}"#,
        );
        let upload: UploadResponse = HttpAssistantClient::decode(response).await.unwrap();
        assert_eq!(upload.total_chunks, 12);
        assert_eq!(upload.files_processed, vec!["lease.pdf"]);
    }

    #[tokio::test]
    async fn test_decode_contract_mismatch_is_invalid_response() {
        let response = canned_response(200, r#"{"unexpected":"shape"}"#);
        let result: Result<UploadResponse, ClientError> =
            HttpAssistantClient::decode(response).await;
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }
}
