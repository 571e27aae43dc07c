//! HTTP implementation of the file store
//!
//! A reqwest client with configurable auth (Bearer token or X-API-Key),
//! modeled on the storefront API's owner-scoped file routes. The batch
//! upload streams one multipart body chunk by chunk so the progress
//! callback tracks bytes actually handed to the connection.

use async_trait::async_trait;
use bytes::Bytes;
use galerie_core::{CandidateFile, StoredFile};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::traits::{FileStore, ProgressFn, StoreError, StoreResult};
use crate::wire::{DownloadLink, FileListResponse};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// API version prefix (e.g. "/api/v1"). Set GALERIE_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("GALERIE_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}", version)
}

/// Which taxonomy bucket an unclassified server rejection falls into.
#[derive(Clone, Copy)]
enum FailureClass {
    Upload,
    Delete,
}

/// HTTP file store with configurable auth.
#[derive(Clone, Debug)]
pub struct HttpFileStore {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl HttpFileStore {
    pub fn new(base_url: String, auth: Auth) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create a store from the environment: GALERIE_API_URL (or API_URL),
    /// GALERIE_API_KEY (or API_KEY). GALERIE_AUTH_SCHEME selects "api-key"
    /// (default) or "bearer".
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let base_url = std::env::var("GALERIE_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let key = std::env::var("GALERIE_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| anyhow::anyhow!("Missing API key. Set GALERIE_API_KEY or API_KEY"))?;

        let auth = match std::env::var("GALERIE_AUTH_SCHEME")
            .unwrap_or_else(|_| "api-key".to_string())
            .to_lowercase()
            .as_str()
        {
            "bearer" => Auth::Bearer(key),
            _ => Auth::XApiKey(key),
        };

        Self::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// GET request with strict JSON decode.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(status, response, FailureClass::Upload).await);
        }

        decode_json(response).await
    }

    /// DELETE request with optional JSON body. Returns Ok(()) on success.
    async fn delete_request(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> StoreResult<()> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.delete(&url));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(status, response, FailureClass::Delete).await);
        }

        Ok(())
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(
        &self,
        owner: Uuid,
        batch: &[CandidateFile],
        on_progress: ProgressFn,
    ) -> StoreResult<Vec<StoredFile>> {
        let boundary = format!("galerie-{}", Uuid::new_v4().simple());
        let body = multipart_body(batch, &boundary);
        let total = body.len().max(1);

        on_progress(0);

        let mut sent = 0usize;
        let progress = on_progress.clone();
        let chunks: Vec<Bytes> = body
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(Bytes::copy_from_slice)
            .collect();
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len();
            progress(((sent * 100) / total).min(100) as u8);
            Ok::<Bytes, std::convert::Infallible>(chunk)
        }));

        let url = self.build_url(&format!("{}/owners/{}/files", api_prefix(), owner));
        let request = self
            .client
            .post(&url)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(reqwest::Body::wrap_stream(stream));
        let request = self.apply_auth(request);

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(status, response, FailureClass::Upload).await);
        }

        let list: FileListResponse = decode_json(response).await?;
        Ok(list
            .into_items()
            .into_iter()
            .map(|item| item.into_stored_file())
            .collect())
    }

    async fn list(&self, owner: Uuid) -> StoreResult<Vec<StoredFile>> {
        let list: FileListResponse = self
            .get_json(&format!("{}/owners/{}/files", api_prefix(), owner))
            .await?;
        Ok(list
            .into_items()
            .into_iter()
            .map(|item| item.into_stored_file())
            .collect())
    }

    async fn download_url(&self, owner: Uuid, file_id: Uuid) -> StoreResult<String> {
        let link: DownloadLink = self
            .get_json(&format!(
                "{}/owners/{}/files/{}/download-link",
                api_prefix(),
                owner,
                file_id
            ))
            .await?;
        Ok(link.url)
    }

    async fn delete(&self, owner: Uuid, file_id: Uuid) -> StoreResult<()> {
        self.delete_request(
            &format!("{}/owners/{}/files/{}", api_prefix(), owner, file_id),
            None,
        )
        .await
    }

    async fn delete_many(&self, owner: Uuid, file_ids: &[Uuid]) -> StoreResult<()> {
        self.delete_request(
            &format!("{}/owners/{}/files", api_prefix(), owner),
            Some(serde_json::json!({ "file_ids": file_ids })),
        )
        .await
    }

    async fn delete_by_id(&self, file_id: Uuid) -> StoreResult<()> {
        self.delete_request(&format!("{}/files/{}", api_prefix(), file_id), None)
            .await
    }
}

/// Assemble one multipart/form-data body for a batch, every file under the
/// same "files" field name.
fn multipart_body(batch: &[CandidateFile], boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for file in batch {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                file.name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime_type).as_bytes());
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

fn map_transport(err: reqwest::Error) -> StoreError {
    StoreError::Network(format!("Failed to send request: {}", err))
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
    let text = response
        .text()
        .await
        .map_err(|e| StoreError::Network(format!("Failed to read response body: {}", e)))?;
    serde_json::from_str(&text)
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

async fn failure(
    status: StatusCode,
    response: reqwest::Response,
    class: FailureClass,
) -> StoreError {
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    classify_status(
        status.as_u16(),
        format!("API request failed with status {}: {}", status, error_text),
        class,
    )
}

fn classify_status(status: u16, message: String, class: FailureClass) -> StoreError {
    match status {
        401 | 403 => StoreError::Unauthorized(message),
        404 => StoreError::NotFound(message),
        _ => match class {
            FailureClass::Upload => StoreError::UploadRejected(message),
            FailureClass::Delete => StoreError::DeleteRejected(message),
        },
    }
}
