use std::path::PathBuf;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{ChatResponse, FileListPayload, NotePayload, SearchPayload};
use crate::{
    ApiError, CardRecord, ChatRequest, FailureKind, SearchResults, SuggestionRecord,
    UploadReceipt, UploadStatusPayload,
};

/// Path prefix under which the backend mounts every endpoint.
pub const API_PREFIX: &str = "api";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Backend origin; endpoints live under `{base_url}/api/`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// A local file to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub path: PathBuf,
    pub filename: String,
    pub content_type: String,
}

#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn list_cards(&self) -> Result<Vec<CardRecord>, ApiError>;

    async fn search_cards(&self, query: &str) -> Result<SearchResults, ApiError>;

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionRecord>, ApiError>;

    async fn upload_file(
        &self,
        card_id: &str,
        upload: &FileUpload,
    ) -> Result<UploadReceipt, ApiError>;

    async fn upload_status(&self, status_id: &str) -> Result<UploadStatusPayload, ApiError>;

    /// Returns the stored note, or an empty string when the card has none.
    async fn load_note(&self, card_id: &str) -> Result<String, ApiError>;

    async fn save_note(&self, card_id: &str, note: &str) -> Result<(), ApiError>;

    async fn list_files(&self, card_id: &str) -> Result<Vec<String>, ApiError>;

    async fn delete_file(&self, card_id: &str, filename: &str) -> Result<(), ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self { client, base_url })
    }

    /// Builds `{base}/api/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    fn endpoint_with_query(&self, segments: &[&str], query: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn list_cards(&self) -> Result<Vec<CardRecord>, ApiError> {
        let url = self.endpoint(&["cards"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn search_cards(&self, query: &str) -> Result<SearchResults, ApiError> {
        let url = self.endpoint_with_query(&["cards", "search"], query)?;
        let payload: SearchPayload = self.send_json(self.client.get(url)).await?;
        Ok(payload.into())
    }

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionRecord>, ApiError> {
        let url = self.endpoint_with_query(&["suggest"], query)?;
        self.send_json(self.client.get(url)).await
    }

    async fn upload_file(
        &self,
        card_id: &str,
        upload: &FileUpload,
    ) -> Result<UploadReceipt, ApiError> {
        let url = self.endpoint(&["cards", card_id, "upload"])?;
        let bytes = tokio::fs::read(&upload.path).await.map_err(|err| {
            ApiError::new(
                FailureKind::FileRead,
                format!("{}: {err}", upload.path.display()),
            )
        })?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)
            .map_err(map_reqwest_error)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send_json(self.client.post(url).multipart(form)).await
    }

    async fn upload_status(&self, status_id: &str) -> Result<UploadStatusPayload, ApiError> {
        let url = self.endpoint(&["upload", "status", status_id])?;
        self.send_json(self.client.get(url)).await
    }

    async fn load_note(&self, card_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["cards", card_id, "note"])?;
        let payload: NotePayload = self.send_json(self.client.get(url)).await?;
        Ok(payload.note.unwrap_or_default())
    }

    async fn save_note(&self, card_id: &str, note: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["cards", card_id, "note"])?;
        let body = NotePayload {
            note: Some(note.to_string()),
        };
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn list_files(&self, card_id: &str) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["cards", card_id, "files"])?;
        let payload: FileListPayload = self.send_json(self.client.get(url)).await?;
        Ok(payload.into_names())
    }

    async fn delete_file(&self, card_id: &str, filename: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["cards", card_id, "files", filename])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let url = self.endpoint(&["chat"])?;
        let reply: ChatResponse = self.send_json(self.client.post(url).json(request)).await?;
        Ok(reply.response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::MalformedBody, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
