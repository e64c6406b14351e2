//! Kie HTTP client.
//!
//! Thin request/response layer shared by every adapter: bearer auth, envelope
//! unwrapping, media upload, download-URL resolution, byte fetches, credit
//! lookup and chat completion. The API key is supplied per call and never
//! stored.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use adgen_models::{MediaInput, MediaKind, MediaPayload};

use crate::chat::{empty_reason, extract_text, ChatMessage, ChatRequest};
use crate::config::GatewayConfig;
use crate::envelope::{non_empty, provider_message, unwrap_envelope, Envelope};
use crate::error::{GatewayError, GatewayResult};

const UPLOAD_PATH: &str = "/api/file-base64-upload";
const DOWNLOAD_URL_PATH: &str = "/api/v1/common/download-url";
const CREDIT_PATH: &str = "/api/v1/chat/credit";
const CHAT_PATH: &str = "/gemini-2.5-flash/v1/chat/completions";

/// Shared HTTP client for the Kie API family.
#[derive(Debug, Clone)]
pub struct KieClient {
    http: Client,
    config: GatewayConfig,
}

impl KieClient {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("adgen-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Network)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    pub(crate) fn get(&self, url: &str, api_key: &str) -> GatewayResult<RequestBuilder> {
        Ok(self.http.get(url).bearer_auth(bearer(api_key)?))
    }

    pub(crate) fn post(&self, url: &str, api_key: &str) -> GatewayResult<RequestBuilder> {
        Ok(self.http.post(url).bearer_auth(bearer(api_key)?))
    }

    /// Send a request and unwrap the provider envelope.
    pub(crate) async fn execute(&self, operation: &str, request: RequestBuilder) -> GatewayResult<Envelope> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let raw = response.text().await?;
        debug!(operation, status, "Provider response received");
        unwrap_envelope(operation, status, &raw)
    }

    // =========================================================================
    // Media
    // =========================================================================

    /// Upload one media input and return its hosted URL.
    pub async fn upload_media(
        &self,
        api_key: &str,
        media: &MediaInput,
        kind: MediaKind,
    ) -> GatewayResult<String> {
        let mime = media.mime_or_default(kind);
        let file_name = format!(
            "{}-{}.{}",
            match kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            },
            chrono::Utc::now().timestamp_millis(),
            kind.extension_for(mime)
        );
        let body = json!({
            "base64Data": data_url(&media.payload, mime),
            "uploadPath": kind.upload_path(),
            "fileName": file_name,
        });

        let url = self.config.file_url(UPLOAD_PATH);
        let request = self.post(&url, api_key)?.json(&body);
        let envelope = self.execute("Upload", request).await.map_err(|e| match e {
            GatewayError::InvalidApiKey => GatewayError::InvalidApiKey,
            GatewayError::Provider { message, .. } => GatewayError::upload_failed(message),
            other => GatewayError::upload_failed(other.to_string()),
        })?;

        let data = envelope.data();
        let hosted = ["fileUrl", "downloadUrl"]
            .iter()
            .filter_map(|key| data.get(*key).and_then(Value::as_str))
            .find_map(non_empty)
            .ok_or_else(|| GatewayError::upload_failed("No file URL in upload response."))?;

        info!(kind = ?kind, file_name = %file_name, "Uploaded media");
        Ok(hosted)
    }

    /// Convert a provider-internal URL into a directly fetchable one.
    ///
    /// Best effort: any failure other than a rejected key yields `raw_url`.
    pub async fn resolve_download_url(&self, api_key: &str, raw_url: &str) -> GatewayResult<String> {
        let url = self.api_url(DOWNLOAD_URL_PATH);
        let request = self.post(&url, api_key)?.json(&json!({ "url": raw_url }));

        match self.execute("Download URL", request).await {
            Ok(envelope) => match envelope.data().as_str().and_then(non_empty) {
                Some(direct) => Ok(direct),
                None => {
                    warn!("Download URL response had no URL, using raw result URL");
                    Ok(raw_url.to_string())
                }
            },
            Err(GatewayError::InvalidApiKey) => Err(GatewayError::InvalidApiKey),
            Err(e) => {
                warn!(error = %e, "Download URL resolution failed, using raw result URL");
                Ok(raw_url.to_string())
            }
        }
    }

    /// Single GET of a rendered file. No auth header: result URLs are pre-signed.
    pub async fn fetch_bytes(&self, url: &str) -> GatewayResult<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::from_http_status(
                status.as_u16(),
                format!("Download failed {}", status.as_u16()),
            ));
        }
        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Fetched rendered file");
        Ok(bytes.to_vec())
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Remaining account credits; doubles as an API key check.
    pub async fn check_credit(&self, api_key: &str) -> GatewayResult<f64> {
        let url = self.api_url(CREDIT_PATH);
        let envelope = self.execute("Credit check", self.get(&url, api_key)?).await?;
        let data = envelope.body().get("data").cloned().unwrap_or(Value::Null);
        data.as_f64()
            .or_else(|| data.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| GatewayError::invalid_response("No credit balance in response."))
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Non-streaming chat completion; returns the first usable text.
    pub async fn chat_completion(&self, api_key: &str, messages: &[ChatMessage]) -> GatewayResult<String> {
        let url = self.api_url(CHAT_PATH);
        let request = self.post(&url, api_key)?.json(&ChatRequest {
            messages,
            stream: false,
            include_thoughts: false,
        });

        let body = self.execute("Chat", request).await?.into_body();

        // Kie wrapper with a code but no choices carries its reason in msg.
        if body.get("code").is_some() && body.get("choices").is_none() {
            return Err(GatewayError::EmptyContent(
                provider_message(&body).unwrap_or_else(|| empty_reason(&body)),
            ));
        }

        extract_text(&body).ok_or_else(|| GatewayError::EmptyContent(empty_reason(&body)))
    }
}

/// Trimmed bearer token; a blank key fails before any network activity.
pub(crate) fn bearer(api_key: &str) -> GatewayResult<&str> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(GatewayError::InvalidApiKey);
    }
    Ok(key)
}

/// Upload payload: an existing data URL is forwarded untouched, anything else
/// is wrapped as `data:<mime>;base64,<data>`.
pub(crate) fn data_url(payload: &MediaPayload, mime: &str) -> String {
    match payload {
        MediaPayload::Base64(encoded) if encoded.contains("base64,") => encoded.clone(),
        MediaPayload::Base64(encoded) => format!("data:{mime};base64,{}", encoded.trim()),
        MediaPayload::Bytes(bytes) => format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_rejects_blank_key() {
        assert!(matches!(bearer("   "), Err(GatewayError::InvalidApiKey)));
        assert_eq!(bearer("  key-1 ").unwrap(), "key-1");
    }

    #[test]
    fn test_data_url_accepts_either_encoding() {
        let prefixed = MediaPayload::Base64("data:image/png;base64,AAAA".into());
        assert_eq!(data_url(&prefixed, "image/jpeg"), "data:image/png;base64,AAAA");

        let bare = MediaPayload::Base64("AAAA".into());
        assert_eq!(data_url(&bare, "image/webp"), "data:image/webp;base64,AAAA");

        let bytes = MediaPayload::Bytes(b"hi".to_vec());
        assert_eq!(data_url(&bytes, "video/mp4"), "data:video/mp4;base64,aGk=");
    }
}
