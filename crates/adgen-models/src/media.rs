//! Media inputs handed to the provider gateway for upload.

use serde::{Deserialize, Serialize};

/// Upload category; selects the provider-side folder and filename defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Provider-side upload folder.
    pub fn upload_path(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    pub fn default_mime(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
        }
    }

    /// File extension for an upload of this kind with the given MIME type.
    pub fn extension_for(&self, mime_type: &str) -> &'static str {
        let mime = mime_type.to_lowercase();
        match self {
            MediaKind::Image if mime.contains("png") => "png",
            MediaKind::Image if mime.contains("webp") => "webp",
            MediaKind::Image => "jpg",
            MediaKind::Video if mime.contains("quicktime") || mime.contains("mov") => "mov",
            MediaKind::Video => "mp4",
        }
    }
}

/// Media content as supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaPayload {
    /// Raw file bytes; base64-encoded at upload time.
    Bytes(Vec<u8>),
    /// Already encoded: bare base64 or a `data:<mime>;base64,` URL.
    Base64(String),
}

impl std::fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaPayload::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            MediaPayload::Base64(s) => write!(f, "Base64({} chars)", s.len()),
        }
    }
}

/// One image or video input, owned by the caller until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInput {
    pub payload: MediaPayload,
    pub mime_type: String,
}

impl MediaInput {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: MediaPayload::Bytes(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_base64(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: MediaPayload::Base64(data.into()),
            mime_type: mime_type.into(),
        }
    }

    /// MIME type, or the kind's default when the caller left it blank.
    pub fn mime_or_default(&self, kind: MediaKind) -> &str {
        let trimmed = self.mime_type.trim();
        if trimmed.is_empty() {
            kind.default_mime()
        } else {
            trimmed
        }
    }
}

/// Image inputs in either of the shapes callers send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageInputs {
    #[default]
    None,
    Single(MediaInput),
    List(Vec<MediaInput>),
}

impl ImageInputs {
    /// Build a list from parallel payload / MIME arrays; missing MIME types
    /// fall back to `image/jpeg`.
    pub fn from_parallel(payloads: Vec<MediaPayload>, mime_types: &[String]) -> Self {
        let images = payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| MediaInput {
                payload,
                mime_type: mime_types
                    .get(i)
                    .filter(|m| !m.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| MediaKind::Image.default_mime().to_string()),
            })
            .collect();
        ImageInputs::List(images)
    }

    /// Collapse to one ordered list. Order is significant: for two-image
    /// models the first entry is the first frame.
    pub fn into_ordered(self) -> Vec<MediaInput> {
        match self {
            ImageInputs::None => Vec::new(),
            ImageInputs::Single(image) => vec![image],
            ImageInputs::List(images) => images,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImageInputs::None => 0,
            ImageInputs::Single(_) => 1,
            ImageInputs::List(images) => images.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
