//! Configuration and file handling for the `adgen-render` binary.

use std::path::{Path, PathBuf};

use tracing::info;

use adgen_models::{AspectRatio, ImageInputs, MediaInput, MediaKind, RenderSpec, RenderedArtifact};

use crate::error::{OrchestratorError, OrchestratorResult};

/// Separator between concepts in `ADGEN_CONCEPTS`.
const CONCEPT_SEPARATOR: &str = "||";

/// One batch run, read from the environment.
#[derive(Debug, Clone)]
pub struct RenderCliConfig {
    pub api_key: String,
    pub model: String,
    pub image_paths: Vec<PathBuf>,
    pub video_path: Option<PathBuf>,
    /// One job per concept
    pub concepts: Vec<String>,
    pub duration_seconds: u32,
    pub aspect_ratio: AspectRatio,
    pub prompt_override: Option<String>,
    pub output_dir: PathBuf,
}

impl RenderCliConfig {
    /// Create config from environment variables.
    pub fn from_env() -> OrchestratorResult<Self> {
        let api_key = std::env::var("KIE_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(OrchestratorError::InvalidApiKey)?;

        let aspect_ratio = match std::env::var("ADGEN_ASPECT_RATIO") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .parse()
                .map_err(|e| OrchestratorError::config_error(format!("ADGEN_ASPECT_RATIO: {e}")))?,
            _ => AspectRatio::default(),
        };

        Ok(Self {
            api_key,
            model: std::env::var("ADGEN_MODEL").unwrap_or_default(),
            image_paths: split_list(&std::env::var("ADGEN_IMAGE_PATHS").unwrap_or_default(), ",")
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            video_path: std::env::var("ADGEN_VIDEO_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| PathBuf::from(s.trim())),
            concepts: split_list(
                &std::env::var("ADGEN_CONCEPTS").unwrap_or_default(),
                CONCEPT_SEPARATOR,
            ),
            duration_seconds: std::env::var("ADGEN_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8),
            aspect_ratio,
            prompt_override: std::env::var("ADGEN_PROMPT_OVERRIDE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            output_dir: PathBuf::from(
                std::env::var("ADGEN_OUTPUT_DIR").unwrap_or_else(|_| "./output".to_string()),
            ),
        })
    }

    /// Read the configured media and build one spec per concept.
    pub async fn build_specs(&self) -> OrchestratorResult<Vec<RenderSpec>> {
        let mut images = Vec::with_capacity(self.image_paths.len());
        for path in &self.image_paths {
            images.push(load_media(path, MediaKind::Image).await?);
        }
        let video = match &self.video_path {
            Some(path) => Some(load_media(path, MediaKind::Video).await?),
            None => None,
        };

        // No concepts still renders one job from the fallback concept.
        let concepts = if self.concepts.is_empty() {
            vec![String::new()]
        } else {
            self.concepts.clone()
        };

        let specs = concepts
            .into_iter()
            .enumerate()
            .map(|(i, concept)| {
                let mut spec = RenderSpec::new(self.model.clone(), concept)
                    .with_images(ImageInputs::List(images.clone()))
                    .with_duration(self.duration_seconds)
                    .with_aspect_ratio(self.aspect_ratio)
                    .with_index(i as u32);
                if let Some(video) = &video {
                    spec = spec.with_reference_video(video.clone());
                }
                if let Some(prompt) = &self.prompt_override {
                    spec = spec.with_prompt_override(prompt.clone());
                }
                spec
            })
            .collect();
        Ok(specs)
    }
}

/// Read a media file; MIME type is guessed from the extension.
pub async fn load_media(path: &Path, kind: MediaKind) -> OrchestratorResult<MediaInput> {
    let bytes = tokio::fs::read(path).await?;
    let mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or_else(|| kind.default_mime());
    Ok(MediaInput::from_bytes(bytes, mime))
}

/// Write an artifact under `dir` without overwriting: `ad_1.mp4`, then
/// `ad_1_1.mp4`, `ad_1_2.mp4`, ...
pub async fn write_artifact(dir: &Path, artifact: &RenderedArtifact) -> OrchestratorResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let name = Path::new(&artifact.suggested_filename);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or("ad");
    let ext = name.extension().and_then(|s| s.to_str()).unwrap_or("mp4");

    let mut target = dir.join(&artifact.suggested_filename);
    let mut n = 0u32;
    while tokio::fs::try_exists(&target).await? {
        n += 1;
        target = dir.join(format!("{stem}_{n}.{ext}"));
    }

    tokio::fs::write(&target, &artifact.bytes).await?;
    info!(path = %target.display(), size = artifact.bytes.len(), "Wrote artifact");
    Ok(target)
}

fn split_list(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgen_models::MediaPayload;

    fn artifact(name: &str, bytes: &[u8]) -> RenderedArtifact {
        RenderedArtifact {
            bytes: bytes.to_vec(),
            suggested_filename: name.to_string(),
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" morning routine || gym bag ||  ", CONCEPT_SEPARATOR),
            vec!["morning routine".to_string(), "gym bag".to_string()]
        );
        assert!(split_list("", ",").is_empty());
    }

    #[tokio::test]
    async fn test_write_artifact_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_artifact(dir.path(), &artifact("ad_1.mp4", b"one")).await.unwrap();
        let second = write_artifact(dir.path(), &artifact("ad_1.mp4", b"two")).await.unwrap();
        let third = write_artifact(dir.path(), &artifact("ad_1.mp4", b"three")).await.unwrap();

        assert_eq!(first.file_name().unwrap(), "ad_1.mp4");
        assert_eq!(second.file_name().unwrap(), "ad_1_1.mp4");
        assert_eq!(third.file_name().unwrap(), "ad_1_2.mp4");
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&third).unwrap(), b"three");
    }

    #[tokio::test]
    async fn test_load_media_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("product.png");
        let clip = dir.path().join("motion.unknownext");
        std::fs::write(&png, [1u8, 2, 3]).unwrap();
        std::fs::write(&clip, [4u8]).unwrap();

        let image = load_media(&png, MediaKind::Image).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.payload, MediaPayload::Bytes(vec![1, 2, 3]));

        let video = load_media(&clip, MediaKind::Video).await.unwrap();
        assert_eq!(video.mime_type, "video/mp4");
    }

    #[tokio::test]
    async fn test_build_specs_one_per_concept() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("a.jpg");
        std::fs::write(&img, [9u8]).unwrap();

        let config = RenderCliConfig {
            api_key: "k".into(),
            model: "kling-2.6/image-to-video".into(),
            image_paths: vec![img],
            video_path: None,
            concepts: vec!["first".into(), "second".into()],
            duration_seconds: 10,
            aspect_ratio: AspectRatio::Landscape,
            prompt_override: None,
            output_dir: dir.path().to_path_buf(),
        };

        let specs = config.build_specs().await.unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].index, 1);
        assert_eq!(specs[1].concept, "second");
        assert_eq!(specs[0].images.len(), 1);
        assert_eq!(specs[0].aspect_ratio, AspectRatio::Landscape);
    }
}
