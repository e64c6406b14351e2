//! Model-specific task construction.
//!
//! Maps a resolved model, its uploaded media and the rendering prompt to the
//! exact submission body each provider expects.

use adgen_gateway::{DirectPollTask, TaskPollInput, TaskPollTask, TaskSpec};
use adgen_models::{AspectRatio, VideoModel};

/// Veo image-to-video mode; used for one or two images.
const VEO_GENERATION_TYPE: &str = "FIRST_AND_LAST_FRAMES_2_VIDEO";
const MOTION_ORIENTATION: &str = "video";
const MOTION_MODE: &str = "720p";

/// Default clip length when the caller leaves the duration unset (0).
const DEFAULT_DURATION_SECS: u32 = 8;

/// Hosted media for one job, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedMedia {
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
}

/// Everything needed to build a task besides the model.
#[derive(Debug, Clone)]
pub struct TaskInputs<'a> {
    pub prompt: &'a str,
    pub media: &'a UploadedMedia,
    pub duration_seconds: u32,
    pub aspect_ratio: AspectRatio,
    pub callback_url: Option<&'a str>,
}

/// Frame model buckets: 1-4 → 4, 5-6 → 6, anything longer → 8.
pub fn veo_duration_bucket(duration_seconds: u32) -> u32 {
    match duration_seconds {
        0 => DEFAULT_DURATION_SECS,
        1..=4 => 4,
        5..=6 => 6,
        _ => 8,
    }
}

/// Frame-count models: `"15"` from 12 s up, else `"10"`.
pub fn n_frames_bucket(duration_seconds: u32) -> &'static str {
    if duration_seconds >= 12 {
        "15"
    } else {
        "10"
    }
}

/// Seconds-based image model: `"10"` from 8 s up, else `"5"`.
pub fn clip_duration_bucket(duration_seconds: u32) -> &'static str {
    if duration_seconds >= 8 {
        "10"
    } else {
        "5"
    }
}

/// Requested duration with 0 read as unset.
pub fn requested_duration(duration_seconds: u32) -> u32 {
    if duration_seconds == 0 {
        DEFAULT_DURATION_SECS
    } else {
        duration_seconds
    }
}

/// Length of the clip the model will actually render.
pub fn effective_duration(model: VideoModel, requested: u32) -> u32 {
    let requested = requested_duration(requested);
    match model {
        VideoModel::Veo3Fast | VideoModel::Veo3 => veo_duration_bucket(requested),
        VideoModel::Sora2ImageToVideo | VideoModel::Sora2TextToVideo => {
            n_frames_bucket(requested).parse().unwrap_or(10)
        }
        VideoModel::KlingImageToVideo => clip_duration_bucket(requested).parse().unwrap_or(5),
        VideoModel::KlingMotionControl => requested,
    }
}

/// Prefix the rendering prompt with how the uploaded images are to be used.
///
/// Two images are the first and last frame; a single image is the product.
pub fn frame_prompt(prompt: &str, image_count: usize) -> String {
    let preamble = match image_count {
        0 => return prompt.to_string(),
        1 => "The attached image is the product image.\n\
              Always refer to this input image as the product image.",
        _ => "The first attached image is the first frame and the second attached image is the last frame.\n\
              The video must transition smoothly from the first frame to the last frame, \
              keeping the product consistent throughout.",
    };
    format!("{preamble}\n\n{prompt}")
}

/// Build the submission for `model`.
pub fn build_task(model: VideoModel, inputs: &TaskInputs<'_>) -> TaskSpec {
    let prompt = inputs.prompt.to_string();
    let image_urls = inputs.media.image_urls.clone();
    let callback_url = inputs.callback_url.map(str::to_string);
    let duration_seconds = requested_duration(inputs.duration_seconds);

    match model {
        VideoModel::Veo3Fast | VideoModel::Veo3 => TaskSpec::DirectPoll(DirectPollTask {
            prompt,
            image_urls,
            model: model.as_str().to_string(),
            aspect_ratio: inputs.aspect_ratio.as_ratio().to_string(),
            generation_type: VEO_GENERATION_TYPE.to_string(),
            callback_url,
        }),
        VideoModel::Sora2ImageToVideo | VideoModel::Sora2TextToVideo => {
            let image_urls = if model == VideoModel::Sora2TextToVideo {
                Vec::new()
            } else {
                image_urls
            };
            task_poll(
                model,
                TaskPollInput::Frames {
                    prompt,
                    image_urls,
                    aspect_ratio: inputs.aspect_ratio.as_orientation().to_string(),
                    n_frames: n_frames_bucket(duration_seconds).to_string(),
                    remove_watermark: true,
                },
                callback_url,
            )
        }
        VideoModel::KlingImageToVideo => task_poll(
            model,
            TaskPollInput::Clip {
                prompt,
                image_urls,
                sound: false,
                duration: clip_duration_bucket(duration_seconds).to_string(),
            },
            callback_url,
        ),
        VideoModel::KlingMotionControl => task_poll(
            model,
            TaskPollInput::MotionControl {
                prompt,
                input_urls: image_urls,
                video_urls: inputs.media.video_url.iter().cloned().collect(),
                character_orientation: MOTION_ORIENTATION.to_string(),
                mode: MOTION_MODE.to_string(),
            },
            callback_url,
        ),
    }
}

fn task_poll(model: VideoModel, input: TaskPollInput, callback_url: Option<String>) -> TaskSpec {
    TaskSpec::TaskPoll(TaskPollTask {
        model: model.as_str().to_string(),
        input,
        callback_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(media: &'a UploadedMedia, duration_seconds: u32) -> TaskInputs<'a> {
        TaskInputs {
            prompt: "prompt",
            media,
            duration_seconds,
            aspect_ratio: AspectRatio::Portrait,
            callback_url: None,
        }
    }

    #[test]
    fn test_veo_buckets() {
        for d in 1..=4 {
            assert_eq!(veo_duration_bucket(d), 4, "duration {d}");
        }
        assert_eq!(veo_duration_bucket(5), 6);
        assert_eq!(veo_duration_bucket(6), 6);
        for d in [7, 8, 9, 30] {
            assert_eq!(veo_duration_bucket(d), 8, "duration {d}");
        }
        assert_eq!(veo_duration_bucket(0), 8);
    }

    #[test]
    fn test_n_frames_and_clip_buckets() {
        assert_eq!(n_frames_bucket(11), "10");
        assert_eq!(n_frames_bucket(12), "15");
        assert_eq!(n_frames_bucket(4), "10");
        assert_eq!(clip_duration_bucket(7), "5");
        assert_eq!(clip_duration_bucket(8), "10");
    }

    #[test]
    fn test_effective_duration() {
        assert_eq!(effective_duration(VideoModel::Veo3Fast, 5), 6);
        assert_eq!(effective_duration(VideoModel::Sora2TextToVideo, 15), 15);
        assert_eq!(effective_duration(VideoModel::Sora2ImageToVideo, 8), 10);
        assert_eq!(effective_duration(VideoModel::KlingImageToVideo, 6), 5);
        assert_eq!(effective_duration(VideoModel::KlingMotionControl, 7), 7);
    }

    #[test]
    fn test_unset_duration_matches_default_for_every_model() {
        let media = UploadedMedia {
            image_urls: vec!["https://f/1.jpg".into()],
            video_url: Some("https://f/ref.mp4".into()),
        };
        for model in [
            VideoModel::Veo3Fast,
            VideoModel::Veo3,
            VideoModel::Sora2ImageToVideo,
            VideoModel::Sora2TextToVideo,
            VideoModel::KlingImageToVideo,
            VideoModel::KlingMotionControl,
        ] {
            assert_eq!(
                build_task(model, &inputs(&media, 0)),
                build_task(model, &inputs(&media, DEFAULT_DURATION_SECS)),
                "{model}"
            );
            assert_eq!(
                effective_duration(model, 0),
                effective_duration(model, DEFAULT_DURATION_SECS),
                "{model}"
            );
        }

        let TaskSpec::TaskPoll(kling) = build_task(VideoModel::KlingImageToVideo, &inputs(&media, 0)) else {
            panic!("expected task-poll");
        };
        let TaskPollInput::Clip { duration, .. } = kling.input else {
            panic!("expected clip input");
        };
        assert_eq!(duration, effective_duration(VideoModel::KlingImageToVideo, 0).to_string());
    }

    #[test]
    fn test_frame_prompt_mentions_transition_only_for_two_images() {
        let two = frame_prompt("Bottle on a counter.", 2);
        assert!(two.contains("transition"));
        assert!(two.contains("first frame"));
        assert!(two.contains("last frame"));
        assert!(two.ends_with("Bottle on a counter."));

        let one = frame_prompt("Bottle on a counter.", 1);
        assert!(!one.contains("transition"));
        assert!(one.contains("product image"));

        assert_eq!(frame_prompt("Bottle on a counter.", 0), "Bottle on a counter.");
    }

    #[test]
    fn test_veo_task() {
        let media = UploadedMedia {
            image_urls: vec!["https://f/1.jpg".into(), "https://f/2.jpg".into()],
            video_url: None,
        };
        match build_task(VideoModel::Veo3, &inputs(&media, 8)) {
            TaskSpec::DirectPoll(task) => {
                assert_eq!(task.model, "veo3");
                assert_eq!(task.aspect_ratio, "9:16");
                assert_eq!(task.generation_type, VEO_GENERATION_TYPE);
                assert_eq!(task.image_urls.len(), 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_task_poll_inputs() {
        let media = UploadedMedia {
            image_urls: vec!["https://f/1.jpg".into()],
            video_url: Some("https://f/ref.mp4".into()),
        };

        let TaskSpec::TaskPoll(sora) = build_task(VideoModel::Sora2ImageToVideo, &inputs(&media, 12)) else {
            panic!("expected task-poll");
        };
        assert_eq!(
            sora.input,
            TaskPollInput::Frames {
                prompt: "prompt".into(),
                image_urls: vec!["https://f/1.jpg".into()],
                aspect_ratio: "portrait".into(),
                n_frames: "15".into(),
                remove_watermark: true,
            }
        );

        let TaskSpec::TaskPoll(text) = build_task(VideoModel::Sora2TextToVideo, &inputs(&media, 10)) else {
            panic!("expected task-poll");
        };
        assert!(matches!(text.input, TaskPollInput::Frames { ref image_urls, .. } if image_urls.is_empty()));

        let TaskSpec::TaskPoll(kling) = build_task(VideoModel::KlingImageToVideo, &inputs(&media, 5)) else {
            panic!("expected task-poll");
        };
        assert!(matches!(kling.input, TaskPollInput::Clip { sound: false, ref duration, .. } if duration == "5"));

        let TaskSpec::TaskPoll(motion) = build_task(VideoModel::KlingMotionControl, &inputs(&media, 5)) else {
            panic!("expected task-poll");
        };
        assert_eq!(motion.model, "kling-2.6/motion-control");
        assert_eq!(
            motion.input,
            TaskPollInput::MotionControl {
                prompt: "prompt".into(),
                input_urls: vec!["https://f/1.jpg".into()],
                video_urls: vec!["https://f/ref.mp4".into()],
                character_orientation: "video".into(),
                mode: "720p".into(),
            }
        );
    }
}
