//! HTTP-level tests against a mock Kie server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adgen_models::{JobState, MediaInput, MediaKind};

use crate::chat::ChatMessage;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::provider::RenderProvider;
use crate::task::{DirectPollTask, TaskPollInput, TaskPollTask, TaskSpec};
use adgen_models::ProviderFamily;

const KEY: &str = "test-key";

async fn gateway(server: &MockServer) -> Gateway {
    Gateway::new(GatewayConfig::with_base_url(server.uri())).unwrap()
}

fn veo_task() -> TaskSpec {
    TaskSpec::DirectPoll(DirectPollTask {
        prompt: "A bottle on a marble counter.".into(),
        image_urls: vec!["https://files/1.jpg".into()],
        model: "veo3_fast".into(),
        aspect_ratio: "9:16".into(),
        generation_type: "FIRST_AND_LAST_FRAMES_2_VIDEO".into(),
        callback_url: None,
    })
}

#[tokio::test]
async fn test_upload_wraps_bare_base64() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/file-base64-upload"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("data:image/png;base64,AAAA"))
        .and(body_partial_json(json!({"uploadPath": "images"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"downloadUrl": "https://files/img.png"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let media = MediaInput::from_base64("AAAA", "image/png");
    let url = gw.upload_media(" test-key ", &media, MediaKind::Image).await.unwrap();
    assert_eq!(url, "https://files/img.png");
}

#[tokio::test]
async fn test_upload_forwards_prefixed_data_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/file-base64-upload"))
        .and(body_partial_json(json!({
            "base64Data": "data:video/mp4;base64,BBBB",
            "uploadPath": "videos"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"fileUrl": "https://files/clip.mp4"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let media = MediaInput::from_base64("data:video/mp4;base64,BBBB", "");
    let url = gw.upload_media(KEY, &media, MediaKind::Video).await.unwrap();
    assert_eq!(url, "https://files/clip.mp4");
}

#[tokio::test]
async fn test_upload_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/file-base64-upload"))
        .and(header("authorization", "Bearer bad"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/file-base64-upload"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": {}})))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let media = MediaInput::from_bytes(vec![1, 2, 3], "image/jpeg");

    let err = gw.upload_media("bad", &media, MediaKind::Image).await.unwrap_err();
    assert!(err.is_auth_error());

    let err = gw.upload_media(KEY, &media, MediaKind::Image).await.unwrap_err();
    assert!(matches!(err, GatewayError::UploadFailed(_)));
}

#[tokio::test]
async fn test_blank_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let err = gw
        .family(ProviderFamily::DirectPoll)
        .submit("  ", &veo_task())
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_veo_submit_requires_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/veo/generate"))
        .and(body_partial_json(json!({"generationType": "FIRST_AND_LAST_FRAMES_2_VIDEO"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": {}})))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let err = gw
        .family(ProviderFamily::DirectPoll)
        .submit(KEY, &veo_task())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No taskId in Veo response.");
}

#[tokio::test]
async fn test_veo_success_without_urls_consults_high_res() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .and(query_param("taskId", "veo-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"successFlag": 1, "response": {"resultUrls": []}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/get-1080p-video"))
        .and(query_param("taskId", "veo-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"resultUrl": "https://cdn/veo-1-1080p.mp4"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let status = gw
        .family(ProviderFamily::DirectPoll)
        .query_status(KEY, "veo-1")
        .await
        .unwrap();
    assert_eq!(status.state, JobState::Success);
    assert_eq!(status.first_url(), Some("https://cdn/veo-1-1080p.mp4"));
}

#[tokio::test]
async fn test_veo_failure_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"successFlag": 3}
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let status = gw
        .family(ProviderFamily::DirectPoll)
        .query_status(KEY, "veo-2")
        .await
        .unwrap();
    assert_eq!(status.state, JobState::Fail);
    assert_eq!(status.fail_message.as_deref(), Some("Video generation failed."));
}

#[tokio::test]
async fn test_task_poll_fail_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/recordInfo"))
        .and(query_param("taskId", "job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"taskId": "job-9", "state": "fail", "failMsg": "quota exceeded"}
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let status = gw
        .family(ProviderFamily::TaskPoll)
        .query_status(KEY, "job-9")
        .await
        .unwrap();
    assert_eq!(status.state, JobState::Fail);
    assert_eq!(status.fail_message.as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn test_task_poll_submit_and_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/jobs/createTask"))
        .and(body_partial_json(json!({
            "model": "kling-2.6/image-to-video",
            "input": {"sound": false, "duration": "10"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"taskId": "job-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/recordInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"state": "success", "resultJson": "{\"resultUrls\":[\"https://cdn/job-1.mp4\"]}"}
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let provider = gw.family(ProviderFamily::TaskPoll);
    let task = TaskSpec::TaskPoll(TaskPollTask {
        model: "kling-2.6/image-to-video".into(),
        input: TaskPollInput::Clip {
            prompt: "p".into(),
            image_urls: vec!["https://files/1.jpg".into()],
            sound: false,
            duration: "10".into(),
        },
        callback_url: None,
    });

    let task_id = provider.submit(KEY, &task).await.unwrap();
    assert_eq!(task_id, "job-1");

    let status = provider.query_status(KEY, &task_id).await.unwrap();
    assert_eq!(status.state, JobState::Success);
    assert_eq!(status.first_url(), Some("https://cdn/job-1.mp4"));
}

#[tokio::test]
async fn test_mismatched_family_is_rejected() {
    let server = MockServer::start().await;
    let gw = gateway(&server).await;
    let err = gw
        .family(ProviderFamily::TaskPoll)
        .submit(KEY, &veo_task())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_resolver_falls_back_to_raw_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/common/download-url"))
        .and(body_partial_json(json!({"url": "https://internal/raw.mp4"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let url = gw
        .resolve_download_url(KEY, "https://internal/raw.mp4")
        .await
        .unwrap();
    assert_eq!(url, "https://internal/raw.mp4");
}

#[tokio::test]
async fn test_resolver_keeps_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/common/download-url"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let err = gw.resolve_download_url(KEY, "https://internal/raw.mp4").await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_credit_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/credit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "msg": "success", "data": 1250
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    assert_eq!(gw.check_credit(KEY).await.unwrap(), 1250.0);
}

#[tokio::test]
async fn test_envelope_code_401_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/credit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401, "msg": "You do not have access permissions"
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    assert!(gw.check_credit(KEY).await.unwrap_err().is_auth_error());
}

#[tokio::test]
async fn test_chat_completion_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-2.5-flash/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false, "include_thoughts": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"parts": [{"text": "Slow dolly toward the bottle."}]}}]
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let text = gw
        .chat_completion(KEY, &[ChatMessage::system("sys"), ChatMessage::user("idea")])
        .await
        .unwrap();
    assert_eq!(text, "Slow dolly toward the bottle.");
}

#[tokio::test]
async fn test_chat_wrapper_without_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini-2.5-flash/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200, "msg": "content filtered"
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let err = gw
        .chat_completion(KEY, &[ChatMessage::user("idea")])
        .await
        .unwrap_err();
    match err {
        GatewayError::EmptyContent(reason) => assert_eq!(reason, "content filtered"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/ad.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8, 1, 2, 3]))
        .mount(&server)
        .await;

    let gw = gateway(&server).await;
    let bytes = gw
        .fetch_bytes(&format!("{}/files/ad.mp4", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, vec![0u8, 1, 2, 3]);
}

#[tokio::test]
async fn test_truncated_body_is_network_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Promises 100 bytes, sends a fragment, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"code\":")
            .await;
        let _ = socket.shutdown().await;
    });

    let gw = Gateway::new(GatewayConfig::with_base_url(format!("http://{addr}"))).unwrap();
    let err = gw.check_credit(KEY).await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
}
