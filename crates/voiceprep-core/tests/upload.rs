mod common;

use voiceprep_core::{ErrorKind, Settings, UploadClient, UploadResult, UploadTarget};

fn client_for(base_url: &str, timeout_secs: u64) -> UploadClient {
    let settings = Settings {
        api_base_url: base_url.to_string(),
        timeout_secs,
    };
    UploadClient::from_settings(&settings).unwrap()
}

#[tokio::test]
async fn test_success_returns_absolute_url() {
    let server = common::serve_once(
        200,
        r#"{"success": true, "audioUrl": "/files/x.wav", "message": "ok"}"#,
    )
    .await;
    let base = server.base_url.clone();
    let client = client_for(&base, 10);

    let result = client
        .upload(UploadTarget::RecordedAudio, "x.wav", b"RIFF....".to_vec(), "audio/wav")
        .await;

    assert_eq!(
        result,
        UploadResult::Success {
            url: format!("{base}/files/x.wav")
        }
    );

    let request = server.request().await;
    assert_eq!(
        request.request_line(),
        "POST /api/v1/files/upload/recorded-audio HTTP/1.1"
    );
    assert!(request.head.to_ascii_lowercase().contains("multipart/form-data"));
    let body = request.body_text();
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="x.wav""#));
    assert!(body.contains("Content-Type: audio/wav"));
    assert!(body.contains("RIFF...."));
}

#[tokio::test]
async fn test_image_upload_hits_image_endpoint() {
    let server = common::serve_once(
        200,
        r#"{"success": true, "imageUrl": "/static/uploads/avatars/a.png"}"#,
    )
    .await;
    let client = client_for(&server.base_url, 10);

    let result = client
        .upload(UploadTarget::Image, "a.png", vec![0x89, b'P', b'N', b'G'], "image/png")
        .await;

    assert!(result.is_success());
    assert!(result.url().unwrap().ends_with("/static/uploads/avatars/a.png"));
    let request = server.request().await;
    assert!(request.request_line().contains("/api/v1/files/upload/image "));
}

#[tokio::test]
async fn test_success_false_is_application_error() {
    let server = common::serve_once(200, r#"{"success": false}"#).await;
    let client = client_for(&server.base_url, 10);

    let result = client
        .upload(UploadTarget::TrainingAudio, "t.wav", vec![0; 16], "audio/wav")
        .await;

    assert_eq!(result.kind(), Some(ErrorKind::ApplicationError));
}

#[tokio::test]
async fn test_non_2xx_is_server_rejected() {
    let server = common::serve_once(
        400,
        r#"{"success": false, "message": "only WAV and MP3 are supported"}"#,
    )
    .await;
    let client = client_for(&server.base_url, 10);

    let result = client
        .upload(UploadTarget::ReferenceAudio, "r.mp3", vec![0; 16], "audio/mpeg")
        .await;

    match result {
        UploadResult::Failure { kind, message } => {
            assert_eq!(kind, ErrorKind::ServerRejected);
            assert!(message.contains("only WAV and MP3 are supported"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_is_malformed_response() {
    let server = common::serve_once(200, "<html>proxy error</html>").await;
    let client = client_for(&server.base_url, 10);

    let result = client
        .upload(UploadTarget::RecordedAudio, "x.wav", vec![0; 16], "audio/wav")
        .await;

    assert_eq!(result.kind(), Some(ErrorKind::MalformedResponse));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let base = common::closed_port().await;
    let client = client_for(&base, 10);

    let result = client
        .upload(UploadTarget::RecordedAudio, "x.wav", vec![0; 16], "audio/wav")
        .await;

    assert_eq!(result.kind(), Some(ErrorKind::NetworkError));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let base = common::serve_silently().await;
    let client = client_for(&base, 1);

    let result = client
        .upload(UploadTarget::RecordedAudio, "x.wav", vec![0; 16], "audio/wav")
        .await;

    assert_eq!(result.kind(), Some(ErrorKind::NetworkError));
}
