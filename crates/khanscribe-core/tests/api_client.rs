use khanscribe_core::{ApiClient, ContentSource, KhanscribeError};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn children_extracts_node_slugs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/topic/physics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Physics",
            "children": [
                {"node_slug": "one-dimensional-motion", "kind": "Topic"},
                {"node_slug": "forces-newtons-laws", "kind": "Topic"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let children = client_for(&server).await.children("physics").await.unwrap();
    assert_eq!(children, vec!["one-dimensional-motion", "forces-newtons-laws"]);
}

#[tokio::test]
async fn youtube_id_from_video_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos/introduction-to-limits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readable_id": "introduction-to-limits",
            "youtube_id": "riXcZT2ICjA"
        })))
        .mount(&server)
        .await;

    let id = client_for(&server)
        .await
        .youtube_id("introduction-to-limits")
        .await
        .unwrap();
    assert_eq!(id, "riXcZT2ICjA");
}

#[tokio::test]
async fn transcript_is_space_joined_without_newlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/videos/riXcZT2ICjA/transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"start": 0, "text": "Let's think about\nwhat a limit is."},
            {"start": 4100, "text": "Consider f of x."}
        ])))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .await
        .transcript("riXcZT2ICjA")
        .await
        .unwrap();
    assert_eq!(text, "Let's think about what a limit is. Consider f of x.");
}

#[tokio::test]
async fn missing_field_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/topic/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "no children"})))
        .mount(&server)
        .await;

    let err = client_for(&server).await.children("broken").await.unwrap_err();
    assert!(matches!(err, KhanscribeError::MalformedResponse { .. }));
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/videos/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.youtube_id("html").await.unwrap_err();
    assert!(matches!(err, KhanscribeError::MalformedResponse { .. }));
}

#[tokio::test]
async fn fragment_without_text_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/videos/yt1/transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"start": 0}])))
        .mount(&server)
        .await;

    let err = client_for(&server).await.transcript("yt1").await.unwrap_err();
    match err {
        KhanscribeError::MalformedResponse { url, .. } => {
            assert!(url.ends_with("/api/internal/videos/yt1/transcript"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/topic/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).await.children("gone").await.unwrap_err();
    match err {
        KhanscribeError::UnexpectedStatus { status, url } => {
            assert_eq!(status.as_u16(), 404);
            assert!(url.ends_with("/api/v1/topic/gone"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn connection_failure_is_api_error() {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.children("physics").await.unwrap_err();
    assert!(matches!(err, KhanscribeError::ApiError(_)));
}
