//! Integration tests for `IpLocator` using wiremock HTTP mocks.

use std::time::Duration;

use hyetaek_app::{GeolocationError, IpLocator, LocationSource, PositionOptions};
use hyetaek_core::Coordinate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> LocationSource {
    let url = format!("{}/json/", server.uri());
    LocationSource::IpLookup(IpLocator::new(&url, "test-agent").expect("client should build"))
}

async fn respond(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn locate_returns_coordinate() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "203.0.113.1",
            "city": "Seoul",
            "latitude": 37.5665,
            "longitude": 126.978
        })),
    )
    .await;

    let coordinate = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .expect("should locate");
    assert_eq!(coordinate, Coordinate::new(37.5665, 126.978));
}

#[tokio::test]
async fn forbidden_maps_to_permission_denied() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(403)).await;

    let err = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, GeolocationError::PermissionDenied);
}

#[tokio::test]
async fn server_error_maps_to_position_unavailable() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(503)).await;

    let err = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, GeolocationError::PositionUnavailable);
}

#[tokio::test]
async fn error_body_maps_to_unknown_with_reason() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": true,
            "reason": "RateLimited"
        })),
    )
    .await;

    let err = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, GeolocationError::Unknown("RateLimited".to_string()));
    assert_eq!(
        err.user_message(),
        "위치 정보를 가져올 수 없습니다. RateLimited"
    );
}

#[tokio::test]
async fn malformed_body_maps_to_unknown() {
    let server = MockServer::start().await;
    respond(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

    let err = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GeolocationError::Unknown(_)));
}

#[tokio::test]
async fn missing_coordinates_map_to_position_unavailable() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ip": "203.0.113.1" })),
    )
    .await;

    let err = source_for(&server)
        .locate(&PositionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, GeolocationError::PositionUnavailable);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    respond(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "latitude": 1.0, "longitude": 2.0 }))
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let options = PositionOptions {
        timeout: Duration::from_millis(100),
        high_accuracy: true,
    };
    let err = source_for(&server)
        .locate(&options)
        .await
        .unwrap_err();
    assert_eq!(err, GeolocationError::Timeout);
}
