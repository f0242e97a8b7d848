use bikeroute_lib::{Error, Notification, Notifier};
use reqwest::Client;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn error_notification_is_posted_to_error_topic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bike-route-errors"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::new(Client::new(), server.uri())
        .with_error_topic(Some("bike-route-errors".to_string()));
    let sent = notifier
        .send(&Notification::error("upstream timeout", "Route Handler"))
        .await
        .expect("delivery succeeds");
    assert!(sent);

    let requests = server.received_requests().await.expect("recording enabled");
    let body = String::from_utf8(requests[0].body.clone()).expect("utf-8 body");
    assert!(body.starts_with("Error occurred: upstream timeout | Context: Route Handler\nTime: "));
}

#[tokio::test]
async fn kinds_without_topic_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = Notifier::new(Client::new(), server.uri())
        .with_error_topic(Some("bike-route-errors".to_string()));
    let sent = notifier
        .send(&Notification::info("Route request processed", "Route Handler"))
        .await
        .expect("skip is not an error");
    assert!(!sent);
}

#[tokio::test]
async fn rejected_delivery_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bike-route-info"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let notifier = Notifier::new(Client::new(), format!("{}/", server.uri()))
        .with_info_topic(Some("bike-route-info".to_string()));
    let err = notifier
        .send(&Notification::info("Route request processed", "Route Handler"))
        .await
        .unwrap_err();

    match err {
        Error::NotificationRejected { topic, status } => {
            assert_eq!(topic, "bike-route-info");
            assert_eq!(status, 429);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
