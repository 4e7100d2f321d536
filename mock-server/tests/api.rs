use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Channel, EmailRecord, PASSWORD_HEADER};
use serde_json::Value;
use tower::ServiceExt;

const PASSWORD: &str = "hunter2";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(PASSWORD_HEADER, PASSWORD)
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(PASSWORD_HEADER, PASSWORD)
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_password_returns_401_with_message() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/email-configs/get")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "invalid or missing password");
}

#[tokio::test]
async fn login_is_reachable_without_password_header() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"password":"wrong"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn auth_disabled_without_configured_password() {
    let resp = app(None)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notification-channels/get")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let channels: Vec<Channel> = body_json(resp).await;
    assert!(channels.is_empty());
}

// --- notification channels ---

#[tokio::test]
async fn update_unknown_channel_returns_404_detail() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(json_request(
            "POST",
            "/api/notification-channels/update",
            r#"{"channel_id":99,"name":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "channel not found");
}

#[tokio::test]
async fn test_channel_rejects_unknown_server() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(json_request(
            "POST",
            "/api/notification-channels/test",
            r#"{"name":"ops","token":"t","server_name":"Pager"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- email account configs ---

#[tokio::test]
async fn delete_unknown_mail_config_is_a_200_failure() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(json_request(
            "POST",
            "/api/email-configs/delete",
            r#"{"account":"nobody@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
}

// --- email records ---

#[tokio::test]
async fn get_email_not_found() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(get_request("/api/email-records/12"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_emails_rejects_out_of_range_limit() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(get_request("/api/email-records/?limit=0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn recent_emails_rejects_out_of_range_hours() {
    let resp = app(Some(PASSWORD.to_string()))
        .oneshot(get_request(&format!("/api/email-records/recent/{}", u32::MAX)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("out of range"));
}

// --- full lifecycle ---

#[tokio::test]
async fn email_record_lifecycle() {
    use tower::Service;

    let mut app = app(Some(PASSWORD.to_string())).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/email-records/",
            r#"{"sender":"a@example.com","recipient":"a b@example.com","subject":"Invoice"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: EmailRecord = body_json(resp).await;
    assert!(!created.sent);
    let id = created.id;

    // filter by percent-encoded recipient
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/email-records/filter/recipient/a%20b%40example.com?limit=10"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<EmailRecord> = body_json(resp).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);

    // send manually flips the flag
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/email-records/send-manual",
            &format!(r#"{{"email_id":{id}}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/email-records/statistics/overview"))
        .await
        .unwrap();
    let stats: Value = body_json(resp).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["sent"], 1);

    // update only the subject
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/email-records/{id}"),
            r#"{"subject":"Invoice (paid)"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: EmailRecord = body_json(resp).await;
    assert_eq!(updated.subject, "Invoice (paid)");
    assert!(updated.sent); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/email-records/{id}"))
                .header(PASSWORD_HEADER, PASSWORD)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/api/email-records/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
