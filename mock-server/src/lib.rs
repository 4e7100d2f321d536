//! In-memory stand-in for the console backend.
//!
//! Serves the same JSON contract under `/api` with password checking on
//! every route except `/api/login`. Channel tests and schedule runs return
//! canned results; nothing is ever sent.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const PASSWORD_HEADER: &str = "X-Password";

const NOTIFICATION_SERVERS: &[&str] = &["Telegram", "ServerChan", "Bark", "DingTalk"];
const EMAIL_SERVERS: &[&str] = &["QQ", "163", "126", "Gmail", "Outlook"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub server_name: String,
    pub chat_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateChannel {
    pub name: String,
    pub token: String,
    pub server_name: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateChannel {
    pub channel_id: i64,
    pub name: Option<String>,
    pub token: Option<String>,
    pub server_name: Option<String>,
    pub chat_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ChannelId {
    pub channel_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MailConfig {
    pub account: String,
    pub auth_code: String,
    pub server_name: String,
    pub channel_id: String,
}

#[derive(Deserialize)]
pub struct UpsertMailConfig {
    pub account: String,
    pub auth_code: String,
    pub server: String,
    pub server_name: String,
    pub channel_id: i64,
}

#[derive(Deserialize)]
pub struct TestMailConfig {
    pub account: String,
    pub auth_code: String,
    pub server_name: String,
    #[serde(default = "default_channel")]
    pub channel_id: i64,
}

fn default_channel() -> i64 {
    1
}

#[derive(Deserialize)]
pub struct Account {
    pub account: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub reception_time: NaiveDateTime,
    pub body_text: Option<String>,
    pub sent: bool,
}

#[derive(Deserialize)]
pub struct CreateEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub sent: bool,
    #[serde(default)]
    pub reception_time: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct UpdateEmail {
    pub subject: Option<String>,
    pub body_text: Option<String>,
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Deserialize)]
pub struct Limit {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[derive(Deserialize, Default)]
pub struct Search {
    pub keyword: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub sent: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SendOne {
    pub email_id: i64,
}

#[derive(Deserialize)]
pub struct SendMany {
    pub email_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct Login {
    pub password: String,
}

#[derive(Default)]
pub struct Store {
    pub channels: BTreeMap<i64, Channel>,
    pub mail_configs: BTreeMap<String, MailConfig>,
    pub emails: BTreeMap<i64, EmailRecord>,
    next_channel_id: i64,
    next_email_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    password: Option<Arc<str>>,
}

type ApiError = (StatusCode, Json<Value>);

fn not_found(detail: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail })))
}

/// Builds the router. `password: None` disables authentication.
pub fn app(password: Option<String>) -> Router {
    let state = AppState {
        db: Db::default(),
        password: password.map(Arc::from),
    };

    let protected = Router::new()
        .route("/notification-channels/get", post(list_channels))
        .route("/notification-channels/add", post(create_channel))
        .route("/notification-channels/update", post(update_channel))
        .route("/notification-channels/delete", post(delete_channel))
        .route("/notification-channels/test", post(test_channel))
        .route("/notification-channels/get_servers", post(notification_servers))
        .route("/email-configs/get", post(list_mail_configs))
        .route("/email-configs/add", post(create_mail_config))
        .route("/email-configs/update", post(update_mail_config))
        .route("/email-configs/delete", post(delete_mail_config))
        .route("/email-configs/test", post(test_mail_config))
        .route("/email-configs/run_schedule", post(run_schedule))
        .route("/email-configs/get_servers", post(email_servers))
        .route("/email-records/", get(list_emails).post(create_email))
        .route("/email-records/statistics/overview", get(statistics))
        .route("/email-records/search", post(search_emails))
        .route("/email-records/recent/{hours}", get(recent_emails))
        .route("/email-records/filter/sent/{sent}", get(emails_by_sent))
        .route("/email-records/filter/recipient/{recipient}", get(emails_by_recipient))
        .route("/email-records/send-manual", post(send_manual))
        .route("/email-records/send-batch", post(send_batch))
        .route(
            "/email-records/{email_id}",
            get(get_email).put(update_email).delete(delete_email),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_password));

    let api = Router::new().route("/login", post(login)).merge(protected);

    Router::new().nest("/api", api).with_state(state)
}

pub async fn run(listener: TcpListener, password: Option<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(password)).await
}

async fn require_password(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.password.as_deref() else {
        return next.run(request).await;
    };
    let supplied = request
        .headers()
        .get(PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());
    if supplied == Some(expected) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid password");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized", "message": "invalid or missing password" })),
        )
            .into_response()
    }
}

async fn login(State(state): State<AppState>, Json(input): Json<Login>) -> Json<Value> {
    let accepted = match state.password.as_deref() {
        Some(expected) => !input.password.is_empty() && input.password == expected,
        None => true,
    };
    if accepted {
        Json(json!({ "success": true, "message": "login succeeded" }))
    } else {
        Json(json!({ "success": false, "message": "wrong password" }))
    }
}

// --- notification channels ---

async fn list_channels(State(state): State<AppState>) -> Json<Vec<Channel>> {
    let store = state.db.read().await;
    Json(store.channels.values().cloned().collect())
}

async fn create_channel(
    State(state): State<AppState>,
    Json(input): Json<CreateChannel>,
) -> Json<Channel> {
    let mut store = state.db.write().await;
    store.next_channel_id += 1;
    let channel = Channel {
        id: store.next_channel_id,
        name: input.name,
        token: input.token,
        server_name: input.server_name,
        chat_id: input.chat_id,
    };
    store.channels.insert(channel.id, channel.clone());
    Json(channel)
}

async fn update_channel(
    State(state): State<AppState>,
    Json(input): Json<UpdateChannel>,
) -> Result<Json<Channel>, ApiError> {
    let mut store = state.db.write().await;
    let channel = store
        .channels
        .get_mut(&input.channel_id)
        .ok_or_else(|| not_found("channel not found"))?;
    if let Some(name) = input.name {
        channel.name = name;
    }
    if let Some(token) = input.token {
        channel.token = token;
    }
    if let Some(server_name) = input.server_name {
        channel.server_name = server_name;
    }
    if let Some(chat_id) = input.chat_id {
        channel.chat_id = Some(chat_id);
    }
    Ok(Json(channel.clone()))
}

async fn delete_channel(
    State(state): State<AppState>,
    Json(input): Json<ChannelId>,
) -> Result<Json<Value>, ApiError> {
    let mut store = state.db.write().await;
    store
        .channels
        .remove(&input.channel_id)
        .map(|_| Json(json!({ "message": "deleted" })))
        .ok_or_else(|| not_found("channel not found"))
}

async fn test_channel(Json(input): Json<CreateChannel>) -> Result<Json<Value>, ApiError> {
    if !NOTIFICATION_SERVERS.contains(&input.server_name.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": format!("test failed: unknown server {}", input.server_name) })),
        ));
    }
    Ok(Json(json!({ "success": true, "message": "test message accepted" })))
}

async fn notification_servers() -> Json<&'static [&'static str]> {
    Json(NOTIFICATION_SERVERS)
}

// --- email account configs ---

async fn list_mail_configs(State(state): State<AppState>) -> Json<Vec<MailConfig>> {
    let store = state.db.read().await;
    Json(store.mail_configs.values().cloned().collect())
}

async fn create_mail_config(
    State(state): State<AppState>,
    Json(input): Json<UpsertMailConfig>,
) -> Json<Value> {
    let mut store = state.db.write().await;
    if store.mail_configs.contains_key(&input.account) {
        return Json(json!({ "success": false, "message": "create failed" }));
    }
    let config = MailConfig {
        account: input.account,
        auth_code: input.auth_code,
        server_name: input.server_name,
        channel_id: input.channel_id.to_string(),
    };
    store.mail_configs.insert(config.account.clone(), config.clone());
    Json(json!({ "success": true, "message": "created", "data": config }))
}

async fn update_mail_config(
    State(state): State<AppState>,
    Json(input): Json<UpsertMailConfig>,
) -> Json<Value> {
    let mut store = state.db.write().await;
    let Some(config) = store.mail_configs.get_mut(&input.account) else {
        return Json(json!({ "success": false, "message": "config not found" }));
    };
    config.auth_code = input.auth_code;
    config.server_name = input.server_name;
    config.channel_id = input.channel_id.to_string();
    Json(json!({ "success": true, "message": "updated", "data": config.clone() }))
}

async fn delete_mail_config(
    State(state): State<AppState>,
    Json(input): Json<Account>,
) -> Json<Value> {
    let mut store = state.db.write().await;
    match store.mail_configs.remove(&input.account) {
        Some(_) => Json(json!({ "success": true, "message": "deleted" })),
        None => Json(json!({ "success": false, "message": "config not found" })),
    }
}

async fn test_mail_config(State(state): State<AppState>, Json(input): Json<TestMailConfig>) -> Json<Value> {
    tracing::info!(account = %input.account, server = %input.server_name, channel = input.channel_id, "testing mail config");
    if input.auth_code.is_empty() || !EMAIL_SERVERS.contains(&input.server_name.as_str()) {
        return Json(json!({ "success": false, "message": "test failed: login rejected" }));
    }
    let store = state.db.read().await;
    let count = store
        .emails
        .values()
        .filter(|e| e.recipient == input.account)
        .count();
    Json(json!({ "success": true, "message": format!("fetched {count} emails") }))
}

async fn run_schedule(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    let pending = store.emails.values().filter(|e| !e.sent).count();
    Json(json!({
        "success": true,
        "message": format!("schedule finished, {pending} unsent emails"),
        "data": {
            "total_new_emails": 0,
            "total_notifications": 0,
            "total_errors": 0,
            "results": [],
        },
    }))
}

async fn email_servers() -> Json<&'static [&'static str]> {
    Json(EMAIL_SERVERS)
}

// --- email records ---

async fn list_emails(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Vec<EmailRecord>>, ApiError> {
    if !(1..=1000).contains(&page.limit) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "limit must be between 1 and 1000" })),
        ));
    }
    let store = state.db.read().await;
    Ok(Json(
        store
            .emails
            .values()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect(),
    ))
}

async fn get_email(
    State(state): State<AppState>,
    Path(email_id): Path<i64>,
) -> Result<Json<EmailRecord>, ApiError> {
    let store = state.db.read().await;
    store
        .emails
        .get(&email_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("email record not found"))
}

async fn create_email(
    State(state): State<AppState>,
    Json(input): Json<CreateEmail>,
) -> Json<EmailRecord> {
    let mut store = state.db.write().await;
    store.next_email_id += 1;
    let email = EmailRecord {
        id: store.next_email_id,
        sender: input.sender,
        recipient: input.recipient,
        subject: input.subject,
        reception_time: input
            .reception_time
            .unwrap_or_else(|| Utc::now().naive_utc()),
        body_text: input.body_text,
        sent: input.sent,
    };
    store.emails.insert(email.id, email.clone());
    Json(email)
}

async fn update_email(
    State(state): State<AppState>,
    Path(email_id): Path<i64>,
    Json(input): Json<UpdateEmail>,
) -> Result<Json<EmailRecord>, ApiError> {
    let mut store = state.db.write().await;
    let email = store
        .emails
        .get_mut(&email_id)
        .ok_or_else(|| not_found("email record not found"))?;
    if let Some(subject) = input.subject {
        email.subject = subject;
    }
    if let Some(body_text) = input.body_text {
        email.body_text = Some(body_text);
    }
    Ok(Json(email.clone()))
}

async fn delete_email(
    State(state): State<AppState>,
    Path(email_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let mut store = state.db.write().await;
    store
        .emails
        .remove(&email_id)
        .map(|_| Json(json!({ "message": "deleted" })))
        .ok_or_else(|| not_found("email record not found"))
}

async fn statistics(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    let total = store.emails.len();
    let sent = store.emails.values().filter(|e| e.sent).count();
    Json(json!({ "total": total, "sent": sent, "unsent": total - sent }))
}

async fn search_emails(
    State(state): State<AppState>,
    Json(search): Json<Search>,
) -> Json<Vec<EmailRecord>> {
    let store = state.db.read().await;
    let keyword = search.keyword.as_deref().map(str::to_lowercase);
    let matches = store
        .emails
        .values()
        .filter(|e| search.sender.as_deref().is_none_or(|s| e.sender == s))
        .filter(|e| search.recipient.as_deref().is_none_or(|r| e.recipient == r))
        .filter(|e| search.sent.is_none_or(|s| e.sent == s))
        .filter(|e| {
            keyword.as_deref().is_none_or(|k| {
                e.subject.to_lowercase().contains(k)
                    || e.body_text.as_deref().is_some_and(|b| b.to_lowercase().contains(k))
            })
        })
        .take(search.limit.unwrap_or(default_limit()))
        .cloned()
        .collect();
    Json(matches)
}

async fn recent_emails(
    State(state): State<AppState>,
    Path(hours): Path<u32>,
) -> Result<Json<Vec<EmailRecord>>, ApiError> {
    let since = Duration::try_hours(i64::from(hours))
        .and_then(|window| Utc::now().naive_utc().checked_sub_signed(window))
        .ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": format!("hours out of range: {hours}") })),
            )
        })?;
    let store = state.db.read().await;
    Ok(Json(
        store
            .emails
            .values()
            .filter(|e| e.reception_time >= since)
            .cloned()
            .collect(),
    ))
}

async fn emails_by_sent(
    State(state): State<AppState>,
    Path(sent): Path<bool>,
    Query(limit): Query<Limit>,
) -> Json<Vec<EmailRecord>> {
    let store = state.db.read().await;
    Json(
        store
            .emails
            .values()
            .filter(|e| e.sent == sent)
            .take(limit.limit)
            .cloned()
            .collect(),
    )
}

async fn emails_by_recipient(
    State(state): State<AppState>,
    Path(recipient): Path<String>,
    Query(limit): Query<Limit>,
) -> Json<Vec<EmailRecord>> {
    let store = state.db.read().await;
    Json(
        store
            .emails
            .values()
            .filter(|e| e.recipient == recipient)
            .take(limit.limit)
            .cloned()
            .collect(),
    )
}

async fn send_manual(
    State(state): State<AppState>,
    Json(input): Json<SendOne>,
) -> Result<Json<Value>, ApiError> {
    let mut store = state.db.write().await;
    let email = store
        .emails
        .get_mut(&input.email_id)
        .ok_or_else(|| not_found("email record not found"))?;
    email.sent = true;
    Ok(Json(json!({ "success": true, "message": "notification queued" })))
}

async fn send_batch(State(state): State<AppState>, Json(input): Json<SendMany>) -> Json<Value> {
    let mut store = state.db.write().await;
    let mut queued = 0;
    let mut missing = Vec::new();
    for id in input.email_ids {
        match store.emails.get_mut(&id) {
            Some(email) => {
                email.sent = true;
                queued += 1;
            }
            None => missing.push(id),
        }
    }
    Json(json!({
        "success": missing.is_empty(),
        "message": format!("{queued} notifications queued"),
        "data": { "missing": missing },
    }))
}
