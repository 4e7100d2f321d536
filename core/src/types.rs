//! Payload and response DTOs for the console backend.
//!
//! # Design
//! These mirror the backend's JSON schema but are defined independently of
//! the mock-server crate; the integration tests catch drift. Optional
//! fields are omitted from request bodies when unset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A notification channel as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeChannel {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub server_name: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Body for creating or testing a notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeChannelInput {
    pub name: String,
    pub token: String,
    pub server_name: String,
    /// Only used by Telegram channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Body for updating a notification channel. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoticeChannelUpdate {
    pub channel_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// A mailbox the backend polls, keyed by `account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub account: String,
    pub auth_code: String,
    pub server_name: String,
    pub channel_id: String,
}

/// Body for creating or updating a mailbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfigInput {
    pub account: String,
    pub auth_code: String,
    pub server: String,
    pub server_name: String,
    pub channel_id: i64,
}

/// Body for a one-off connectivity test of a mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfigTest {
    pub account: String,
    pub auth_code: String,
    pub server_name: String,
    pub channel_id: i64,
}

/// A received email tracked by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub reception_time: NaiveDateTime,
    #[serde(default)]
    pub body_text: Option<String>,
    pub sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecordInput {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    #[serde(default)]
    pub sent: bool,
    /// Defaults to "now" on the server when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reception_time: Option<NaiveDateTime>,
}

/// Body for editing an email record. The `sent` flag is owned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailRecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

/// Pagination for listing email records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailRecordQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Counters returned by the statistics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailStatistics {
    pub total: u64,
    pub sent: u64,
    pub unsent: u64,
}

/// Body returned by `/login`. A wrong password is still a 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_update_omits_unset_fields() {
        let update = NoticeChannelUpdate {
            channel_id: 3,
            name: Some("ops".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"channel_id": 3, "name": "ops"}));
    }

    #[test]
    fn email_record_parses_naive_timestamp() {
        let raw = r#"{"id":1,"sender":"a@x.io","recipient":"b@x.io","subject":"hi",
            "reception_time":"2024-05-01T08:30:00","body_text":null,"sent":false}"#;
        let record: EmailRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.reception_time.to_string(), "2024-05-01 08:30:00");
        assert!(record.body_text.is_none());
    }
}
