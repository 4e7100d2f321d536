//! Static endpoint catalog.
//!
//! # Design
//! `Operation` enumerates every backend call the console makes and maps it
//! to a fixed method and path template. The builder functions below are the
//! only producers of `HttpRequest` values; each one looks its endpoint up in
//! the table and fills in path segments, query pairs and the JSON body.
//! They hold no state, so repeating an operation yields an equal request.

use serde::Serialize;
use serde_json::json;

use crate::http::{HttpMethod, HttpRequest};
use crate::types::{
    EmailRecordInput, EmailRecordQuery, EmailRecordUpdate, EmailSearch, MailConfigInput,
    MailConfigTest, NoticeChannelInput, NoticeChannelUpdate,
};

/// Result of building a request that carries a JSON body.
pub type BuildResult = Result<HttpRequest, serde_json::Error>;

/// Method and path template of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // notification channels
    GetAllNoticeConfigs,
    GetNoticeChannels,
    CreateNoticeConfig,
    UpdateNoticeConfig,
    DeleteNoticeConfig,
    TestNoticeConfig,
    GetAllNotificationServers,
    // email account configs
    GetAllMailConfigs,
    CreateMailConfig,
    UpdateMailConfig,
    DeleteMailConfig,
    TestSingleMailConfig,
    RunSchedule,
    GetAllEmailServers,
    // email records
    GetEmailRecords,
    GetEmailById,
    CreateEmailRecord,
    UpdateEmailRecord,
    DeleteEmailRecord,
    GetEmailStatistics,
    SearchEmailRecords,
    GetRecentEmails,
    GetEmailsBySentStatus,
    GetEmailsByRecipient,
    SendEmailManual,
    SendEmailsBatch,
    // authentication
    Login,
}

impl Operation {
    pub const ALL: [Operation; 27] = [
        Operation::GetAllNoticeConfigs,
        Operation::GetNoticeChannels,
        Operation::CreateNoticeConfig,
        Operation::UpdateNoticeConfig,
        Operation::DeleteNoticeConfig,
        Operation::TestNoticeConfig,
        Operation::GetAllNotificationServers,
        Operation::GetAllMailConfigs,
        Operation::CreateMailConfig,
        Operation::UpdateMailConfig,
        Operation::DeleteMailConfig,
        Operation::TestSingleMailConfig,
        Operation::RunSchedule,
        Operation::GetAllEmailServers,
        Operation::GetEmailRecords,
        Operation::GetEmailById,
        Operation::CreateEmailRecord,
        Operation::UpdateEmailRecord,
        Operation::DeleteEmailRecord,
        Operation::GetEmailStatistics,
        Operation::SearchEmailRecords,
        Operation::GetRecentEmails,
        Operation::GetEmailsBySentStatus,
        Operation::GetEmailsByRecipient,
        Operation::SendEmailManual,
        Operation::SendEmailsBatch,
        Operation::Login,
    ];

    pub fn endpoint(self) -> Endpoint {
        use HttpMethod::{Delete, Get, Post, Put};

        let (method, path) = match self {
            Operation::GetAllNoticeConfigs => (Post, "/notification-channels/get"),
            Operation::GetNoticeChannels => (Post, "/notification-channels/get"),
            Operation::CreateNoticeConfig => (Post, "/notification-channels/add"),
            Operation::UpdateNoticeConfig => (Post, "/notification-channels/update"),
            Operation::DeleteNoticeConfig => (Post, "/notification-channels/delete"),
            Operation::TestNoticeConfig => (Post, "/notification-channels/test"),
            Operation::GetAllNotificationServers => (Post, "/notification-channels/get_servers"),
            Operation::GetAllMailConfigs => (Post, "/email-configs/get"),
            Operation::CreateMailConfig => (Post, "/email-configs/add"),
            Operation::UpdateMailConfig => (Post, "/email-configs/update"),
            Operation::DeleteMailConfig => (Post, "/email-configs/delete"),
            Operation::TestSingleMailConfig => (Post, "/email-configs/test"),
            Operation::RunSchedule => (Post, "/email-configs/run_schedule"),
            Operation::GetAllEmailServers => (Post, "/email-configs/get_servers"),
            Operation::GetEmailRecords => (Get, "/email-records/"),
            Operation::GetEmailById => (Get, "/email-records/{email_id}"),
            Operation::CreateEmailRecord => (Post, "/email-records/"),
            Operation::UpdateEmailRecord => (Put, "/email-records/{email_id}"),
            Operation::DeleteEmailRecord => (Delete, "/email-records/{email_id}"),
            Operation::GetEmailStatistics => (Get, "/email-records/statistics/overview"),
            Operation::SearchEmailRecords => (Post, "/email-records/search"),
            Operation::GetRecentEmails => (Get, "/email-records/recent/{hours}"),
            Operation::GetEmailsBySentStatus => (Get, "/email-records/filter/sent/{sent}"),
            Operation::GetEmailsByRecipient => (Get, "/email-records/filter/recipient/{recipient}"),
            Operation::SendEmailManual => (Post, "/email-records/send-manual"),
            Operation::SendEmailsBatch => (Post, "/email-records/send-batch"),
            Operation::Login => (Post, "/login"),
        };
        Endpoint { method, path }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::GetAllNoticeConfigs => "get_all_notice_configs",
            Operation::GetNoticeChannels => "get_notice_channels",
            Operation::CreateNoticeConfig => "create_notice_config",
            Operation::UpdateNoticeConfig => "update_notice_config",
            Operation::DeleteNoticeConfig => "delete_notice_config",
            Operation::TestNoticeConfig => "test_notice_config",
            Operation::GetAllNotificationServers => "get_all_notification_servers",
            Operation::GetAllMailConfigs => "get_all_mail_configs",
            Operation::CreateMailConfig => "create_mail_config",
            Operation::UpdateMailConfig => "update_mail_config",
            Operation::DeleteMailConfig => "delete_mail_config",
            Operation::TestSingleMailConfig => "test_single_mail_config",
            Operation::RunSchedule => "run_schedule",
            Operation::GetAllEmailServers => "get_all_email_servers",
            Operation::GetEmailRecords => "get_email_records",
            Operation::GetEmailById => "get_email_by_id",
            Operation::CreateEmailRecord => "create_email_record",
            Operation::UpdateEmailRecord => "update_email_record",
            Operation::DeleteEmailRecord => "delete_email_record",
            Operation::GetEmailStatistics => "get_email_statistics",
            Operation::SearchEmailRecords => "search_email_records",
            Operation::GetRecentEmails => "get_recent_emails",
            Operation::GetEmailsBySentStatus => "get_emails_by_sent_status",
            Operation::GetEmailsByRecipient => "get_emails_by_recipient",
            Operation::SendEmailManual => "send_email_manual",
            Operation::SendEmailsBatch => "send_emails_batch",
            Operation::Login => "login",
        }
    }

    /// A request with the endpoint's method and its template path as-is.
    fn request(self) -> HttpRequest {
        let endpoint = self.endpoint();
        HttpRequest::new(endpoint.method, endpoint.path)
    }

    /// A request with `{name}` in the template replaced by `value`, percent-encoded.
    fn request_with_segment(self, name: &str, value: &str) -> HttpRequest {
        let endpoint = self.endpoint();
        let path = endpoint
            .path
            .replace(&format!("{{{name}}}"), &urlencoding::encode(value));
        HttpRequest::new(endpoint.method, path)
    }

    fn request_with_body<T: Serialize + ?Sized>(self, body: &T) -> BuildResult {
        attach_json(self.request(), body)
    }
}

fn attach_json<T: Serialize + ?Sized>(mut req: HttpRequest, body: &T) -> BuildResult {
    req.body = Some(serde_json::to_string(body)?);
    req.headers
        .push(("content-type".to_string(), "application/json".to_string()));
    Ok(req)
}

fn with_limit(mut req: HttpRequest, limit: Option<u32>) -> HttpRequest {
    if let Some(limit) = limit {
        req.query.push(("limit".to_string(), limit.to_string()));
    }
    req
}

// ---------------------------------------------------------------------------
// Notification channels
// ---------------------------------------------------------------------------

pub fn get_all_notice_configs() -> HttpRequest {
    Operation::GetAllNoticeConfigs.request()
}

pub fn get_notice_channels() -> HttpRequest {
    Operation::GetNoticeChannels.request()
}

pub fn create_notice_config(input: &NoticeChannelInput) -> BuildResult {
    Operation::CreateNoticeConfig.request_with_body(input)
}

pub fn update_notice_config(input: &NoticeChannelUpdate) -> BuildResult {
    Operation::UpdateNoticeConfig.request_with_body(input)
}

pub fn delete_notice_config(channel_id: i64) -> BuildResult {
    Operation::DeleteNoticeConfig.request_with_body(&json!({ "channel_id": channel_id }))
}

pub fn test_notice_config(input: &NoticeChannelInput) -> BuildResult {
    Operation::TestNoticeConfig.request_with_body(input)
}

pub fn get_all_notification_servers() -> HttpRequest {
    Operation::GetAllNotificationServers.request()
}

// ---------------------------------------------------------------------------
// Email account configs
// ---------------------------------------------------------------------------

pub fn get_all_mail_configs() -> HttpRequest {
    Operation::GetAllMailConfigs.request()
}

pub fn create_mail_config(input: &MailConfigInput) -> BuildResult {
    Operation::CreateMailConfig.request_with_body(input)
}

pub fn update_mail_config(input: &MailConfigInput) -> BuildResult {
    Operation::UpdateMailConfig.request_with_body(input)
}

pub fn delete_mail_config(account: &str) -> BuildResult {
    Operation::DeleteMailConfig.request_with_body(&json!({ "account": account }))
}

pub fn test_single_mail_config(input: &MailConfigTest) -> BuildResult {
    Operation::TestSingleMailConfig.request_with_body(input)
}

pub fn run_schedule() -> HttpRequest {
    Operation::RunSchedule.request()
}

pub fn get_all_email_servers() -> HttpRequest {
    Operation::GetAllEmailServers.request()
}

// ---------------------------------------------------------------------------
// Email records
// ---------------------------------------------------------------------------

pub fn get_email_records(query: EmailRecordQuery) -> HttpRequest {
    let mut req = with_limit(Operation::GetEmailRecords.request(), query.limit);
    if let Some(offset) = query.offset {
        req.query.push(("offset".to_string(), offset.to_string()));
    }
    req
}

pub fn get_email_by_id(email_id: i64) -> HttpRequest {
    Operation::GetEmailById.request_with_segment("email_id", &email_id.to_string())
}

pub fn create_email_record(input: &EmailRecordInput) -> BuildResult {
    Operation::CreateEmailRecord.request_with_body(input)
}

pub fn update_email_record(email_id: i64, input: &EmailRecordUpdate) -> BuildResult {
    let req = Operation::UpdateEmailRecord.request_with_segment("email_id", &email_id.to_string());
    attach_json(req, input)
}

pub fn delete_email_record(email_id: i64) -> HttpRequest {
    Operation::DeleteEmailRecord.request_with_segment("email_id", &email_id.to_string())
}

pub fn get_email_statistics() -> HttpRequest {
    Operation::GetEmailStatistics.request()
}

pub fn search_email_records(search: &EmailSearch) -> BuildResult {
    Operation::SearchEmailRecords.request_with_body(search)
}

pub fn get_recent_emails(hours: u32) -> HttpRequest {
    Operation::GetRecentEmails.request_with_segment("hours", &hours.to_string())
}

pub fn get_emails_by_sent_status(sent: bool, limit: Option<u32>) -> HttpRequest {
    let req = Operation::GetEmailsBySentStatus.request_with_segment("sent", &sent.to_string());
    with_limit(req, limit)
}

pub fn get_emails_by_recipient(recipient: &str, limit: Option<u32>) -> HttpRequest {
    let req = Operation::GetEmailsByRecipient.request_with_segment("recipient", recipient);
    with_limit(req, limit)
}

pub fn send_email_manual(email_id: i64) -> BuildResult {
    Operation::SendEmailManual.request_with_body(&json!({ "email_id": email_id }))
}

pub fn send_emails_batch(email_ids: &[i64]) -> BuildResult {
    Operation::SendEmailsBatch.request_with_body(&json!({ "email_ids": email_ids }))
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

pub fn login(password: &str) -> BuildResult {
    Operation::Login.request_with_body(&json!({ "password": password }))
}
