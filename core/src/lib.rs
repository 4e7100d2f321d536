//! API client core for the notification console.
//!
//! # Overview
//! One `ApiClient` carries every backend call the console makes. It injects
//! the stored credential into outbound requests, normalizes every failure
//! into an `ApiError` with a human-readable message, and exposes the REST
//! surface as a fixed catalog of named operations. The page route table the
//! host navigates with lives here as well.
//!
//! # Design
//! - `catalog` is the only producer of `HttpRequest` values; each operation
//!   maps to one method and path template.
//! - `interceptor` holds the outbound (credential header) and inbound
//!   (classification) phases as pure functions.
//! - Credential storage, user-visible notifications, the login redirect and
//!   the network transport are traits injected at construction, so the
//!   client runs against fakes in tests.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod notify;
pub mod routes;
pub mod transport;
pub mod types;

pub use catalog::{Endpoint, Operation};
pub use client::{ApiClient, ApiClientBuilder, ApiResult};
pub use config::ClientConfig;
pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{ApiError, ConfigError, CredentialError, ErrorKind, ResponseEnvelope, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::PASSWORD_HEADER;
pub use notify::{LoginRedirect, NoRedirect, Notifier, TracingNotifier};
pub use routes::{resolve, HistoryMode, Resolved, Route, ViewId, ROUTES};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    EmailRecord, EmailRecordInput, EmailRecordQuery, EmailRecordUpdate, EmailSearch,
    EmailStatistics, LoginResponse, MailConfig, MailConfigInput, MailConfigTest, NoticeChannel,
    NoticeChannelInput, NoticeChannelUpdate,
};
