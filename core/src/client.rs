//! The single point of egress for backend calls.
//!
//! # Design
//! `ApiClient` is built once from a `ClientConfig` and is cheap to clone.
//! Every named operation asks the `catalog` for its request, then runs the
//! same pipeline: the outbound phase attaches the credential, the transport
//! executes the request, and the inbound phase settles the outcome. A
//! successful response is returned as-is. Any failure rejects with an
//! `ApiError` after the host has been notified; a 401 also clears the
//! credential and schedules the login redirect.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::{self, BuildResult};
use crate::config::ClientConfig;
use crate::credential::{CredentialStore, MemoryCredentialStore};
use crate::error::{ApiError, ErrorKind, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::interceptor::{authorize, settle};
use crate::notify::{LoginRedirect, NoRedirect, Notifier, TracingNotifier};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    EmailRecordInput, EmailRecordQuery, EmailRecordUpdate, EmailSearch, MailConfigInput,
    MailConfigTest, NoticeChannelInput, NoticeChannelUpdate,
};

/// Result of every named operation.
pub type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    redirect_delay: Duration,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    redirect: Arc<dyn LoginRedirect>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("redirect_delay", &self.redirect_delay)
            .finish_non_exhaustive()
    }
}

/// Collects the host-supplied collaborators of an [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    redirect: Arc<dyn LoginRedirect>,
}

impl ApiClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn login_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    /// Fails only when the default `reqwest` transport cannot be initialised.
    pub fn build(self) -> Result<ApiClient, TransportError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.timeout)?),
        };
        let base_url = self.config.normalized_base_url().to_string();
        info!(
            env = %self.config.app_env,
            base_url = %base_url,
            timeout = ?self.config.timeout,
            "api client configured"
        );
        Ok(ApiClient {
            base_url,
            redirect_delay: self.config.redirect_delay,
            transport,
            credentials: self.credentials,
            notifier: self.notifier,
            redirect: self.redirect,
        })
    }
}

impl ApiClient {
    /// Starts a builder with an in-memory credential store, a tracing
    /// notifier, no-op login redirect and the `reqwest` transport.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            transport: None,
            credentials: Arc::new(MemoryCredentialStore::new()),
            notifier: Arc::new(TracingNotifier),
            redirect: Arc::new(NoRedirect),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn dispatch(&self, request: BuildResult) -> ApiResult {
        let outcome = match request {
            Ok(request) => {
                let request = authorize(request, self.credential().as_deref());
                debug!(method = request.method.as_str(), path = %request.path, "sending request");
                self.transport.execute(&self.base_url, &request).await
            }
            Err(e) => Err(TransportError::NotSent(format!(
                "failed to serialize request body: {e}"
            ))),
        };
        if let Err(e) = &outcome {
            debug!(error = %e, "transport failed");
        }
        settle(outcome).inspect_err(|err| self.on_failure(err))
    }

    async fn send(&self, request: HttpRequest) -> ApiResult {
        self.dispatch(Ok(request)).await
    }

    fn credential(&self) -> Option<String> {
        self.credentials.get().unwrap_or_else(|e| {
            warn!(error = %e, "failed to read credential, sending without it");
            None
        })
    }

    fn on_failure(&self, err: &ApiError) {
        warn!(
            kind = err.kind().as_str(),
            status = ?err.status(),
            error = err.message(),
            "request failed"
        );
        if err.kind() == ErrorKind::Unauthorized {
            if let Err(e) = self.credentials.clear() {
                warn!(error = %e, "failed to clear rejected credential");
            }
        }
        self.notifier.notify(err.message());
        if err.kind() == ErrorKind::Unauthorized {
            self.schedule_login_redirect();
        }
    }

    fn schedule_login_redirect(&self) {
        let redirect = Arc::clone(&self.redirect);
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            redirect.redirect_to_login();
        });
    }

    // ----- notification channels -----

    pub async fn get_all_notice_configs(&self) -> ApiResult {
        self.send(catalog::get_all_notice_configs()).await
    }

    pub async fn get_notice_channels(&self) -> ApiResult {
        self.send(catalog::get_notice_channels()).await
    }

    pub async fn create_notice_config(&self, input: &NoticeChannelInput) -> ApiResult {
        self.dispatch(catalog::create_notice_config(input)).await
    }

    pub async fn update_notice_config(&self, input: &NoticeChannelUpdate) -> ApiResult {
        self.dispatch(catalog::update_notice_config(input)).await
    }

    pub async fn delete_notice_config(&self, channel_id: i64) -> ApiResult {
        self.dispatch(catalog::delete_notice_config(channel_id)).await
    }

    /// Asks the backend to push a test message through the channel.
    pub async fn test_notice_config(&self, input: &NoticeChannelInput) -> ApiResult {
        self.dispatch(catalog::test_notice_config(input)).await
    }

    pub async fn get_all_notification_servers(&self) -> ApiResult {
        self.send(catalog::get_all_notification_servers()).await
    }

    // ----- email account configs -----

    pub async fn get_all_mail_configs(&self) -> ApiResult {
        self.send(catalog::get_all_mail_configs()).await
    }

    pub async fn create_mail_config(&self, input: &MailConfigInput) -> ApiResult {
        self.dispatch(catalog::create_mail_config(input)).await
    }

    pub async fn update_mail_config(&self, input: &MailConfigInput) -> ApiResult {
        self.dispatch(catalog::update_mail_config(input)).await
    }

    pub async fn delete_mail_config(&self, account: &str) -> ApiResult {
        self.dispatch(catalog::delete_mail_config(account)).await
    }

    pub async fn test_single_mail_config(&self, input: &MailConfigTest) -> ApiResult {
        self.dispatch(catalog::test_single_mail_config(input)).await
    }

    /// Triggers one run of the server-side polling schedule.
    pub async fn run_schedule(&self) -> ApiResult {
        self.send(catalog::run_schedule()).await
    }

    pub async fn get_all_email_servers(&self) -> ApiResult {
        self.send(catalog::get_all_email_servers()).await
    }

    // ----- email records -----

    pub async fn get_email_records(&self, query: EmailRecordQuery) -> ApiResult {
        self.send(catalog::get_email_records(query)).await
    }

    pub async fn get_email_by_id(&self, email_id: i64) -> ApiResult {
        self.send(catalog::get_email_by_id(email_id)).await
    }

    pub async fn create_email_record(&self, input: &EmailRecordInput) -> ApiResult {
        self.dispatch(catalog::create_email_record(input)).await
    }

    pub async fn update_email_record(&self, email_id: i64, input: &EmailRecordUpdate) -> ApiResult {
        self.dispatch(catalog::update_email_record(email_id, input)).await
    }

    pub async fn delete_email_record(&self, email_id: i64) -> ApiResult {
        self.send(catalog::delete_email_record(email_id)).await
    }

    pub async fn get_email_statistics(&self) -> ApiResult {
        self.send(catalog::get_email_statistics()).await
    }

    pub async fn search_email_records(&self, search: &EmailSearch) -> ApiResult {
        self.dispatch(catalog::search_email_records(search)).await
    }

    pub async fn get_recent_emails(&self, hours: u32) -> ApiResult {
        self.send(catalog::get_recent_emails(hours)).await
    }

    pub async fn get_emails_by_sent_status(&self, sent: bool, limit: Option<u32>) -> ApiResult {
        self.send(catalog::get_emails_by_sent_status(sent, limit)).await
    }

    pub async fn get_emails_by_recipient(&self, recipient: &str, limit: Option<u32>) -> ApiResult {
        self.send(catalog::get_emails_by_recipient(recipient, limit)).await
    }

    pub async fn send_email_manual(&self, email_id: i64) -> ApiResult {
        self.dispatch(catalog::send_email_manual(email_id)).await
    }

    pub async fn send_emails_batch(&self, email_ids: &[i64]) -> ApiResult {
        self.dispatch(catalog::send_emails_batch(email_ids)).await
    }

    // ----- authentication -----

    /// Checks `password` with the backend. Storing it as the credential on
    /// success is up to the caller.
    pub async fn login(&self, password: &str) -> ApiResult {
        self.dispatch(catalog::login(password)).await
    }
}
