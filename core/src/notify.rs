//! Host-supplied side effects of a failed call.

use tracing::{info, warn};

/// Shows a user-visible message.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Navigates the host to its login view. Invoked after the redirect delay
/// once the server has rejected the credential.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Emits notifications as `warn` events, for hosts without a UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(target: "console_core::notify", "{message}");
    }
}

/// Logs the redirect and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedirect;

impl LoginRedirect for NoRedirect {
    fn redirect_to_login(&self) {
        info!("credential rejected, login required");
    }
}
