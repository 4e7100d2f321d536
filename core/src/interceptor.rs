//! Outbound and inbound phases applied to every call.
//!
//! Both are pure functions; the side effects that go with a failure
//! (notification, credential clear, login redirect) are performed by
//! `ApiClient`.

use serde_json::Value;

use crate::error::{
    ApiError, ErrorKind, TransportError, CONFIGURATION_ERROR_MESSAGE, NETWORK_FAILURE_MESSAGE,
    REQUEST_FAILED_MESSAGE, UNAUTHORIZED_MESSAGE,
};
use crate::http::{HttpRequest, HttpResponse};

/// Header carrying the credential on authenticated calls.
pub const PASSWORD_HEADER: &str = "X-Password";

/// Outbound phase: attaches the credential header when one is set.
pub fn authorize(request: HttpRequest, credential: Option<&str>) -> HttpRequest {
    match credential {
        Some(credential) => request.with_header(PASSWORD_HEADER, credential),
        None => request,
    }
}

/// Inbound phase: first matching rule wins.
///
/// 1. 401 is `Unauthorized`.
/// 2. Any other status outside 200..400 is `ClientOrServerError`.
/// 3. A request that got no answer is `NetworkFailure`.
/// 4. A request that was never sent is `ConfigurationError`.
/// 5. Everything else passes through unmodified.
pub fn settle(outcome: Result<HttpResponse, TransportError>) -> Result<HttpResponse, ApiError> {
    match outcome {
        Ok(response) if response.status == 401 => Err(ApiError::new(
            ErrorKind::Unauthorized,
            Some(401),
            body_field(&response.body, &["message"]),
            UNAUTHORIZED_MESSAGE,
        )),
        Ok(response) if !response.is_success() => Err(ApiError::new(
            ErrorKind::ClientOrServerError,
            Some(response.status),
            body_field(&response.body, &["message", "detail"]),
            REQUEST_FAILED_MESSAGE,
        )),
        Ok(response) => Ok(response),
        Err(TransportError::NoResponse(_)) => Err(ApiError::new(
            ErrorKind::NetworkFailure,
            None,
            None,
            NETWORK_FAILURE_MESSAGE,
        )),
        Err(TransportError::NotSent(_)) => Err(ApiError::new(
            ErrorKind::ConfigurationError,
            None,
            None,
            CONFIGURATION_ERROR_MESSAGE,
        )),
    }
}

/// First non-empty string among `fields` of a JSON object body.
fn body_field(body: &str, fields: &[&str]) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    fields
        .iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}
