//! JSON error bodies.

use salvo::{http::ResBody, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Always `true`
    pub error: bool,

    /// What went wrong
    pub message: String,
}

/// Catcher hoop rendering error statuses as [`ErrorResponse`].
#[handler]
pub(crate) fn json_errors(res: &mut Response, ctrl: &mut FlowCtrl) {
    let Some(status) = res.status_code else {
        return;
    };

    if !(status.is_client_error() || status.is_server_error()) {
        return;
    }

    let message = match res.take_body() {
        ResBody::Error(error) if !error.brief.is_empty() => error.brief,
        ResBody::Error(error) => error.name,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
    };

    res.render(Json(ErrorResponse {
        error: true,
        message,
    }));

    ctrl.skip_rest();
}

/// Goal for known paths requested with a method they do not serve.
#[handler]
pub(crate) fn method_not_allowed(res: &mut Response) {
    res.render(StatusError::method_not_allowed().brief("Method not allowed"));
}
