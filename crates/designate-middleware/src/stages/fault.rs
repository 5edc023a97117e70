//! Fault response rendering shared by the error boundaries.

use crate::context::MiddlewareContext;
use crate::notifications::FaultNotifier;
use crate::types::{Response, ResponseExt};
use designate_core::PartialEnvelope;
use designate_telemetry::record_api_fault;
use http::StatusCode;

/// Finalizes `partial` into an error envelope and renders it.
///
/// With a request context attached the envelope carries its request id
/// and a fault notification is queued. Without one, the fault is logged
/// and the response is still produced.
pub(crate) fn render_fault(
    ctx: &MiddlewareContext,
    notifier: &FaultNotifier,
    url: &str,
    status: StatusCode,
    partial: PartialEnvelope,
    exception: &str,
) -> Response {
    let request_context = ctx.request_context();
    let envelope = partial.finalize(status, request_context.map(|c| c.request_id()));

    match request_context {
        Some(context) => notifier.send_api_fault(context, url, envelope.code, exception),
        None => tracing::error!(
            request_id = %ctx.request_id(),
            url,
            "Missing context in request, please check"
        ),
    }

    record_api_fault(&envelope.error_type, envelope.code);
    Response::json(status, &envelope)
}
